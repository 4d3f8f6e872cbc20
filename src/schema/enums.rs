//! Closed enumerations appearing in the game's serialized data tables.
//!
//! Each enumeration mirrors a numeric field in the data tables whose values name
//! game concepts: item categories, recipe kinds, texture pixel formats and so on.
//! The discriminants are fixed by the game's serialization and must not be
//! renumbered.
//!
//! Schema decoding references these through [`crate::schema::enums::EnumTable`]
//! descriptors, which pair a raw integer width with a name lookup. Unknown raw
//! values are preserved rather than rejected, since newer game versions extend
//! these tables.

use strum::{FromRepr, IntoStaticStr};

/// Integer width of a serialized enumeration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWidth {
    /// Stored as a signed 32-bit value.
    I32,
    /// Stored as an unsigned 32-bit value.
    U32,
}

/// Describes one serialized enumeration: its name, storage width, and a lookup
/// from raw discriminant to variant name.
///
/// Tables are static so schema nodes can reference them by `&'static` pointer.
#[derive(PartialEq)]
pub struct EnumTable {
    /// Name of the enumeration, used in diagnostics and debug output.
    pub name: &'static str,
    /// Storage width of the raw value.
    pub width: EnumWidth,
    /// Maps a raw discriminant to its variant name, or `None` if unknown.
    pub lookup: fn(i64) -> Option<&'static str>,
}

impl std::fmt::Debug for EnumTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumTable")
            .field("name", &self.name)
            .field("width", &self.width)
            .finish()
    }
}

macro_rules! lookup_fn {
    ($name:ident, $enum:ident) => {
        fn $name(raw: i64) -> Option<&'static str> {
            let discriminant = i32::try_from(raw).ok()?;
            $enum::from_repr(discriminant).map(<&'static str>::from)
        }
    };
}

/// Category of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum ItemType {
    /// Uncategorized.
    Unknown = 0,
    /// Raw gathered resource.
    Resource = 1,
    /// Refined material.
    Material = 2,
    /// Manufactured component.
    Component = 3,
    /// End product.
    Product = 4,
    /// Logistics equipment.
    Logistics = 5,
    /// Production machinery.
    Production = 6,
    /// Decorative structure.
    Decoration = 7,
    /// Turret weapon.
    Turret = 8,
    /// Defensive structure.
    Defense = 9,
    /// Dark fog drop.
    Darkfog = 10,
    /// Research matrix.
    Matrix = 11,
}

/// Ammunition category of a combat item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum AmmoType {
    /// Not ammunition.
    None = 0,
    /// Kinetic bullet.
    Bullet = 1,
    /// Laser charge.
    Laser = 2,
    /// Cannon shell.
    Cannon = 3,
    /// Plasma charge.
    Plasma = 4,
    /// Guided missile.
    Missile = 5,
}

/// Kind of facility a recipe runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum RecipeType {
    /// No facility.
    None = 0,
    /// Smelting facility.
    Smelt = 1,
    /// Chemical plant.
    Chemical = 2,
    /// Oil refinery.
    Refine = 3,
    /// Assembling machine.
    Assemble = 4,
    /// Particle collider.
    Particle = 5,
    /// Energy exchanger.
    Exchange = 6,
    /// Ray receiver photon storage.
    PhotonStore = 7,
    /// Fractionator.
    Fractionate = 8,
    /// Research lab.
    Research = 15,
}

/// Category of a world object model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum ObjectType {
    /// Built entity.
    Entity = 0,
    /// Flora.
    Vegetable = 1,
    /// Resource vein.
    Vein = 2,
    /// Construction preview.
    Prebuild = 3,
    /// Hostile unit.
    Enemy = 4,
    /// Ruin.
    Ruin = 5,
    /// Space craft.
    Craft = 6,
}

/// Ruin behavior of a destroyed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum RuinType {
    /// Leaves no ruin.
    None = 0,
    /// Hidden ruin.
    Hidden = 1,
    /// Visible ruin.
    Normal = 2,
}

/// Addon slot category of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum AddonType {
    /// No addon.
    None = 0,
    /// Belt connection.
    Belt = 1,
    /// Storage connection.
    Storage = 2,
}

/// Resource kind a mining facility extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
pub enum MinerType {
    /// Not a miner.
    None = 0,
    /// Water pump.
    Water = 1,
    /// Ore vein miner.
    Vein = 2,
    /// Oil extractor.
    Oil = 3,
}

/// Pixel format of a serialized texture.
///
/// Identifiers 37 through 40 were never assigned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(i32)]
#[allow(missing_docs, non_camel_case_types, clippy::upper_case_acronyms)]
pub enum TextureFormat {
    Alpha8 = 1,
    ARGB4444 = 2,
    RGB24 = 3,
    RGBA32 = 4,
    ARGB32 = 5,
    ARGBFloat = 6,
    RGB565 = 7,
    BGR24 = 8,
    R16 = 9,
    DXT1 = 10,
    DXT3 = 11,
    DXT5 = 12,
    RGBA4444 = 13,
    BGRA32 = 14,
    RHalf = 15,
    RGHalf = 16,
    RGBAHalf = 17,
    RFloat = 18,
    RGFloat = 19,
    RGBAFloat = 20,
    YUY2 = 21,
    RGB9e5Float = 22,
    RGBFloat = 23,
    BC6H = 24,
    BC7 = 25,
    BC4 = 26,
    BC5 = 27,
    DXT1Crunched = 28,
    DXT5Crunched = 29,
    PVRTC_RGB2 = 30,
    PVRTC_RGBA2 = 31,
    PVRTC_RGB4 = 32,
    PVRTC_RGBA4 = 33,
    ETC_RGB4 = 34,
    ATC_RGB4 = 35,
    ATC_RGBA8 = 36,
    EAC_R = 41,
    EAC_R_SIGNED = 42,
    EAC_RG = 43,
    EAC_RG_SIGNED = 44,
    ETC2_RGB = 45,
    ETC2_RGBA1 = 46,
    ETC2_RGBA8 = 47,
    ASTC_RGB_4x4 = 48,
    ASTC_RGB_5x5 = 49,
    ASTC_RGB_6x6 = 50,
    ASTC_RGB_8x8 = 51,
    ASTC_RGB_10x10 = 52,
    ASTC_RGB_12x12 = 53,
    ASTC_RGBA_4x4 = 54,
    ASTC_RGBA_5x5 = 55,
    ASTC_RGBA_6x6 = 56,
    ASTC_RGBA_8x8 = 57,
    ASTC_RGBA_10x10 = 58,
    ASTC_RGBA_12x12 = 59,
    ETC_RGB4_3DS = 60,
    ETC_RGBA8_3DS = 61,
    RG16 = 62,
    R8 = 63,
    ETC_RGB4Crunched = 64,
    ETC2_RGBA8Crunched = 65,
    ASTC_HDR_4x4 = 66,
    ASTC_HDR_5x5 = 67,
    ASTC_HDR_6x6 = 68,
    ASTC_HDR_8x8 = 69,
    ASTC_HDR_10x10 = 70,
    ASTC_HDR_12x12 = 71,
    RG32 = 72,
    RGB48 = 73,
    RGBA64 = 74,
}

lookup_fn!(lookup_item_type, ItemType);
lookup_fn!(lookup_ammo_type, AmmoType);
lookup_fn!(lookup_recipe_type, RecipeType);
lookup_fn!(lookup_object_type, ObjectType);
lookup_fn!(lookup_ruin_type, RuinType);
lookup_fn!(lookup_addon_type, AddonType);
lookup_fn!(lookup_miner_type, MinerType);
lookup_fn!(lookup_texture_format, TextureFormat);

/// Table descriptor for [`ItemType`].
pub static ITEM_TYPE: EnumTable = EnumTable {
    name: "ItemType",
    width: EnumWidth::I32,
    lookup: lookup_item_type,
};

/// Table descriptor for [`AmmoType`].
pub static AMMO_TYPE: EnumTable = EnumTable {
    name: "AmmoType",
    width: EnumWidth::I32,
    lookup: lookup_ammo_type,
};

/// Table descriptor for [`RecipeType`].
pub static RECIPE_TYPE: EnumTable = EnumTable {
    name: "RecipeType",
    width: EnumWidth::I32,
    lookup: lookup_recipe_type,
};

/// Table descriptor for [`ObjectType`].
pub static OBJECT_TYPE: EnumTable = EnumTable {
    name: "ObjectType",
    width: EnumWidth::I32,
    lookup: lookup_object_type,
};

/// Table descriptor for [`RuinType`].
pub static RUIN_TYPE: EnumTable = EnumTable {
    name: "RuinType",
    width: EnumWidth::I32,
    lookup: lookup_ruin_type,
};

/// Table descriptor for [`AddonType`].
pub static ADDON_TYPE: EnumTable = EnumTable {
    name: "AddonType",
    width: EnumWidth::U32,
    lookup: lookup_addon_type,
};

/// Table descriptor for [`MinerType`].
pub static MINER_TYPE: EnumTable = EnumTable {
    name: "MinerType",
    width: EnumWidth::U32,
    lookup: lookup_miner_type,
};

/// Table descriptor for [`TextureFormat`].
pub static TEXTURE_FORMAT: EnumTable = EnumTable {
    name: "TextureFormat",
    width: EnumWidth::U32,
    lookup: lookup_texture_format,
};

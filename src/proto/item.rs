//! Item table records.

use crate::file::cursor::BoolWidth;
use crate::schema::enums::{AmmoType, ItemType, AMMO_TYPE, ITEM_TYPE};
use crate::schema::{Field, Object, Primitive, SchemaNode};
use crate::Result;

use super::{HasId, Proto};

static ITEM_FIELDS: &[Field] = &[
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("id", SchemaNode::Primitive(Primitive::I32)),
    Field::new("sid", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("type", SchemaNode::Primitive(Primitive::Enum(&ITEM_TYPE))),
    Field::new("subId", SchemaNode::Primitive(Primitive::I32)),
    Field::new("miningFrom", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("produceFrom", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("stackSize", SchemaNode::Primitive(Primitive::I32)),
    Field::new("grade", SchemaNode::Primitive(Primitive::I32)),
    Field::new("upgrades", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("isFluid", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("isEntity", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("canBuild", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("buildInGas", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("iconPath", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("modelIndex", SchemaNode::Primitive(Primitive::I32)),
    Field::new("modelCount", SchemaNode::Primitive(Primitive::I32)),
    Field::new("hpMax", SchemaNode::Primitive(Primitive::I32)),
    Field::new("ability", SchemaNode::Primitive(Primitive::I32)),
    Field::new("heatValue", SchemaNode::Primitive(Primitive::I64)),
    Field::new("potential", SchemaNode::Primitive(Primitive::I64)),
    Field::new("reactorInc", SchemaNode::Primitive(Primitive::F32)),
    Field::new("fuelType", SchemaNode::Primitive(Primitive::I32)),
    Field::new("ammoType", SchemaNode::Primitive(Primitive::Enum(&AMMO_TYPE))),
    Field::new("bombType", SchemaNode::Primitive(Primitive::I32)),
    Field::new("craftType", SchemaNode::Primitive(Primitive::I32)),
    Field::new("buildIndex", SchemaNode::Primitive(Primitive::I32)),
    Field::new("buildMode", SchemaNode::Primitive(Primitive::I32)),
    Field::new("gridIndex", SchemaNode::Primitive(Primitive::I32)),
    Field::new("unlockKey", SchemaNode::Primitive(Primitive::I32)),
    Field::new("preTechOverride", SchemaNode::Primitive(Primitive::I32)),
    Field::new("productive", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("mechaMaterialId", SchemaNode::Primitive(Primitive::I32)),
    Field::new("dropRate", SchemaNode::Primitive(Primitive::F32)),
    Field::new("enemyDropLevel", SchemaNode::Primitive(Primitive::I32)),
    Field::new("enemyDropRange", SchemaNode::Primitive(Primitive::Vec2)),
    Field::new("enemyDropCount", SchemaNode::Primitive(Primitive::F32)),
    Field::new("enemyDropMask", SchemaNode::Primitive(Primitive::I32)),
    Field::new("descFields", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("description", SchemaNode::Primitive(Primitive::Str { align: true })),
];

/// One record of the item table.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct ItemProto {
    pub name: String,
    pub id: i32,
    pub sid: String,
    /// Raw item category discriminant; see [`ItemProto::kind`].
    pub kind_raw: i64,
    pub sub_id: i32,
    pub mining_from: String,
    pub produce_from: String,
    pub stack_size: i32,
    pub grade: i32,
    pub upgrades: Vec<i32>,
    pub is_fluid: bool,
    pub is_entity: bool,
    pub can_build: bool,
    pub build_in_gas: bool,
    pub icon_path: String,
    pub model_index: i32,
    pub model_count: i32,
    pub hp_max: i32,
    pub ability: i32,
    pub heat_value: i64,
    pub potential: i64,
    pub reactor_inc: f32,
    pub fuel_type: i32,
    /// Raw ammunition discriminant; see [`ItemProto::ammo`].
    pub ammo_raw: i64,
    pub bomb_type: i32,
    pub craft_type: i32,
    pub build_index: i32,
    pub build_mode: i32,
    /// Grid coordinates packed as ZYXX, where Z distinguishes items from
    /// buildings.
    pub grid_index: i32,
    pub unlock_key: i32,
    pub pre_tech_override: i32,
    pub productive: bool,
    pub mecha_material_id: i32,
    pub drop_rate: f32,
    pub enemy_drop_level: i32,
    pub enemy_drop_range: [f32; 2],
    pub enemy_drop_count: f32,
    pub enemy_drop_mask: i32,
    pub desc_fields: Vec<i32>,
    pub description: String,
    /// Prefab descriptor fields attached by the cross-reference resolver,
    /// one nested object per descriptor key. Empty until resolution runs.
    pub prefab_desc: Object,
}

impl ItemProto {
    /// Item category, when the raw discriminant is known.
    #[must_use]
    pub fn kind(&self) -> Option<ItemType> {
        i32::try_from(self.kind_raw).ok().and_then(ItemType::from_repr)
    }

    /// Ammunition category, when the raw discriminant is known.
    #[must_use]
    pub fn ammo(&self) -> Option<AmmoType> {
        i32::try_from(self.ammo_raw).ok().and_then(AmmoType::from_repr)
    }
}

impl Proto for ItemProto {
    const TABLE_NAME: &'static str = "ItemProtoSet";

    fn fields() -> &'static [Field] {
        ITEM_FIELDS
    }

    fn from_object(mut object: Object) -> Result<ItemProto> {
        Ok(ItemProto {
            name: object.take_str("name")?,
            id: object.get_i32("id")?,
            sid: object.take_str("sid")?,
            kind_raw: object.get_i64("type")?,
            sub_id: object.get_i32("subId")?,
            mining_from: object.take_str("miningFrom")?,
            produce_from: object.take_str("produceFrom")?,
            stack_size: object.get_i32("stackSize")?,
            grade: object.get_i32("grade")?,
            upgrades: object.take_i32_array("upgrades")?,
            is_fluid: object.get_bool("isFluid")?,
            is_entity: object.get_bool("isEntity")?,
            can_build: object.get_bool("canBuild")?,
            build_in_gas: object.get_bool("buildInGas")?,
            icon_path: object.take_str("iconPath")?,
            model_index: object.get_i32("modelIndex")?,
            model_count: object.get_i32("modelCount")?,
            hp_max: object.get_i32("hpMax")?,
            ability: object.get_i32("ability")?,
            heat_value: object.get_i64("heatValue")?,
            potential: object.get_i64("potential")?,
            reactor_inc: object.get_f32("reactorInc")?,
            fuel_type: object.get_i32("fuelType")?,
            ammo_raw: object.get_i64("ammoType")?,
            bomb_type: object.get_i32("bombType")?,
            craft_type: object.get_i32("craftType")?,
            build_index: object.get_i32("buildIndex")?,
            build_mode: object.get_i32("buildMode")?,
            grid_index: object.get_i32("gridIndex")?,
            unlock_key: object.get_i32("unlockKey")?,
            pre_tech_override: object.get_i32("preTechOverride")?,
            productive: object.get_bool("productive")?,
            mecha_material_id: object.get_i32("mechaMaterialId")?,
            drop_rate: object.get_f32("dropRate")?,
            enemy_drop_level: object.get_i32("enemyDropLevel")?,
            enemy_drop_range: object.get_vec2("enemyDropRange")?,
            enemy_drop_count: object.get_f32("enemyDropCount")?,
            enemy_drop_mask: object.get_i32("enemyDropMask")?,
            desc_fields: object.take_i32_array("descFields")?,
            description: object.take_str("description")?,
            prefab_desc: Object::new(),
        })
    }
}

impl HasId for ItemProto {
    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::cursor::{Cursor, Endian};
    use crate::schema::decode_object;

    fn push_str(out: &mut Vec<u8>, text: &str) {
        out.extend_from_slice(&(text.len() as i32).to_le_bytes());
        out.extend_from_slice(text.as_bytes());
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    fn push_i32s(out: &mut Vec<u8>, values: &[i32]) {
        for value in values {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    #[test]
    fn item_record_round_trips_all_fields() {
        let mut data = Vec::new();
        push_str(&mut data, "Iron Ingot");
        push_i32s(&mut data, &[1101]);
        push_str(&mut data, "");
        push_i32s(&mut data, &[2, 0]); // type Material, subId
        push_str(&mut data, "");
        push_str(&mut data, "冶炼设备");
        push_i32s(&mut data, &[100, 1]); // stackSize, grade
        push_i32s(&mut data, &[2, 1102, 1103]); // upgrades
        push_i32s(&mut data, &[0, 0, 0, 0]); // four flags
        push_str(&mut data, "Icons/ItemRecipe/iron-plate");
        push_i32s(&mut data, &[0, 0, 0, 0]); // modelIndex..ability
        data.extend_from_slice(&0i64.to_le_bytes()); // heatValue
        data.extend_from_slice(&0i64.to_le_bytes()); // potential
        data.extend_from_slice(&0f32.to_le_bytes()); // reactorInc
        push_i32s(&mut data, &[0, 0, 0, 0, 0, 0]); // fuelType..buildMode
        push_i32s(&mut data, &[1101, 0, 0]); // gridIndex, unlockKey, preTechOverride
        push_i32s(&mut data, &[1]); // productive
        push_i32s(&mut data, &[0]); // mechaMaterialId
        data.extend_from_slice(&0f32.to_le_bytes()); // dropRate
        push_i32s(&mut data, &[0]); // enemyDropLevel
        data.extend_from_slice(&0f32.to_le_bytes()); // enemyDropRange x
        data.extend_from_slice(&0f32.to_le_bytes()); // enemyDropRange y
        data.extend_from_slice(&0f32.to_le_bytes()); // enemyDropCount
        push_i32s(&mut data, &[0]); // enemyDropMask
        push_i32s(&mut data, &[1, 1]); // descFields
        push_str(&mut data, "Smelted from iron ore.");

        let mut cursor = Cursor::new(&data, Endian::Little);
        let object = decode_object(&mut cursor, ITEM_FIELDS).unwrap();
        let item = ItemProto::from_object(object).unwrap();

        assert_eq!(item.name, "Iron Ingot");
        assert_eq!(item.id, 1101);
        assert_eq!(item.kind(), Some(ItemType::Material));
        assert_eq!(item.produce_from, "冶炼设备");
        assert_eq!(item.stack_size, 100);
        assert_eq!(item.upgrades, vec![1102, 1103]);
        assert_eq!(item.icon_path, "Icons/ItemRecipe/iron-plate");
        assert!(item.productive);
        assert_eq!(item.desc_fields, vec![1]);
        assert_eq!(item.description, "Smelted from iron ore.");
        assert_eq!(cursor.remaining(), 0);
    }
}

//! Descriptor registry for behaviour payload calibration.
//!
//! Each entry pairs a behaviour payload layout with the data needed to
//! calibrate it against a real container: a fixed encoded size where the
//! layout has one, the id of an item known to carry the descriptor, and a
//! plausibility predicate over the decoded fields. The predicates encode
//! believable engineering ranges for the 2018.4-era game data and are
//! deliberately literal; loosening them admits false positives on
//! same-sized layouts.

use crate::file::cursor::BoolWidth;
use crate::schema::enums::{ADDON_TYPE, MINER_TYPE, RECIPE_TYPE};
use crate::schema::{Field, Object, Primitive, SchemaNode};

/// Encoded size of a descriptor payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    /// Every instance encodes to exactly this many bytes.
    Fixed(usize),
    /// Instances contain arrays and vary in size.
    Variable,
}

/// One calibratable descriptor layout.
#[derive(Debug)]
pub struct DescriptorSpec {
    /// Layout name as the game scripts spell it.
    pub name: &'static str,
    /// Key the decoded fields are attached under.
    pub key: &'static str,
    /// Payload layout.
    pub fields: &'static [Field],
    /// Encoded size, used to pre-filter candidates.
    pub size: SizeHint,
    /// Id of an item whose prefab is known to carry this descriptor.
    pub anchor_item: i32,
    /// Sanity check over a trial decode.
    pub plausible: fn(&Object) -> bool,
}

const BOOL4: SchemaNode = SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four));
const I32: SchemaNode = SchemaNode::Primitive(Primitive::I32);
const I64: SchemaNode = SchemaNode::Primitive(Primitive::I64);
const F32: SchemaNode = SchemaNode::Primitive(Primitive::F32);
const VEC2: SchemaNode = SchemaNode::Primitive(Primitive::Vec2);
const VEC3: SchemaNode = SchemaNode::Primitive(Primitive::Vec3);

static POWER_FIELDS: &[Field] = &[
    Field::new("node", BOOL4),
    Field::new("connectDistance", F32),
    Field::new("coverRadius", F32),
    Field::new("powerPoint", VEC3),
    Field::new("generator", BOOL4),
    Field::new("photovoltaic", BOOL4),
    Field::new("wind", BOOL4),
    Field::new("gamma", BOOL4),
    Field::new("geothermal", BOOL4),
    Field::new("genEnergyPerTick", I64),
    Field::new("useFuelPerTick", I64),
    Field::new("fuelMask", I32),
    Field::new("catalystId", I32),
    Field::new("productId", I32),
    Field::new("productHeat", I64),
    Field::new("accumulator", BOOL4),
    Field::new("inputEnergyPerTick", I64),
    Field::new("outputEnergyPerTick", I64),
    Field::new("maxAcuEnergy", I64),
    Field::new("exchanger", BOOL4),
    Field::new("exchangeEnergyPerTick", I64),
    Field::new("emptyId", I32),
    Field::new("fullId", I32),
    Field::new("consumer", BOOL4),
    Field::new("charger", BOOL4),
    Field::new("workEnergyPerTick", I64),
    Field::new("idleEnergyPerTick", I64),
];

static BUILD_CONDITION_FIELDS: &[Field] = &[
    Field::new("landPoints", SchemaNode::Array(&VEC3)),
    Field::new("landOffset", F32),
    Field::new("allowBuildInWater", BOOL4),
    Field::new("needBuildInWaterTech", BOOL4),
    Field::new("waterPoints", SchemaNode::Array(&VEC3)),
    Field::new("waterTypes", SchemaNode::Array(&I32)),
    Field::new("multiLevel", BOOL4),
    Field::new("multiLevelAllowInserter", BOOL4),
    Field::new("multiLevelAllowRotate", BOOL4),
    Field::new("multiLevelAlternativeIds", SchemaNode::Array(&I32)),
    Field::new("multiLevelAlternativeYawTransposes", SchemaNode::Array(&BOOL4)),
    Field::new("addonType", SchemaNode::Primitive(Primitive::Enum(&ADDON_TYPE))),
    Field::new("lapJoint", VEC3),
    Field::new("veinMiner", BOOL4),
    Field::new("oilMiner", BOOL4),
    Field::new("dragBuild", BOOL4),
    Field::new("dragBuildDistOverride", VEC2),
    Field::new("blueprintBoxSizeOverride", VEC2),
];

static STATION_FIELDS: &[Field] = &[
    Field::new("isStellar", BOOL4),
    Field::new("maxItemCount", I32),
    Field::new("maxItemKinds", I32),
    Field::new("maxDroneCount", I32),
    Field::new("maxShipCount", I32),
    Field::new("maxEnergyAcc", I64),
    Field::new("dronePoint", VEC3),
    Field::new("shipPoint", VEC3),
    Field::new("isCollector", BOOL4),
    Field::new("collectSpeed", I32),
    Field::new("isVeinCollector", BOOL4),
];

static BELT_FIELDS: &[Field] = &[
    Field::new("beltPrototype", I32),
    Field::new("speed", I32),
];

static MINER_FIELDS: &[Field] = &[
    Field::new("minerType", SchemaNode::Primitive(Primitive::Enum(&MINER_TYPE))),
    Field::new("periodf", F32),
];

static ASSEMBLER_FIELDS: &[Field] = &[
    Field::new("recipeType", SchemaNode::Primitive(Primitive::Enum(&RECIPE_TYPE))),
    Field::new("speedf", F32),
];

static LAB_FIELDS: &[Field] = &[
    Field::new("assembleSpeed", F32),
    Field::new("researchSpeed", F32),
];

static SPRAYCOATER_FIELDS: &[Field] = &[
    Field::new("incCapacity", I32),
    Field::new("incItemId", SchemaNode::Array(&I32)),
];

static STORAGE_FIELDS: &[Field] = &[
    Field::new("colCount", I32),
    Field::new("rowCount", I32),
];

static TANK_FIELDS: &[Field] = &[Field::new("fluidStorageCount", I32)];

static INSERTER_FIELDS: &[Field] = &[
    Field::new("grade", I32),
    Field::new("sttf", F32),
    Field::new("delayf", F32),
    Field::new("canStack", BOOL4),
    Field::new("stackSize", I32),
];

static FIELD_GENERATOR_FIELDS: &[Field] = &[
    Field::new("energyCapacity", I64),
    Field::new("energyRequire0", I64),
    Field::new("energyRequire1", I64),
];

static BEACON_FIELDS: &[Field] = &[
    Field::new("signalRadius", F32),
    Field::new("ROF", I32),
    Field::new("spaceSignalRange", F32),
    Field::new("pitchUpMax", F32),
    Field::new("pitchDownMax", F32),
];

static AMMO_FIELDS: &[Field] = &[
    Field::new("blastRadius0", F32),
    Field::new("blastRadius1", F32),
    Field::new("blastFallof", F32),
    Field::new("moveAcc", F32),
    Field::new("turnAcc", F32),
    Field::new("hitIndex", I32),
    Field::new("parameter0", I32),
];

static DISPENSER_FIELDS: &[Field] = &[
    Field::new("maxCourierCount", I32),
    Field::new("maxEnergyAcc", I64),
];

static EJECTOR_FIELDS: &[Field] = &[
    Field::new("pivotY", F32),
    Field::new("muzzleY", F32),
    Field::new("chargeFrame", I32),
    Field::new("coldFrame", I32),
    Field::new("bulletProtoId", I32),
];

static SILO_FIELDS: &[Field] = &[
    Field::new("chargeFrame", I32),
    Field::new("coldFrame", I32),
    Field::new("bulletProtoId", I32),
];

static MINIMAP_FIELDS: &[Field] = &[Field::new("type", I32)];

static MONITOR_FIELDS: &[Field] = &[
    Field::new("offset", I32),
    Field::new("targetCargoBytes", I32),
    Field::new("periodTickCount", I32),
    Field::new("passOperator", I32),
    Field::new("passColorId", I32),
    Field::new("failColorId", I32),
    Field::new("systemWarningMode", I32),
    Field::new("monitorMode", I32),
    Field::new("cargoFilter", I32),
    Field::new("signalId", I32),
    Field::new("spawnOperator", I32),
];

static SPEAKER_FIELDS: &[Field] = &[
    Field::new("tone", I32),
    Field::new("volume", I32),
    Field::new("pitch", I32),
    Field::new("length", F32),
    Field::new("repeat", BOOL4),
];

static EMPTY_FIELDS: &[Field] = &[];

static BATTLE_BASE_FIELDS: &[Field] = &[
    Field::new("maxEnergyAcc", I64),
    Field::new("pickRange", F32),
];

static CONSTRUCTION_FIELDS: &[Field] = &[
    Field::new("droneCount", I32),
    Field::new("buildRange", F32),
    Field::new("droneEjectPos", VEC3),
];

fn i64_in(object: &Object, name: &str, min: i64, max: i64) -> bool {
    matches!(object.get_i64(name), Ok(value) if value >= min && value <= max)
}

fn f32_in(object: &Object, name: &str, min: f32, max: f32) -> bool {
    matches!(object.get_f32(name), Ok(value) if value.is_finite() && value >= min && value <= max)
}

const ENERGY_CAP: i64 = 10_000_000_000;

fn power_plausible(object: &Object) -> bool {
    f32_in(object, "connectDistance", 0.0, 120.0)
        && f32_in(object, "coverRadius", 0.0, 120.0)
        && i64_in(object, "genEnergyPerTick", 0, ENERGY_CAP)
        && i64_in(object, "useFuelPerTick", 0, ENERGY_CAP)
        && i64_in(object, "workEnergyPerTick", 0, ENERGY_CAP)
        && i64_in(object, "idleEnergyPerTick", 0, ENERGY_CAP)
}

fn build_condition_plausible(object: &Object) -> bool {
    i64_in(object, "addonType", 0, 2) && f32_in(object, "landOffset", -10.0, 10.0)
}

fn station_plausible(object: &Object) -> bool {
    i64_in(object, "maxItemCount", 1, 100_000)
        && i64_in(object, "maxItemKinds", 0, 100)
        && i64_in(object, "maxDroneCount", 0, 1_000)
        && i64_in(object, "maxShipCount", 0, 100)
        && i64_in(object, "maxEnergyAcc", 0, 1_000_000_000_000)
}

fn belt_plausible(object: &Object) -> bool {
    i64_in(object, "speed", 1, 10) && i64_in(object, "beltPrototype", 0, 100_000)
}

fn miner_plausible(object: &Object) -> bool {
    i64_in(object, "minerType", 0, 3) && f32_in(object, "periodf", 0.0, 100.0)
}

fn assembler_plausible(object: &Object) -> bool {
    i64_in(object, "recipeType", 0, 15) && f32_in(object, "speedf", 0.01, 100.0)
}

fn lab_plausible(object: &Object) -> bool {
    f32_in(object, "assembleSpeed", 0.01, 100.0) && f32_in(object, "researchSpeed", 0.01, 100.0)
}

fn spraycoater_plausible(object: &Object) -> bool {
    i64_in(object, "incCapacity", 1, 1_000_000)
}

fn storage_plausible(object: &Object) -> bool {
    i64_in(object, "colCount", 1, 100) && i64_in(object, "rowCount", 1, 100)
}

fn tank_plausible(object: &Object) -> bool {
    i64_in(object, "fluidStorageCount", 1, 1_000_000)
}

fn inserter_plausible(object: &Object) -> bool {
    i64_in(object, "grade", 1, 10)
        && f32_in(object, "sttf", 0.0, 10.0)
        && f32_in(object, "delayf", 0.0, 10.0)
        && i64_in(object, "stackSize", 1, 100)
}

fn field_generator_plausible(object: &Object) -> bool {
    i64_in(object, "energyCapacity", 0, 1_000_000_000_000)
        && i64_in(object, "energyRequire0", 0, ENERGY_CAP)
        && i64_in(object, "energyRequire1", 0, ENERGY_CAP)
}

fn beacon_plausible(object: &Object) -> bool {
    f32_in(object, "signalRadius", 0.0, 1_000.0) && i64_in(object, "ROF", 0, 10_000)
}

fn ammo_plausible(object: &Object) -> bool {
    f32_in(object, "blastRadius0", 0.0, 100.0)
        && f32_in(object, "blastRadius1", 0.0, 100.0)
        && f32_in(object, "moveAcc", -100.0, 100.0)
}

fn dispenser_plausible(object: &Object) -> bool {
    i64_in(object, "maxCourierCount", 1, 1_000)
        && i64_in(object, "maxEnergyAcc", 0, 1_000_000_000_000)
}

fn ejector_plausible(object: &Object) -> bool {
    i64_in(object, "chargeFrame", 0, 100_000)
        && i64_in(object, "coldFrame", 0, 100_000)
        && i64_in(object, "bulletProtoId", 0, 100_000)
}

fn silo_plausible(object: &Object) -> bool {
    ejector_plausible(object)
}

fn minimap_plausible(object: &Object) -> bool {
    i64_in(object, "type", 0, 32)
}

fn monitor_plausible(object: &Object) -> bool {
    i64_in(object, "periodTickCount", 1, 3_600) && i64_in(object, "passOperator", 0, 10)
}

fn speaker_plausible(object: &Object) -> bool {
    i64_in(object, "tone", 0, 10_000) && f32_in(object, "length", 0.0, 100.0)
}

fn empty_plausible(_object: &Object) -> bool {
    true
}

fn battle_base_plausible(object: &Object) -> bool {
    i64_in(object, "maxEnergyAcc", 0, 1_000_000_000_000)
        && f32_in(object, "pickRange", 0.0, 1_000.0)
}

fn construction_plausible(object: &Object) -> bool {
    i64_in(object, "droneCount", 1, 1_000) && f32_in(object, "buildRange", 0.0, 1_000.0)
}

/// All calibratable descriptors.
///
/// `SlotConfig` is absent: its layout references transform components that
/// cannot be decoded without deep scene-graph traversal. `TurretDesc` is
/// absent pending a confirmed turret category enum.
pub static REGISTRY: &[DescriptorSpec] = &[
    DescriptorSpec {
        name: "PowerDesc",
        key: "power",
        fields: POWER_FIELDS,
        size: SizeHint::Fixed(152),
        anchor_item: 2203,
        plausible: power_plausible,
    },
    DescriptorSpec {
        name: "BuildConditionConfig",
        key: "build_condition",
        fields: BUILD_CONDITION_FIELDS,
        size: SizeHint::Variable,
        anchor_item: 2303,
        plausible: build_condition_plausible,
    },
    DescriptorSpec {
        name: "StationDesc",
        key: "station",
        fields: STATION_FIELDS,
        size: SizeHint::Fixed(64),
        anchor_item: 2103,
        plausible: station_plausible,
    },
    DescriptorSpec {
        name: "BeltDesc",
        key: "belt",
        fields: BELT_FIELDS,
        size: SizeHint::Fixed(8),
        anchor_item: 2001,
        plausible: belt_plausible,
    },
    DescriptorSpec {
        name: "MinerDesc",
        key: "miner",
        fields: MINER_FIELDS,
        size: SizeHint::Fixed(8),
        anchor_item: 2301,
        plausible: miner_plausible,
    },
    DescriptorSpec {
        name: "AssemblerDesc",
        key: "assembler",
        fields: ASSEMBLER_FIELDS,
        size: SizeHint::Fixed(8),
        anchor_item: 2303,
        plausible: assembler_plausible,
    },
    DescriptorSpec {
        name: "LabDesc",
        key: "lab",
        fields: LAB_FIELDS,
        size: SizeHint::Fixed(8),
        anchor_item: 2901,
        plausible: lab_plausible,
    },
    DescriptorSpec {
        name: "SpraycoaterDesc",
        key: "spraycoater",
        fields: SPRAYCOATER_FIELDS,
        size: SizeHint::Variable,
        anchor_item: 2313,
        plausible: spraycoater_plausible,
    },
    DescriptorSpec {
        name: "StorageDesc",
        key: "storage",
        fields: STORAGE_FIELDS,
        size: SizeHint::Fixed(8),
        anchor_item: 2101,
        plausible: storage_plausible,
    },
    DescriptorSpec {
        name: "TankDesc",
        key: "tank",
        fields: TANK_FIELDS,
        size: SizeHint::Fixed(4),
        anchor_item: 2106,
        plausible: tank_plausible,
    },
    DescriptorSpec {
        name: "InserterDesc",
        key: "inserter",
        fields: INSERTER_FIELDS,
        size: SizeHint::Fixed(20),
        anchor_item: 2011,
        plausible: inserter_plausible,
    },
    DescriptorSpec {
        name: "FieldGeneratorDesc",
        key: "field_generator",
        fields: FIELD_GENERATOR_FIELDS,
        size: SizeHint::Fixed(24),
        anchor_item: 3004,
        plausible: field_generator_plausible,
    },
    DescriptorSpec {
        name: "BeaconDesc",
        key: "beacon",
        fields: BEACON_FIELDS,
        size: SizeHint::Fixed(20),
        anchor_item: 3003,
        plausible: beacon_plausible,
    },
    DescriptorSpec {
        name: "AmmoDesc",
        key: "ammo",
        fields: AMMO_FIELDS,
        size: SizeHint::Fixed(28),
        anchor_item: 1601,
        plausible: ammo_plausible,
    },
    DescriptorSpec {
        name: "DispenserDesc",
        key: "dispenser",
        fields: DISPENSER_FIELDS,
        size: SizeHint::Fixed(12),
        anchor_item: 2107,
        plausible: dispenser_plausible,
    },
    DescriptorSpec {
        name: "EjectorDesc",
        key: "ejector",
        fields: EJECTOR_FIELDS,
        size: SizeHint::Fixed(20),
        anchor_item: 2311,
        plausible: ejector_plausible,
    },
    DescriptorSpec {
        name: "SiloDesc",
        key: "silo",
        fields: SILO_FIELDS,
        size: SizeHint::Fixed(12),
        anchor_item: 2312,
        plausible: silo_plausible,
    },
    DescriptorSpec {
        name: "MinimapConfig",
        key: "minimap",
        fields: MINIMAP_FIELDS,
        size: SizeHint::Fixed(4),
        anchor_item: 2303,
        plausible: minimap_plausible,
    },
    DescriptorSpec {
        name: "MonitorDesc",
        key: "monitor",
        fields: MONITOR_FIELDS,
        size: SizeHint::Fixed(44),
        anchor_item: 2030,
        plausible: monitor_plausible,
    },
    DescriptorSpec {
        name: "SpeakerDesc",
        key: "speaker",
        fields: SPEAKER_FIELDS,
        size: SizeHint::Fixed(20),
        anchor_item: 2030,
        plausible: speaker_plausible,
    },
    DescriptorSpec {
        name: "SplitterDesc",
        key: "splitter",
        fields: EMPTY_FIELDS,
        size: SizeHint::Fixed(0),
        anchor_item: 2020,
        plausible: empty_plausible,
    },
    DescriptorSpec {
        name: "PilerDesc",
        key: "piler",
        fields: EMPTY_FIELDS,
        size: SizeHint::Fixed(0),
        anchor_item: 2040,
        plausible: empty_plausible,
    },
    DescriptorSpec {
        name: "BattleBaseDesc",
        key: "battle_base",
        fields: BATTLE_BASE_FIELDS,
        size: SizeHint::Fixed(12),
        anchor_item: 3009,
        plausible: battle_base_plausible,
    },
    DescriptorSpec {
        name: "ConstructionModuleDesc",
        key: "construction",
        fields: CONSTRUCTION_FIELDS,
        size: SizeHint::Fixed(20),
        anchor_item: 3009,
        plausible: construction_plausible,
    },
    DescriptorSpec {
        name: "DroneDesc",
        key: "drone",
        fields: EMPTY_FIELDS,
        size: SizeHint::Fixed(0),
        anchor_item: 5001,
        plausible: empty_plausible,
    },
];

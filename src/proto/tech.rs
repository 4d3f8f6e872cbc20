//! Technology table records.

use crate::file::cursor::BoolWidth;
use crate::schema::{Field, Object, Primitive, SchemaNode, Value};
use crate::Result;

use super::{HasId, Proto};

static TECH_FIELDS: &[Field] = &[
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("id", SchemaNode::Primitive(Primitive::I32)),
    Field::new("sid", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("description", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("conclusion", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("published", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("isHiddenTech", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("preItem", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("level", SchemaNode::Primitive(Primitive::I32)),
    Field::new("maxLevel", SchemaNode::Primitive(Primitive::I32)),
    Field::new("levelCoef1", SchemaNode::Primitive(Primitive::I32)),
    Field::new("levelCoef2", SchemaNode::Primitive(Primitive::I32)),
    Field::new("iconPath", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("isLabTech", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("preTechs", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("preTechsImplicit", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("preTechsMax", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("items", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("itemPoints", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("propertyOverrideItems", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("propertyItemCounts", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("hashNeeded", SchemaNode::Primitive(Primitive::I64)),
    Field::new("unlockRecipes", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("unlockFunctions", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("unlockValues", SchemaNode::Array(&SchemaNode::Primitive(Primitive::Bytes(8)))),
    Field::new("addItems", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("addItemCounts", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("position", SchemaNode::Primitive(Primitive::Vec2)),
];

/// One record of the technology table.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct TechProto {
    pub name: String,
    pub id: i32,
    pub sid: String,
    pub description: String,
    pub conclusion: String,
    /// Whether the technology appears in the research tree. Unpublished
    /// entries are editor leftovers.
    pub published: bool,
    pub is_hidden_tech: bool,
    pub pre_item: Vec<i32>,
    pub level: i32,
    pub max_level: i32,
    pub level_coef1: i32,
    pub level_coef2: i32,
    pub icon_path: String,
    pub is_lab_tech: bool,
    pub pre_techs: Vec<i32>,
    pub pre_techs_implicit: Vec<i32>,
    pub pre_techs_max: bool,
    /// Research matrix identifiers, parallel to `item_points`.
    pub items: Vec<i32>,
    pub item_points: Vec<i32>,
    pub property_override_items: Vec<i32>,
    pub property_item_counts: Vec<i32>,
    pub hash_needed: i64,
    pub unlock_recipes: Vec<i32>,
    pub unlock_functions: Vec<i32>,
    /// Raw 8-byte payloads, parallel to `unlock_functions`.
    pub unlock_values: Vec<[u8; 8]>,
    pub add_items: Vec<i32>,
    pub add_item_counts: Vec<i32>,
    pub position: [f32; 2],
}

impl Proto for TechProto {
    const TABLE_NAME: &'static str = "TechProtoSet";

    fn fields() -> &'static [Field] {
        TECH_FIELDS
    }

    fn from_object(mut object: Object) -> Result<TechProto> {
        let unlock_values = match object.take("unlockValues") {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(|value| match value {
                    Value::Bytes(bytes) => <[u8; 8]>::try_from(bytes.as_slice())
                        .map_err(|_| malformed_error!("Unlock value is not 8 bytes")),
                    other => Err(malformed_error!(
                        "Unlock value is not a byte run: {:?}",
                        other
                    )),
                })
                .collect::<Result<Vec<[u8; 8]>>>()?,
            _ => return Err(malformed_error!("Missing field 'unlockValues'")),
        };

        Ok(TechProto {
            name: object.take_str("name")?,
            id: object.get_i32("id")?,
            sid: object.take_str("sid")?,
            description: object.take_str("description")?,
            conclusion: object.take_str("conclusion")?,
            published: object.get_bool("published")?,
            is_hidden_tech: object.get_bool("isHiddenTech")?,
            pre_item: object.take_i32_array("preItem")?,
            level: object.get_i32("level")?,
            max_level: object.get_i32("maxLevel")?,
            level_coef1: object.get_i32("levelCoef1")?,
            level_coef2: object.get_i32("levelCoef2")?,
            icon_path: object.take_str("iconPath")?,
            is_lab_tech: object.get_bool("isLabTech")?,
            pre_techs: object.take_i32_array("preTechs")?,
            pre_techs_implicit: object.take_i32_array("preTechsImplicit")?,
            pre_techs_max: object.get_bool("preTechsMax")?,
            items: object.take_i32_array("items")?,
            item_points: object.take_i32_array("itemPoints")?,
            property_override_items: object.take_i32_array("propertyOverrideItems")?,
            property_item_counts: object.take_i32_array("propertyItemCounts")?,
            hash_needed: object.get_i64("hashNeeded")?,
            unlock_recipes: object.take_i32_array("unlockRecipes")?,
            unlock_functions: object.take_i32_array("unlockFunctions")?,
            unlock_values,
            add_items: object.take_i32_array("addItems")?,
            add_item_counts: object.take_i32_array("addItemCounts")?,
            position: object.get_vec2("position")?,
        })
    }
}

impl HasId for TechProto {
    fn id(&self) -> i32 {
        self.id
    }
}

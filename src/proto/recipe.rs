//! Recipe table records.

use crate::file::cursor::BoolWidth;
use crate::schema::enums::{RecipeType, RECIPE_TYPE};
use crate::schema::{Field, Object, Primitive, SchemaNode};
use crate::Result;

use super::{HasId, Proto};

static RECIPE_FIELDS: &[Field] = &[
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("id", SchemaNode::Primitive(Primitive::I32)),
    Field::new("sid", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("type", SchemaNode::Primitive(Primitive::Enum(&RECIPE_TYPE))),
    Field::new("handcraft", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("explicit", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
    Field::new("timeSpend", SchemaNode::Primitive(Primitive::I32)),
    Field::new("items", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("itemCounts", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("results", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("resultCounts", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
    Field::new("gridIndex", SchemaNode::Primitive(Primitive::I32)),
    Field::new("iconPath", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("description", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("nonProductive", SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four))),
];

/// One record of the recipe table.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct RecipeProto {
    pub name: String,
    pub id: i32,
    pub sid: String,
    /// Raw facility discriminant; see [`RecipeProto::kind`].
    pub kind_raw: i64,
    pub handcraft: bool,
    pub explicit: bool,
    /// Crafting duration in ticks.
    pub time_spend: i32,
    /// Input item identifiers, parallel to `item_counts`.
    pub items: Vec<i32>,
    pub item_counts: Vec<i32>,
    /// Output item identifiers, parallel to `result_counts`.
    pub results: Vec<i32>,
    pub result_counts: Vec<i32>,
    pub grid_index: i32,
    pub icon_path: String,
    pub description: String,
    pub non_productive: bool,
}

impl RecipeProto {
    /// Facility kind, when the raw discriminant is known.
    #[must_use]
    pub fn kind(&self) -> Option<RecipeType> {
        i32::try_from(self.kind_raw)
            .ok()
            .and_then(RecipeType::from_repr)
    }
}

impl Proto for RecipeProto {
    const TABLE_NAME: &'static str = "RecipeProtoSet";

    fn fields() -> &'static [Field] {
        RECIPE_FIELDS
    }

    fn from_object(mut object: Object) -> Result<RecipeProto> {
        Ok(RecipeProto {
            name: object.take_str("name")?,
            id: object.get_i32("id")?,
            sid: object.take_str("sid")?,
            kind_raw: object.get_i64("type")?,
            handcraft: object.get_bool("handcraft")?,
            explicit: object.get_bool("explicit")?,
            time_spend: object.get_i32("timeSpend")?,
            items: object.take_i32_array("items")?,
            item_counts: object.take_i32_array("itemCounts")?,
            results: object.take_i32_array("results")?,
            result_counts: object.take_i32_array("resultCounts")?,
            grid_index: object.get_i32("gridIndex")?,
            icon_path: object.take_str("iconPath")?,
            description: object.take_str("description")?,
            non_productive: object.get_bool("nonProductive")?,
        })
    }
}

impl HasId for RecipeProto {
    fn id(&self) -> i32 {
        self.id
    }
}

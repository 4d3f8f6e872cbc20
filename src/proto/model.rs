//! Model table records.

use crate::schema::enums::{ObjectType, RuinType, OBJECT_TYPE, RUIN_TYPE};
use crate::schema::{Field, Object, Primitive, SchemaNode};
use crate::Result;

use super::{HasId, Proto};

static MODEL_FIELDS: &[Field] = &[
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("id", SchemaNode::Primitive(Primitive::I32)),
    Field::new("sid", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("type", SchemaNode::Primitive(Primitive::Enum(&OBJECT_TYPE))),
    Field::new("ruin", SchemaNode::Primitive(Primitive::Enum(&RUIN_TYPE))),
    Field::new("rendererType", SchemaNode::Primitive(Primitive::I32)),
    Field::new("hpMax", SchemaNode::Primitive(Primitive::I32)),
    Field::new("hpUpgrade", SchemaNode::Primitive(Primitive::I32)),
    Field::new("hpRecover", SchemaNode::Primitive(Primitive::I32)),
    Field::new("ruinId", SchemaNode::Primitive(Primitive::I32)),
    Field::new("ruinCount", SchemaNode::Primitive(Primitive::I32)),
    Field::new("ruinLifeTime", SchemaNode::Primitive(Primitive::I32)),
    Field::new("prefabPath", SchemaNode::Primitive(Primitive::Str { align: true })),
];

/// One record of the model table.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct ModelProto {
    pub name: String,
    pub id: i32,
    pub sid: String,
    /// Raw object category discriminant; see [`ModelProto::kind`].
    pub kind_raw: i64,
    /// Raw ruin behavior discriminant; see [`ModelProto::ruin`].
    pub ruin_raw: i64,
    pub renderer_type: i32,
    pub hp_max: i32,
    pub hp_upgrade: i32,
    pub hp_recover: i32,
    pub ruin_id: i32,
    pub ruin_count: i32,
    pub ruin_life_time: i32,
    pub prefab_path: String,
}

impl ModelProto {
    /// Object category, when the raw discriminant is known.
    #[must_use]
    pub fn kind(&self) -> Option<ObjectType> {
        i32::try_from(self.kind_raw)
            .ok()
            .and_then(ObjectType::from_repr)
    }

    /// Ruin behavior, when the raw discriminant is known.
    #[must_use]
    pub fn ruin(&self) -> Option<RuinType> {
        i32::try_from(self.ruin_raw)
            .ok()
            .and_then(RuinType::from_repr)
    }
}

impl Proto for ModelProto {
    const TABLE_NAME: &'static str = "ModelProtoSet";

    fn fields() -> &'static [Field] {
        MODEL_FIELDS
    }

    fn from_object(mut object: Object) -> Result<ModelProto> {
        Ok(ModelProto {
            name: object.take_str("name")?,
            id: object.get_i32("id")?,
            sid: object.take_str("sid")?,
            kind_raw: object.get_i64("type")?,
            ruin_raw: object.get_i64("ruin")?,
            renderer_type: object.get_i32("rendererType")?,
            hp_max: object.get_i32("hpMax")?,
            hp_upgrade: object.get_i32("hpUpgrade")?,
            hp_recover: object.get_i32("hpRecover")?,
            ruin_id: object.get_i32("ruinId")?,
            ruin_count: object.get_i32("ruinCount")?,
            ruin_life_time: object.get_i32("ruinLifeTime")?,
            prefab_path: object.take_str("prefabPath")?,
        })
    }
}

impl HasId for ModelProto {
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

    #[test]
    fn model_record_decodes() {
        let mut data = Vec::new();
        push_str(&mut data, "assembler-mk1");
        data.extend_from_slice(&103i32.to_le_bytes());
        push_str(&mut data, "");
        for value in [0i32, 2, 1, 1200, 300, 0, 205, 1, 3600] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        push_str(&mut data, "Entities/Prefabs/assembler-mk-1");

        let mut cursor = Cursor::new(&data, Endian::Little);
        let object = decode_object(&mut cursor, MODEL_FIELDS).unwrap();
        let model = ModelProto::from_object(object).unwrap();

        assert_eq!(model.id, 103);
        assert_eq!(model.kind(), Some(ObjectType::Entity));
        assert_eq!(model.ruin(), Some(RuinType::Normal));
        assert_eq!(model.hp_max, 1200);
        assert_eq!(model.prefab_path, "Entities/Prefabs/assembler-mk-1");
        assert_eq!(cursor.remaining(), 0);
    }
}

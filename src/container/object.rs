//! Shallow resolution of serialized object references.
//!
//! Serialized objects reference each other through file/path pointer pairs.
//! Resolution follows a pointer to its directory entry and decodes the common
//! header of the target: game objects yield their component pointer list,
//! behaviours yield their script pointer and the position of their
//! script-specific payload. Resolution is shallow, so reference cycles in
//! the object graph terminate naturally, and memoized, so shared targets
//! decode once.

use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostics::DiagnosticCategory;
use crate::file::cursor::{BoolWidth, Cursor};
use crate::schema::{decode_object, Field, Primitive, SchemaNode};
use crate::Result;

use super::record;
use super::ContainerFile;

/// A serialized object reference: file index and path identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PPtr {
    /// Index of the container the target lives in; 0 for the local container.
    pub file_id: i32,
    /// Path identifier of the target.
    pub path_id: i64,
}

/// Decoded header of a game object.
#[derive(Debug, Clone)]
pub struct GameObjectInfo {
    /// Path identifier of the game object.
    pub path_id: i64,
    /// Object name.
    pub name: String,
    /// Render layer.
    pub layer: u32,
    /// Tag index.
    pub tag: u16,
    /// Whether the object is active in its scene.
    pub is_active: bool,
    /// References to the object's components, unresolved.
    pub components: Vec<PPtr>,
}

/// Decoded header of a script-backed behaviour.
#[derive(Debug, Clone)]
pub struct BehaviourInfo {
    /// Path identifier of the behaviour.
    pub path_id: i64,
    /// Behaviour name, usually empty.
    pub name: String,
    /// Owning game object.
    pub game_object: PPtr,
    /// Whether the behaviour is enabled.
    pub enabled: bool,
    /// Reference to the script that defines the payload layout.
    pub script: PPtr,
    /// Offset within the payload where the script-specific data begins.
    pub data_start: usize,
}

/// Result of resolving a path identifier.
#[derive(Debug, Clone)]
pub enum ResolvedObject {
    /// A game object with its component pointer list.
    GameObject(GameObjectInfo),
    /// A script-backed behaviour with its script reference.
    Behaviour(BehaviourInfo),
    /// An object of a class resolution does not decode.
    Other {
        /// Path identifier of the object.
        path_id: i64,
        /// Engine class identifier.
        class_id: i32,
        /// Engine class name, when known.
        class_name: Option<&'static str>,
    },
    /// No directory entry carries this path identifier.
    Missing {
        /// The unresolvable path identifier.
        path_id: i64,
    },
}

impl ResolvedObject {
    /// Path identifier this resolution describes.
    #[must_use]
    pub fn path_id(&self) -> i64 {
        match self {
            ResolvedObject::GameObject(info) => info.path_id,
            ResolvedObject::Behaviour(info) => info.path_id,
            ResolvedObject::Other { path_id, .. } | ResolvedObject::Missing { path_id } => *path_id,
        }
    }
}

/// Memoization table shared across resolutions of one container.
pub type ObjectMemo = HashMap<i64, Rc<ResolvedObject>>;

static PPTR_FIELDS: &[Field] = &[
    Field::new("fileID", SchemaNode::Primitive(Primitive::I32)),
    Field::new("pathID", SchemaNode::Primitive(Primitive::I64)),
];

static GAME_OBJECT_FIELDS: &[Field] = &[
    Field::new("components", SchemaNode::Array(&SchemaNode::Object(PPTR_FIELDS))),
    Field::new("layer", SchemaNode::Primitive(Primitive::U32)),
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: false })),
    Field::new("tag", SchemaNode::Primitive(Primitive::U16)),
    Field::new(
        "isActive",
        SchemaNode::Primitive(Primitive::Bool(BoolWidth::One)),
    ),
];

static BEHAVIOUR_FIELDS: &[Field] = &[
    Field::new("gameObject", SchemaNode::Object(PPTR_FIELDS)),
    Field::new(
        "enabled",
        SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four)),
    ),
    Field::new("script", SchemaNode::Object(PPTR_FIELDS)),
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: false })),
];

fn pptr_from(value: &crate::schema::Value) -> Result<PPtr> {
    match value {
        crate::schema::Value::Object(object) => Ok(PPtr {
            file_id: object.get_i32("fileID")?,
            path_id: object.get_i64("pathID")?,
        }),
        other => Err(malformed_error!("Expected reference object, got {:?}", other)),
    }
}

impl ContainerFile {
    /// Resolves a path identifier to its object header.
    ///
    /// Targets already present in `memo` are returned without decoding.
    /// Resolution is shallow: component pointers are returned unresolved, so
    /// reference cycles in the object graph never recurse.
    ///
    /// An absent path yields [`ResolvedObject::Missing`] and a resolution
    /// diagnostic rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when a present target's header
    /// fails to decode.
    pub fn resolve_object(
        &self,
        path_id: i64,
        memo: &mut ObjectMemo,
    ) -> Result<Rc<ResolvedObject>> {
        if let Some(existing) = memo.get(&path_id) {
            return Ok(Rc::clone(existing));
        }

        let Some(asset) = self.record_by_path(path_id) else {
            self.diagnostics().warning(
                DiagnosticCategory::Resolution,
                format!("Reference to path {} has no directory entry", path_id),
            );
            let missing = Rc::new(ResolvedObject::Missing { path_id });
            memo.insert(path_id, Rc::clone(&missing));
            return Ok(missing);
        };

        let resolved = match asset.class_id {
            record::CLASS_GAME_OBJECT => {
                let mut cursor = self.payload_cursor(asset)?;
                ResolvedObject::GameObject(decode_game_object(path_id, &mut cursor)?)
            }
            record::CLASS_SCRIPTED_BEHAVIOUR => {
                let mut cursor = self.payload_cursor(asset)?;
                ResolvedObject::Behaviour(decode_behaviour(path_id, &mut cursor)?)
            }
            class_id => ResolvedObject::Other {
                path_id,
                class_id,
                class_name: record::class_name(class_id),
            },
        };

        let resolved = Rc::new(resolved);
        memo.insert(path_id, Rc::clone(&resolved));
        Ok(resolved)
    }
}

fn decode_game_object(path_id: i64, cursor: &mut Cursor<'_>) -> Result<GameObjectInfo> {
    let mut object = decode_object(cursor, GAME_OBJECT_FIELDS)?;

    let components = match object.take("components") {
        Some(crate::schema::Value::Array(values)) => values
            .iter()
            .map(pptr_from)
            .collect::<Result<Vec<PPtr>>>()?,
        _ => return Err(malformed_error!("Game object without component list")),
    };

    Ok(GameObjectInfo {
        path_id,
        name: object.take_str("name")?,
        layer: u32::try_from(object.get_i64("layer")?)
            .map_err(|_| malformed_error!("Layer out of range"))?,
        tag: u16::try_from(object.get_i64("tag")?)
            .map_err(|_| malformed_error!("Tag out of range"))?,
        is_active: object.get_bool("isActive")?,
        components,
    })
}

fn decode_behaviour(path_id: i64, cursor: &mut Cursor<'_>) -> Result<BehaviourInfo> {
    let mut object = decode_object(cursor, BEHAVIOUR_FIELDS)?;

    let game_object = pptr_from(
        object
            .get("gameObject")
            .ok_or_else(|| malformed_error!("Behaviour without owner reference"))?,
    )?;
    let script = pptr_from(
        object
            .get("script")
            .ok_or_else(|| malformed_error!("Behaviour without script reference"))?,
    )?;

    Ok(BehaviourInfo {
        path_id,
        name: object.take_str("name")?,
        game_object,
        enabled: object.get_bool("enabled")?,
        script,
        data_start: cursor.pos(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::cursor::Endian;

    fn pptr_bytes(file_id: i32, path_id: i64) -> Vec<u8> {
        let mut out = file_id.to_le_bytes().to_vec();
        out.extend_from_slice(&path_id.to_le_bytes());
        out
    }

    #[test]
    fn game_object_header_decodes() {
        let mut data = Vec::new();
        data.extend_from_slice(&2i32.to_le_bytes());
        data.extend(pptr_bytes(0, 77));
        data.extend(pptr_bytes(0, 78));
        data.extend_from_slice(&9u32.to_le_bytes());
        data.extend_from_slice(&8i32.to_le_bytes());
        data.extend_from_slice(b"conveyor");
        data.extend_from_slice(&5u16.to_le_bytes());
        data.push(1);

        let mut cursor = Cursor::new(&data, Endian::Little);
        let info = decode_game_object(10, &mut cursor).unwrap();

        assert_eq!(info.name, "conveyor");
        assert_eq!(info.layer, 9);
        assert_eq!(info.tag, 5);
        assert!(info.is_active);
        assert_eq!(
            info.components,
            vec![
                PPtr {
                    file_id: 0,
                    path_id: 77
                },
                PPtr {
                    file_id: 0,
                    path_id: 78
                }
            ]
        );
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn behaviour_header_marks_data_start() {
        let mut data = Vec::new();
        data.extend(pptr_bytes(0, 11));
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend(pptr_bytes(0, 900));
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&[0xAA, 0xBB]);

        let mut cursor = Cursor::new(&data, Endian::Little);
        let info = decode_behaviour(42, &mut cursor).unwrap();

        assert_eq!(info.game_object.path_id, 11);
        assert_eq!(info.script.path_id, 900);
        assert!(info.enabled);
        assert_eq!(info.name, "");
        assert_eq!(info.data_start, data.len() - 2);
    }
}

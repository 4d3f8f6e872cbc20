//! Schema-driven decoding of serialized object payloads.
//!
//! The game's data tables are flat binary records with no self-description: the
//! layout of each record kind is known ahead of time and expressed here as a
//! static tree of [`crate::schema::SchemaNode`] values. Decoding walks the tree
//! against a [`crate::file::cursor::Cursor`] and produces dynamically-typed
//! [`crate::schema::Value`]s, which the typed table layer then converts into
//! concrete record structs.
//!
//! # Architecture
//!
//! - [`crate::schema::SchemaNode`] - One node of a layout tree: a primitive, a
//!   field list, an array, or a computed hook for data-dependent layouts
//! - [`crate::schema::Primitive`] - Leaf encodings, including length-prefixed
//!   strings and closed enumerations
//! - [`crate::schema::Value`] / [`crate::schema::Object`] - Decoded results
//! - [`crate::schema::decode`] - The tree walker
//! - [`crate::schema::fixed_size`] - Serialized size of layouts with no
//!   variable-length parts
//!
//! Layouts are `&'static` so record kinds can be described once as constants
//! and referenced from registries without allocation.
//!
//! # Usage Examples
//!
//! ```rust
//! use dysonscope::file::cursor::{Cursor, Endian};
//! use dysonscope::schema::{decode, Field, Primitive, SchemaNode};
//!
//! static POINT: &[Field] = &[
//!     Field::new("x", SchemaNode::Primitive(Primitive::I32)),
//!     Field::new("y", SchemaNode::Primitive(Primitive::I32)),
//! ];
//!
//! let data = [7, 0, 0, 0, 9, 0, 0, 0];
//! let mut cursor = Cursor::new(&data, Endian::Little);
//! let value = decode(&mut cursor, &SchemaNode::Object(POINT))?;
//! let object = value.into_object()?;
//! assert_eq!(object.get_i64("x")?, 7);
//! # Ok::<(), dysonscope::Error>(())
//! ```

pub mod enums;

use crate::file::cursor::{BoolWidth, Cursor};
use crate::Result;
use enums::{EnumTable, EnumWidth};

/// Hook for layouts whose shape depends on previously decoded fields.
///
/// The hook receives the cursor positioned after the preceding fields and the
/// partially decoded object, and returns the value for its field.
pub type ComputedFn = fn(&mut Cursor<'_>, &Object) -> Result<Value>;

/// A named field inside an object layout.
#[derive(Debug)]
pub struct Field {
    /// Field name, used as the key in the decoded [`Object`].
    pub name: &'static str,
    /// Layout of the field's value.
    pub node: SchemaNode,
}

impl Field {
    /// Creates a field entry.
    #[must_use]
    pub const fn new(name: &'static str, node: SchemaNode) -> Field {
        Field { name, node }
    }
}

/// One node of a static layout tree.
#[derive(Debug)]
pub enum SchemaNode {
    /// A leaf value.
    Primitive(Primitive),
    /// A sequence of named fields decoded in order.
    Object(&'static [Field]),
    /// A count-prefixed sequence of uniform elements. The count is a signed
    /// 32-bit value; an empty array still consumes its four count bytes.
    Array(&'static SchemaNode),
    /// A sequence of uniform elements with a length fixed by the layout.
    FixedArray(&'static SchemaNode, usize),
    /// A count-prefixed run of raw bytes.
    ByteArray,
    /// A data-dependent value produced by a hook.
    Computed(ComputedFn),
    /// Rounds the cursor up to a 4-byte boundary, producing no value.
    Align,
}

/// Leaf encodings of the serialization format.
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Boolean of the given serialized width.
    Bool(BoolWidth),
    /// Length-prefixed UTF-8 string. When `align` is set the cursor is rounded
    /// to a 4-byte boundary after the character bytes.
    Str {
        /// Whether trailing padding follows the character bytes.
        align: bool,
    },
    /// A fixed number of raw bytes.
    Bytes(usize),
    /// Two consecutive 32-bit floats.
    Vec2,
    /// Three consecutive 32-bit floats.
    Vec3,
    /// A closed enumeration, stored at the width its table declares.
    Enum(&'static EnumTable),
}

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer of any width.
    Int(i64),
    /// Unsigned integer of any width.
    UInt(u64),
    /// Float of any width.
    Float(f64),
    /// String.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Two-component vector.
    Vec2([f32; 2]),
    /// Three-component vector.
    Vec3([f32; 3]),
    /// Enumeration value, keeping the raw discriminant so unknown values
    /// survive decoding.
    Enum {
        /// The table this value belongs to.
        table: &'static EnumTable,
        /// The raw discriminant as stored.
        raw: i64,
    },
    /// Homogeneous sequence.
    Array(Vec<Value>),
    /// Named field collection.
    Object(Object),
}

impl Value {
    /// The variant name of an enumeration value, if the discriminant is known.
    #[must_use]
    pub fn enum_name(&self) -> Option<&'static str> {
        match self {
            Value::Enum { table, raw } => (table.lookup)(*raw),
            _ => None,
        }
    }

    /// Converts into an [`Object`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for any other variant.
    pub fn into_object(self) -> Result<Object> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(malformed_error!("Expected object value, got {:?}", other)),
        }
    }
}

/// A decoded object: named fields in layout order.
///
/// Field lookup is linear, which is appropriate for the small fixed layouts
/// of the data tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    fields: Vec<(&'static str, Value)>,
}

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Object {
        Object { fields: Vec::new() }
    }

    /// Appends a field.
    pub fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Iterates over fields in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Removes and returns a field by name.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(field, _)| *field == name)?;
        Some(self.fields.remove(index).1)
    }

    fn missing(name: &str) -> crate::Error {
        malformed_error!("Missing field '{}'", name)
    }

    /// Returns a signed integer field, accepting any integer encoding.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not an integer.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Int(value)) => Ok(*value),
            Some(Value::UInt(value)) => i64::try_from(*value)
                .map_err(|_| malformed_error!("Field '{}' out of range", name)),
            Some(Value::Enum { raw, .. }) => Ok(*raw),
            Some(other) => Err(malformed_error!("Field '{}' is not integral: {:?}", name, other)),
            None => Err(Self::missing(name)),
        }
    }

    /// Returns an integer field narrowed to `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent, not an
    /// integer, or out of range.
    pub fn get_i32(&self, name: &str) -> Result<i32> {
        i32::try_from(self.get_i64(name)?)
            .map_err(|_| malformed_error!("Field '{}' out of range", name))
    }

    /// Returns a float field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not a float.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Float(value)) => Ok(*value),
            Some(other) => Err(malformed_error!("Field '{}' is not a float: {:?}", name, other)),
            None => Err(Self::missing(name)),
        }
    }

    /// Returns a float field narrowed to `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not a float.
    pub fn get_f32(&self, name: &str) -> Result<f32> {
        Ok(self.get_f64(name)? as f32)
    }

    /// Returns a boolean field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not a boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(Value::Bool(value)) => Ok(*value),
            Some(other) => Err(malformed_error!(
                "Field '{}' is not a boolean: {:?}",
                name,
                other
            )),
            None => Err(Self::missing(name)),
        }
    }

    /// Removes and returns a string field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not a string.
    pub fn take_str(&mut self, name: &str) -> Result<String> {
        match self.take(name) {
            Some(Value::Str(value)) => Ok(value),
            Some(other) => Err(malformed_error!(
                "Field '{}' is not a string: {:?}",
                name,
                other
            )),
            None => Err(Self::missing(name)),
        }
    }

    /// Returns a two-component vector field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not a vector.
    pub fn get_vec2(&self, name: &str) -> Result<[f32; 2]> {
        match self.get(name) {
            Some(Value::Vec2(value)) => Ok(*value),
            Some(other) => Err(malformed_error!(
                "Field '{}' is not a vector: {:?}",
                name,
                other
            )),
            None => Err(Self::missing(name)),
        }
    }

    /// Removes and returns an integer array field as `Vec<i32>`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent, not an
    /// array, or holds non-integer elements.
    pub fn take_i32_array(&mut self, name: &str) -> Result<Vec<i32>> {
        match self.take(name) {
            Some(Value::Array(values)) => values
                .into_iter()
                .map(|value| match value {
                    Value::Int(value) => i32::try_from(value)
                        .map_err(|_| malformed_error!("Element of '{}' out of range", name)),
                    other => Err(malformed_error!(
                        "Element of '{}' is not integral: {:?}",
                        name,
                        other
                    )),
                })
                .collect(),
            Some(other) => Err(malformed_error!(
                "Field '{}' is not an array: {:?}",
                name,
                other
            )),
            None => Err(Self::missing(name)),
        }
    }

    /// Removes and returns a byte run field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the field is absent or not bytes.
    pub fn take_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        match self.take(name) {
            Some(Value::Bytes(value)) => Ok(value),
            Some(other) => Err(malformed_error!(
                "Field '{}' is not a byte run: {:?}",
                name,
                other
            )),
            None => Err(Self::missing(name)),
        }
    }
}

impl IntoIterator for Object {
    type Item = (&'static str, Value);
    type IntoIter = std::vec::IntoIter<(&'static str, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Decodes one layout node from the cursor.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] for implausible counts, invalid
/// booleans, or invalid strings, and [`crate::Error::OutOfBounds`] for
/// truncated data.
pub fn decode(cursor: &mut Cursor<'_>, node: &SchemaNode) -> Result<Value> {
    match node {
        SchemaNode::Primitive(primitive) => decode_primitive(cursor, *primitive),
        SchemaNode::Object(fields) => Ok(Value::Object(decode_object(cursor, fields)?)),
        SchemaNode::Array(element) => {
            let count = read_count(cursor)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(decode(cursor, element)?);
            }
            Ok(Value::Array(values))
        }
        SchemaNode::FixedArray(element, count) => {
            let mut values = Vec::with_capacity(*count);
            for _ in 0..*count {
                values.push(decode(cursor, element)?);
            }
            Ok(Value::Array(values))
        }
        SchemaNode::ByteArray => {
            let count = read_count(cursor)?;
            Ok(Value::Bytes(cursor.read_bytes(count)?.to_vec()))
        }
        SchemaNode::Computed(_) | SchemaNode::Align => Err(malformed_error!(
            "Layout node is only valid inside an object field list"
        )),
    }
}

/// Decodes a field list into an [`Object`].
///
/// [`SchemaNode::Align`] fields adjust the cursor and produce no entry;
/// [`SchemaNode::Computed`] fields see the object decoded so far.
///
/// # Errors
///
/// Propagates the same errors as [`decode`].
pub fn decode_object(cursor: &mut Cursor<'_>, fields: &'static [Field]) -> Result<Object> {
    let mut object = Object::new();
    for field in fields {
        match &field.node {
            SchemaNode::Align => cursor.align4(),
            SchemaNode::Computed(hook) => {
                let value = hook(cursor, &object)?;
                object.push(field.name, value);
            }
            node => {
                let value = decode(cursor, node)?;
                object.push(field.name, value);
            }
        }
    }
    Ok(object)
}

fn read_count(cursor: &mut Cursor<'_>) -> Result<usize> {
    let count = cursor.read::<i32>()?;
    if count < 0 {
        return Err(malformed_error!("Negative element count {}", count));
    }
    let count = count as usize;
    if count > cursor.remaining() {
        return Err(malformed_error!(
            "Element count {} exceeds remaining {} bytes",
            count,
            cursor.remaining()
        ));
    }
    Ok(count)
}

fn decode_primitive(cursor: &mut Cursor<'_>, primitive: Primitive) -> Result<Value> {
    Ok(match primitive {
        Primitive::I8 => Value::Int(i64::from(cursor.read::<i8>()?)),
        Primitive::I16 => Value::Int(i64::from(cursor.read::<i16>()?)),
        Primitive::I32 => Value::Int(i64::from(cursor.read::<i32>()?)),
        Primitive::I64 => Value::Int(cursor.read::<i64>()?),
        Primitive::U8 => Value::UInt(u64::from(cursor.read::<u8>()?)),
        Primitive::U16 => Value::UInt(u64::from(cursor.read::<u16>()?)),
        Primitive::U32 => Value::UInt(u64::from(cursor.read::<u32>()?)),
        Primitive::U64 => Value::UInt(cursor.read::<u64>()?),
        Primitive::F32 => Value::Float(f64::from(cursor.read::<f32>()?)),
        Primitive::F64 => Value::Float(cursor.read::<f64>()?),
        Primitive::Bool(width) => Value::Bool(cursor.read_bool(width)?),
        Primitive::Str { align } => Value::Str(cursor.read_str(align)?),
        Primitive::Bytes(count) => Value::Bytes(cursor.read_bytes(count)?.to_vec()),
        Primitive::Vec2 => {
            let x = cursor.read::<f32>()?;
            let y = cursor.read::<f32>()?;
            Value::Vec2([x, y])
        }
        Primitive::Vec3 => {
            let x = cursor.read::<f32>()?;
            let y = cursor.read::<f32>()?;
            let z = cursor.read::<f32>()?;
            Value::Vec3([x, y, z])
        }
        Primitive::Enum(table) => {
            let raw = match table.width {
                EnumWidth::I32 => i64::from(cursor.read::<i32>()?),
                EnumWidth::U32 => i64::from(cursor.read::<u32>()?),
            };
            Value::Enum { table, raw }
        }
    })
}

/// Serialized size in bytes of a layout with no variable-length parts.
///
/// Returns `None` when the layout contains strings, counted arrays, computed
/// hooks, or alignment, whose size depends on position or data.
#[must_use]
pub fn fixed_size(node: &SchemaNode) -> Option<usize> {
    match node {
        SchemaNode::Primitive(primitive) => match primitive {
            Primitive::I8 | Primitive::U8 => Some(1),
            Primitive::I16 | Primitive::U16 => Some(2),
            Primitive::I32 | Primitive::U32 | Primitive::F32 | Primitive::Enum(_) => Some(4),
            Primitive::I64 | Primitive::U64 | Primitive::F64 => Some(8),
            Primitive::Bool(width) => match width {
                BoolWidth::One => Some(1),
                BoolWidth::Two => Some(2),
                BoolWidth::Four => Some(4),
            },
            Primitive::Bytes(count) => Some(*count),
            Primitive::Vec2 => Some(8),
            Primitive::Vec3 => Some(12),
            Primitive::Str { .. } => None,
        },
        SchemaNode::Object(fields) => {
            let mut total = 0_usize;
            for field in *fields {
                total = total.checked_add(fixed_size(&field.node)?)?;
            }
            Some(total)
        }
        SchemaNode::FixedArray(element, count) => fixed_size(element)?.checked_mul(*count),
        SchemaNode::Array(_)
        | SchemaNode::ByteArray
        | SchemaNode::Computed(_)
        | SchemaNode::Align => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::cursor::Endian;
    use enums::ITEM_TYPE;

    static SAMPLE: &[Field] = &[
        Field::new("id", SchemaNode::Primitive(Primitive::I32)),
        Field::new("kind", SchemaNode::Primitive(Primitive::Enum(&ITEM_TYPE))),
        Field::new("grades", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
        Field::new("weight", SchemaNode::Primitive(Primitive::F32)),
    ];

    fn le_bytes(words: &[i32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_nested_object() {
        let mut data = le_bytes(&[1001, 1, 2, 5, 6]);
        data.extend_from_slice(&1.5f32.to_le_bytes());

        let mut cursor = Cursor::new(&data, Endian::Little);
        let object = decode_object(&mut cursor, SAMPLE).unwrap();

        assert_eq!(object.get_i64("id").unwrap(), 1001);
        assert_eq!(object.get("kind").unwrap().enum_name(), Some("Resource"));
        assert_eq!(
            object.clone().take_i32_array("grades").unwrap(),
            vec![5, 6]
        );
        assert_eq!(object.get_f32("weight").unwrap(), 1.5);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn empty_array_consumes_count_bytes() {
        let data = le_bytes(&[0, 7]);
        let mut cursor = Cursor::new(&data, Endian::Little);
        let value = decode(
            &mut cursor,
            &SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32)),
        )
        .unwrap();
        assert_eq!(value, Value::Array(Vec::new()));
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn implausible_count_is_malformed() {
        let data = le_bytes(&[1_000_000]);
        let mut cursor = Cursor::new(&data, Endian::Little);
        let result = decode(
            &mut cursor,
            &SchemaNode::Array(&SchemaNode::Primitive(Primitive::U8)),
        );
        assert!(matches!(result, Err(crate::Error::Malformed { .. })));

        let data = le_bytes(&[-1]);
        let mut cursor = Cursor::new(&data, Endian::Little);
        let result = decode(&mut cursor, &SchemaNode::ByteArray);
        assert!(matches!(result, Err(crate::Error::Malformed { .. })));
    }

    #[test]
    fn unknown_enum_value_survives() {
        let data = le_bytes(&[99]);
        let mut cursor = Cursor::new(&data, Endian::Little);
        let value = decode(
            &mut cursor,
            &SchemaNode::Primitive(Primitive::Enum(&ITEM_TYPE)),
        )
        .unwrap();
        assert!(matches!(value, Value::Enum { raw: 99, .. }));
        assert_eq!(value.enum_name(), None);
    }

    #[test]
    fn align_fields_pad_without_output() {
        static ALIGNED: &[Field] = &[
            Field::new("flag", SchemaNode::Primitive(Primitive::Bool(BoolWidth::One))),
            Field::new("_align", SchemaNode::Align),
            Field::new("value", SchemaNode::Primitive(Primitive::I32)),
        ];

        let data = [1, 0xFF, 0xFF, 0xFF, 42, 0, 0, 0];
        let mut cursor = Cursor::new(&data, Endian::Little);
        let object = decode_object(&mut cursor, ALIGNED).unwrap();

        assert_eq!(object.len(), 2);
        assert!(object.get_bool("flag").unwrap());
        assert_eq!(object.get_i64("value").unwrap(), 42);
    }

    #[test]
    fn computed_field_sees_prior_fields() {
        fn tail(cursor: &mut Cursor<'_>, so_far: &Object) -> Result<Value> {
            let count = so_far.get_i64("count")? as usize;
            Ok(Value::Bytes(cursor.read_bytes(count)?.to_vec()))
        }

        static COMPUTED: &[Field] = &[
            Field::new("count", SchemaNode::Primitive(Primitive::I32)),
            Field::new("payload", SchemaNode::Computed(tail)),
        ];

        let data = [2, 0, 0, 0, 0xAA, 0xBB];
        let mut cursor = Cursor::new(&data, Endian::Little);
        let mut object = decode_object(&mut cursor, COMPUTED).unwrap();
        assert_eq!(object.take_bytes("payload").unwrap(), vec![0xAA, 0xBB]);
    }

    #[test]
    fn fixed_size_of_layouts() {
        static FLAT: &[Field] = &[
            Field::new("a", SchemaNode::Primitive(Primitive::I32)),
            Field::new("b", SchemaNode::Primitive(Primitive::F32)),
            Field::new("c", SchemaNode::Primitive(Primitive::Vec2)),
        ];
        assert_eq!(fixed_size(&SchemaNode::Object(FLAT)), Some(16));

        static VARIABLE: &[Field] = &[
            Field::new("a", SchemaNode::Primitive(Primitive::I32)),
            Field::new("b", SchemaNode::Array(&SchemaNode::Primitive(Primitive::I32))),
        ];
        assert_eq!(fixed_size(&SchemaNode::Object(VARIABLE)), None);

        assert_eq!(
            fixed_size(&SchemaNode::FixedArray(
                &SchemaNode::Primitive(Primitive::I16),
                6
            )),
            Some(12)
        );
    }
}

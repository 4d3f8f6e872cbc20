//! Typed decoding of the game's data tables.
//!
//! Each data table is serialized as a header (file name, display name,
//! signature) followed by a count-prefixed array of uniform records. The
//! [`Proto`] trait ties a record type to its table name and layout;
//! [`ProtoSet`] decodes a whole table into typed records.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dysonscope::container::ContainerFile;
//! use dysonscope::proto::{ItemProto, ProtoSet};
//!
//! let container = ContainerFile::open("resources.assets")?;
//! let items = ProtoSet::<ItemProto>::load(&container)?;
//! for item in &items.entries {
//!     println!("{} ({})", item.name, item.id);
//! }
//! # Ok::<(), dysonscope::Error>(())
//! ```

mod item;
mod model;
mod recipe;
mod tech;

pub use item::ItemProto;
pub use model::ModelProto;
pub use recipe::RecipeProto;
pub use tech::TechProto;

use crate::container::ContainerFile;
use crate::file::cursor::Cursor;
use crate::schema::{decode_object, Field, Object};
use crate::Result;

/// A record type of one of the game's data tables.
pub trait Proto: Sized {
    /// Serialized table name, which is also the asset name of the table.
    const TABLE_NAME: &'static str;

    /// Layout of one record.
    fn fields() -> &'static [Field];

    /// Converts a decoded field collection into the typed record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when fields are missing or carry
    /// unexpected types, which indicates a layout drift between game
    /// versions.
    fn from_object(object: Object) -> Result<Self>;
}

/// A decoded data table.
#[derive(Debug, Clone)]
pub struct ProtoSet<T> {
    /// Serialized file name, matching the table's asset name.
    pub file_name: String,
    /// Display name of the table.
    pub table_name: String,
    /// Version signature of the table content.
    pub signature: String,
    /// The decoded records.
    pub entries: Vec<T>,
}

impl<T: Proto> ProtoSet<T> {
    /// Decodes a table from a cursor positioned past the data table marker.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when the serialized file name does
    /// not match the expected table, or when any record fails to decode.
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<ProtoSet<T>> {
        let file_name = cursor.read_str(true)?;
        if file_name != T::TABLE_NAME {
            return Err(malformed_error!(
                "Table names itself '{}', expected '{}'",
                file_name,
                T::TABLE_NAME
            ));
        }
        let table_name = cursor.read_str(true)?;
        let signature = cursor.read_str(true)?;

        let count = cursor.read::<i32>()?;
        if count < 0 || count as usize > cursor.remaining() {
            return Err(malformed_error!("Implausible record count {}", count));
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let object = decode_object(cursor, T::fields())?;
            entries.push(T::from_object(object)?);
        }

        Ok(ProtoSet {
            file_name,
            table_name,
            signature,
            entries,
        })
    }

    /// Loads and decodes this table from a container by its asset name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AssetNotFound`] when the container has no
    /// record named after the table, plus the errors of
    /// [`ProtoSet::decode`].
    pub fn load(container: &ContainerFile) -> Result<ProtoSet<T>> {
        let mut cursor = container.table_cursor(T::TABLE_NAME)?;
        Self::decode(&mut cursor)
    }

    /// Looks up a record by numeric identifier.
    #[must_use]
    pub fn by_id(&self, id: i32) -> Option<&T>
    where
        T: HasId,
    {
        self.entries.iter().find(|entry| entry.id() == id)
    }
}

/// Records addressable by a numeric identifier.
pub trait HasId {
    /// The record's numeric identifier.
    fn id(&self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::cursor::Endian;

    fn push_str(out: &mut Vec<u8>, text: &str) {
        out.extend_from_slice(&(text.len() as i32).to_le_bytes());
        out.extend_from_slice(text.as_bytes());
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    #[test]
    fn wrong_table_name_is_rejected() {
        let mut data = Vec::new();
        push_str(&mut data, "RecipeProtoSet");
        push_str(&mut data, "Recipes");
        push_str(&mut data, "0.10");
        data.extend_from_slice(&0i32.to_le_bytes());

        let mut cursor = Cursor::new(&data, Endian::Little);
        let result = ProtoSet::<ItemProto>::decode(&mut cursor);
        assert!(matches!(result, Err(crate::Error::Malformed { .. })));
    }

    #[test]
    fn empty_table_decodes() {
        let mut data = Vec::new();
        push_str(&mut data, "ItemProtoSet");
        push_str(&mut data, "Items");
        push_str(&mut data, "0.10");
        data.extend_from_slice(&0i32.to_le_bytes());

        let mut cursor = Cursor::new(&data, Endian::Little);
        let set = ProtoSet::<ItemProto>::decode(&mut cursor).unwrap();
        assert_eq!(set.table_name, "Items");
        assert_eq!(set.signature, "0.10");
        assert!(set.entries.is_empty());
        assert_eq!(cursor.remaining(), 0);
    }
}

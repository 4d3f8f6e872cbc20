//! Serialized asset container parsing.
//!
//! A container file holds a big-endian directory (header, type table, asset
//! table, preload table, dependencies) followed by the serialized object
//! payloads the directory points into. This module parses the directory into
//! typed structures and hands out payload cursors for the decoding layers.
//!
//! # Architecture
//!
//! Loading is a single forward pass over the directory:
//!
//! 1. Header with format version and byte order flag
//! 2. Type table of [`crate::container::TypeDescriptor`] entries
//! 3. Asset table of [`crate::container::AssetRecord`] entries
//! 4. Preload table and external dependencies
//! 5. Secondary reference type list (format 20 and later)
//!
//! Texture entries are decoded eagerly during the pass, matching the access
//! pattern of the icon extraction layer; everything else is decoded on
//! demand through payload cursors. Payload regions are always little-endian
//! regardless of the directory's byte order flag.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dysonscope::container::ContainerFile;
//!
//! let container = ContainerFile::open("resources.assets")?;
//! println!(
//!     "format {} with {} assets",
//!     container.format(),
//!     container.records().len()
//! );
//!
//! let mut table = container.table_cursor("ItemProtoSet")?;
//! # Ok::<(), dysonscope::Error>(())
//! ```

mod object;
pub mod record;
pub mod typedesc;

pub use object::{BehaviourInfo, GameObjectInfo, ObjectMemo, PPtr, ResolvedObject};
pub use record::AssetRecord;
pub use typedesc::{RuntimePlatform, TypeDescriptor};

use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::file::cursor::{Cursor, Endian};
use crate::file::File;
use crate::texture::TextureRecord;
use crate::Result;

use std::collections::HashMap;
use std::path::Path;

use uguid::Guid;

/// Preload table entries beyond this are treated as directory corruption.
const PRELOAD_CEILING: u32 = 2000;

/// Marker preceding a serialized data table payload: a null object reference,
/// a single enabled byte, and padding.
pub const TABLE_MARKER: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0];

/// Bytes skipped after the marker before table content begins.
const TABLE_MARKER_SKIP: usize = 12;

/// One preload table entry.
#[derive(Debug, Clone, Copy)]
pub struct Preload {
    /// Index of the file the preloaded object lives in.
    pub file_id: u32,
    /// Path identifier of the preloaded object.
    pub path_id: u64,
}

/// One external container dependency.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Engine-internal buffered path, usually empty.
    pub buffered_path: String,
    /// Identity of the referenced container.
    pub guid: Guid,
    /// Dependency kind flag.
    pub kind: u32,
    /// Path of the referenced container.
    pub asset_path: String,
}

/// A parsed asset container.
///
/// Owns the underlying [`crate::file::File`] and the decoded directory.
/// Payload data is borrowed from the backing storage, so cursors remain
/// valid for the container's lifetime.
#[derive(Debug)]
pub struct ContainerFile {
    file: File,
    format: u32,
    metadata_size: u64,
    declared_size: u64,
    offset_first_payload: u64,
    endian: Endian,
    engine_version: String,
    platform: Option<RuntimePlatform>,
    types: Vec<TypeDescriptor>,
    records: Vec<AssetRecord>,
    preloads: Vec<Preload>,
    dependencies: Vec<Dependency>,
    secondary_types: Vec<TypeDescriptor>,
    textures: HashMap<i64, TextureRecord>,
    diagnostics: Diagnostics,
}

impl ContainerFile {
    /// Opens and parses a container from disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] or [`crate::Error::Empty`] for
    /// unreadable sources, [`crate::Error::NotSupported`] for containers
    /// carrying embedded type trees, and [`crate::Error::Malformed`] for
    /// directory corruption.
    pub fn open(path: impl AsRef<Path>) -> Result<ContainerFile> {
        Self::from_file(File::from_file(path)?)
    }

    /// Parses a container already loaded into memory.
    ///
    /// # Errors
    ///
    /// Same as [`ContainerFile::open`].
    pub fn from_memory(data: Vec<u8>) -> Result<ContainerFile> {
        Self::from_file(File::from_memory(data)?)
    }

    /// Parses a container from an existing [`crate::file::File`].
    ///
    /// # Errors
    ///
    /// Same as [`ContainerFile::open`].
    pub fn from_file(file: File) -> Result<ContainerFile> {
        let diagnostics = Diagnostics::new();
        let mut cursor = file.cursor(Endian::Big);

        // Outer header: skipped words, format, skipped word
        cursor.skip(8)?;
        let format = cursor.read::<u32>()?;
        cursor.skip(4)?;

        let (metadata_size, declared_size, offset_first_payload, endian_flag);
        if format >= 22 {
            metadata_size = cursor.read::<u64>()?;
            declared_size = cursor.read::<u64>()?;
            offset_first_payload = cursor.read::<u64>()?;
            endian_flag = cursor.read::<u32>()?;
            cursor.skip(4)?;
        } else {
            cursor.seek(0)?;
            metadata_size = u64::from(cursor.read::<u32>()?);
            declared_size = u64::from(cursor.read::<u32>()?);
            let reread_format = cursor.read::<u32>()?;
            debug_assert_eq!(reread_format, format);
            offset_first_payload = u64::from(cursor.read::<u32>()?);
            endian_flag = cursor.read::<u32>()?;
        }

        let endian = if endian_flag != 0 {
            Endian::Big
        } else {
            Endian::Little
        };
        cursor.set_endian(endian);

        let engine_version = cursor.read_cstr()?;
        let platform_raw = if format >= 17 {
            cursor.read::<u32>()?
        } else {
            u32::from(cursor.read::<u8>()?)
        };
        let platform = RuntimePlatform::from_repr(platform_raw);

        if cursor.read::<u8>()? != 0 {
            // Embedded type trees change every following structure.
            return Err(crate::Error::NotSupported);
        }

        if declared_size != 0 && declared_size != file.len() as u64 {
            diagnostics.warning(
                DiagnosticCategory::General,
                format!(
                    "Header declares {} bytes but container holds {}",
                    declared_size,
                    file.len()
                ),
            );
        }

        let type_count = cursor.read::<u32>()?;
        let mut types = Vec::with_capacity(type_count as usize);
        for _ in 0..type_count {
            types.push(TypeDescriptor::parse(&mut cursor, format, false)?);
        }

        let record_count = cursor.read::<u32>()?;
        let mut records = Vec::with_capacity(record_count as usize);
        if record_count > 0 {
            cursor.align4();
            for _ in 0..record_count {
                records.push(AssetRecord::parse(
                    &mut cursor,
                    format,
                    offset_first_payload,
                    file.len(),
                    &types,
                )?);
            }
        }

        let mut preloads = Vec::new();
        if format >= 11 {
            let preload_count = cursor.read::<u32>()?;
            if preload_count > PRELOAD_CEILING {
                return Err(malformed_error!(
                    "Implausible preload count {}",
                    preload_count
                ));
            }
            preloads.reserve(preload_count as usize);
            for _ in 0..preload_count {
                let file_id = cursor.read::<u32>()?;
                let path_id = if format >= 14 {
                    cursor.align4();
                    cursor.read::<u64>()?
                } else {
                    u64::from(cursor.read::<u32>()?)
                };
                preloads.push(Preload { file_id, path_id });
            }
        }

        let dependency_count = cursor.read::<u32>()?;
        let mut dependencies = Vec::with_capacity(dependency_count as usize);
        for _ in 0..dependency_count {
            let buffered_path = cursor.read_cstr()?;
            let guid = Guid::from_bytes(cursor.read_guid_bytes()?);
            let kind = cursor.read::<u32>()?;
            let asset_path = cursor.read_cstr()?;
            dependencies.push(Dependency {
                buffered_path,
                guid,
                kind,
                asset_path,
            });
        }

        let mut secondary_types = Vec::new();
        if format >= 20 {
            let secondary_count = cursor.read::<u32>()?;
            secondary_types.reserve(secondary_count as usize);
            for _ in 0..secondary_count {
                secondary_types.push(TypeDescriptor::parse(&mut cursor, format, true)?);
            }
        }

        let mut container = ContainerFile {
            file,
            format,
            metadata_size,
            declared_size,
            offset_first_payload,
            endian,
            engine_version,
            platform,
            types,
            records,
            preloads,
            dependencies,
            secondary_types,
            textures: HashMap::new(),
            diagnostics,
        };
        container.recover_names();
        container.decode_textures();
        Ok(container)
    }

    fn recover_names(&mut self) {
        let data = self.file.data();
        let mut names = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let name = record.recover_name(data, self.endian);
            if name.is_none() && record::has_serialized_name(record.class_id) {
                self.diagnostics.push(
                    crate::diagnostics::Diagnostic::new(
                        crate::diagnostics::DiagnosticSeverity::Warning,
                        DiagnosticCategory::NameRecovery,
                        "Leading name field failed plausibility checks",
                    )
                    .with_path_id(record.path_id)
                    .with_class_id(record.class_id),
                );
            }
            names.push(name);
        }
        for (record, name) in self.records.iter_mut().zip(names) {
            record.name = name;
        }
    }

    fn decode_textures(&mut self) {
        let mut textures = HashMap::new();
        for record in &self.records {
            if record.class_id != record::CLASS_TEXTURE_2D {
                continue;
            }
            match self
                .payload_cursor(record)
                .and_then(|mut cursor| TextureRecord::decode(&mut cursor))
            {
                Ok(texture) => {
                    textures.insert(record.path_id, texture);
                }
                Err(error) => {
                    self.diagnostics.push(
                        crate::diagnostics::Diagnostic::new(
                            crate::diagnostics::DiagnosticSeverity::Error,
                            DiagnosticCategory::General,
                            format!("Texture payload failed to decode: {error}"),
                        )
                        .with_path_id(record.path_id)
                        .with_offset(record.offset),
                    );
                }
            }
        }
        self.textures = textures;
    }

    /// Container format version.
    #[must_use]
    pub fn format(&self) -> u32 {
        self.format
    }

    /// Directory metadata size declared by the header.
    #[must_use]
    pub fn metadata_size(&self) -> u64 {
        self.metadata_size
    }

    /// Total container size declared by the header.
    #[must_use]
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Offset of the first object payload.
    #[must_use]
    pub fn offset_first_payload(&self) -> u64 {
        self.offset_first_payload
    }

    /// Byte order of the directory, from the header flag.
    #[must_use]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Engine version string from the header.
    #[must_use]
    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    /// Target platform, when the header's value is a known identifier.
    #[must_use]
    pub fn platform(&self) -> Option<RuntimePlatform> {
        self.platform
    }

    /// The serialized type table.
    #[must_use]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// The asset directory.
    #[must_use]
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    /// The preload table.
    #[must_use]
    pub fn preloads(&self) -> &[Preload] {
        &self.preloads
    }

    /// External container dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The secondary reference type list.
    #[must_use]
    pub fn secondary_types(&self) -> &[TypeDescriptor] {
        &self.secondary_types
    }

    /// Diagnostics collected while loading and decoding.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Looks up a directory entry by recovered name.
    #[must_use]
    pub fn record_by_name(&self, name: &str) -> Option<&AssetRecord> {
        self.records
            .iter()
            .find(|record| record.name.as_deref() == Some(name))
    }

    /// Looks up a directory entry by path identifier.
    #[must_use]
    pub fn record_by_path(&self, path_id: i64) -> Option<&AssetRecord> {
        self.records.iter().find(|record| record.path_id == path_id)
    }

    /// Eagerly decoded texture for a directory entry, if it is a texture and
    /// decoded cleanly.
    #[must_use]
    pub fn texture(&self, path_id: i64) -> Option<&TextureRecord> {
        self.textures.get(&path_id)
    }

    /// Creates a cursor over a record's payload.
    ///
    /// Payload regions are always little-endian, independent of the
    /// directory's byte order flag.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the record's span falls
    /// outside the container.
    pub fn payload_cursor(&self, record: &AssetRecord) -> Result<Cursor<'_>> {
        let offset = usize::try_from(record.offset)
            .map_err(|_| malformed_error!("Payload offset of path {} overflows", record.path_id))?;
        self.file.region(offset, record.size as usize, Endian::Little)
    }

    /// Creates a cursor positioned at the content of a named data table.
    ///
    /// The payload must begin with the data table marker; the cursor is
    /// returned positioned just past it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AssetNotFound`] when no record carries the
    /// name, and [`crate::Error::Malformed`] when the marker does not match.
    pub fn table_cursor(&self, name: &str) -> Result<Cursor<'_>> {
        let record = self
            .record_by_name(name)
            .ok_or_else(|| crate::Error::AssetNotFound(name.to_string()))?;
        let mut cursor = self.payload_cursor(record)?;
        if !consume_table_marker(&mut cursor)? {
            return Err(malformed_error!(
                "Payload of '{}' does not begin with a data table marker",
                name
            ));
        }
        Ok(cursor)
    }
}

/// Consumes the data table marker and its trailing skip region.
///
/// Returns `false` when the marker bytes do not match; the cursor position is
/// then unspecified.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if fewer than 28 bytes remain.
pub fn consume_table_marker(cursor: &mut Cursor<'_>) -> Result<bool> {
    let marker = cursor.read_bytes(TABLE_MARKER.len())?;
    if marker != TABLE_MARKER {
        return Ok(false);
    }
    cursor.skip(TABLE_MARKER_SKIP)?;
    Ok(true)
}

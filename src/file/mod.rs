//! File abstraction layer for container access.
//!
//! This module provides the foundational types for reading serialized asset containers
//! from disk or memory. A [`crate::file::File`] owns a [`crate::file::Backend`] that
//! serves raw bytes, and hands out [`crate::file::cursor::Cursor`] views for the
//! structured parsing layers above.
//!
//! # Key Components
//!
//! - [`crate::file::Backend`] - Trait for pluggable data sources
//! - [`crate::file::Physical`] - Memory-mapped file backend via `memmap2`
//! - [`crate::file::Memory`] - Owned in-memory buffer backend
//! - [`crate::file::File`] - Entry point that validates and wraps a backend
//! - [`crate::file::cursor`] - Endian-aware sequential reader
//! - [`crate::file::io`] - Primitive byte order conversions
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dysonscope::file::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("resources.assets"))?;
//! println!("Container size: {} bytes", file.len());
//! # Ok::<(), dysonscope::Error>(())
//! ```

pub mod cursor;
pub mod io;

mod memory;
mod physical;

pub use memory::Memory;
pub use physical::Physical;

use crate::{Error::Empty, Result};
use cursor::{Cursor, Endian};
use std::path::Path;

/// Trait abstracting over the storage of container bytes.
///
/// Implementations provide bounds-checked access to a contiguous byte region.
/// The two built-in backends are [`crate::file::Physical`] (memory-mapped files)
/// and [`crate::file::Memory`] (owned buffers).
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    ///
    /// This is equivalent to `self.data().len()` but may be more efficient
    /// for some backend implementations.
    fn len(&self) -> usize;
}

/// A loaded container file, backed by disk or memory.
///
/// `File` validates that the source holds at least some data and provides cursor
/// views over it. Structured interpretation of the bytes lives in
/// [`crate::container::ContainerFile`], which consumes a `File`.
///
/// # Examples
///
/// ```rust
/// use dysonscope::file::File;
///
/// let file = File::from_memory(vec![0x00, 0x01, 0x02, 0x03])?;
/// assert_eq!(file.len(), 4);
/// # Ok::<(), dysonscope::Error>(())
/// ```
pub struct File {
    backend: Box<dyn Backend>,
}

impl File {
    /// Loads a container file from disk using memory-mapped I/O.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if the file cannot be opened,
    /// [`crate::Error::Empty`] if it has no content, or [`crate::Error::Error`]
    /// if memory mapping fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<File> {
        Ok(File {
            backend: Box::new(Physical::new(path)?),
        })
    }

    /// Wraps a buffer that already holds the container bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Empty`] if the buffer is empty.
    pub fn from_memory(data: Vec<u8>) -> Result<File> {
        if data.is_empty() {
            return Err(Empty);
        }
        Ok(File {
            backend: Box::new(Memory::new(data)),
        })
    }

    /// The complete container data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.backend.data()
    }

    /// Total size of the container in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` when the container holds no bytes.
    ///
    /// Construction rejects empty sources, so this is `false` for any `File`
    /// obtained through the public constructors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.len() == 0
    }

    /// Returns a bounds-checked slice of the container data.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the container.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.backend.data_slice(offset, len)
    }

    /// Creates a cursor over the whole container in the given byte order.
    #[must_use]
    pub fn cursor(&self, endian: Endian) -> Cursor<'_> {
        Cursor::new(self.backend.data(), endian)
    }

    /// Creates a cursor over a sub-region of the container.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the region exceeds the container.
    pub fn region(&self, offset: usize, len: usize, endian: Endian) -> Result<Cursor<'_>> {
        Ok(Cursor::new(self.backend.data_slice(offset, len)?, endian))
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_memory_rejects_empty() {
        assert!(matches!(File::from_memory(Vec::new()), Err(Empty)));
    }

    #[test]
    fn region_cursor_is_scoped() {
        let file = File::from_memory(vec![0, 1, 2, 3, 4, 5, 6, 7]).unwrap();

        let mut cursor = file.region(4, 4, Endian::Little).unwrap();
        assert_eq!(cursor.read::<u32>().unwrap(), 0x0706_0504);
        assert!(cursor.read::<u8>().is_err());

        assert!(file.region(6, 4, Endian::Little).is_err());
    }
}

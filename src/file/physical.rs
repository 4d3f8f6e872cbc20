//! Physical file backend for memory-mapped I/O.
//!
//! This module provides the [`crate::file::physical::Physical`] backend that implements the
//! [`crate::file::Backend`] trait for accessing container files from disk using memory-mapped
//! I/O. This approach provides efficient access to large containers without loading the
//! entire content into memory upfront, while still allowing fast random access to any
//! object payload in the file.
//!
//! # Architecture
//!
//! The physical backend maps files directly into the process's virtual address space:
//!
//! - **Efficient memory usage** - Only requested portions are loaded into physical memory
//! - **Operating system optimization** - Leverages OS-level caching and paging
//! - **Lazy loading** - Pages are loaded on-demand as payload regions are accessed
//!
//! Containers holding texture atlases routinely reach hundreds of megabytes, while the
//! data tables of interest occupy a few kilobytes each; mapping avoids paying for the
//! dominant image payloads that are never touched.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dysonscope::file::{Physical, Backend};
//! use std::path::Path;
//!
//! let physical = Physical::new(Path::new("resources.assets"))?;
//! println!("File size: {} bytes", physical.len());
//!
//! // Metadata size field at the start of the big-endian header
//! let header = physical.data_slice(0, 8)?;
//! # Ok::<(), dysonscope::Error>(())
//! ```

use super::Backend;
use crate::{
    Error::{Empty, Error, FileError},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A file backend that uses memory-mapped I/O for efficient access to files on disk.
///
/// [`crate::file::physical::Physical`] maps a container file directly into the process's
/// virtual address space, eliminating the need to read the entire file upfront and
/// letting the operating system manage memory through demand paging.
///
/// All access operations include bounds checking to ensure memory safety.
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical file backend by memory-mapping the specified file.
    ///
    /// This method opens the file at the given path and creates a read-only memory
    /// mapping for it.
    ///
    /// # Arguments
    /// * `path` - Path to the container file on disk. Accepts `&Path`, `&str`, `String`, or `PathBuf`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened,
    /// [`crate::Error::Empty`] if the file has no content, or
    /// [`crate::Error::Error`] if memory mapping fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        let metadata = match file.metadata() {
            Ok(metadata) => metadata,
            Err(error) => return Err(FileError(error)),
        };
        if metadata.len() == 0 {
            return Err(Empty);
        }

        let mmap = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap,
            Err(error) => return Err(Error(error.to_string())),
        };

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        if offset_end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let result = Physical::new("does/not/exist.assets");
        assert!(matches!(result, Err(FileError(_))));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("dysonscope_empty_backend_test");
        fs::write(&path, []).unwrap();

        let result = Physical::new(&path);
        assert!(matches!(result, Err(Empty)));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn maps_real_bytes() {
        let dir = std::env::temp_dir();
        let path = dir.join("dysonscope_physical_backend_test");
        fs::write(&path, [0x00, 0x01, 0x02, 0x03]).unwrap();

        let physical = Physical::new(&path).unwrap();
        assert_eq!(physical.len(), 4);
        assert_eq!(physical.data_slice(1, 2).unwrap(), &[0x01, 0x02]);
        assert!(physical.data_slice(3, 2).is_err());

        let _ = fs::remove_file(&path);
    }
}

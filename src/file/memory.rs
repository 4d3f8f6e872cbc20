//! In-memory backend for containers already loaded into a buffer.
//!
//! [`crate::file::memory::Memory`] implements [`crate::file::Backend`] over an owned
//! `Vec<u8>`. It serves data that arrived over the network, was decompressed from an
//! archive, or was fabricated by tests, with the same bounds-checked access as the
//! memory-mapped [`crate::file::physical::Physical`] backend.

use super::Backend;
use crate::Result;

/// A backend that serves container data from an owned in-memory buffer.
///
/// # Examples
///
/// ```rust
/// use dysonscope::file::{Backend, Memory};
///
/// let memory = Memory::new(vec![0x00, 0x01, 0x02, 0x03]);
/// assert_eq!(memory.len(), 4);
/// assert_eq!(memory.data_slice(2, 2)?, &[0x02, 0x03]);
/// # Ok::<(), dysonscope::Error>(())
/// ```
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Creates a backend that takes ownership of `data`.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
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
        &self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

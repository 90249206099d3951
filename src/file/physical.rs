//! Memory-mapped file backend.
//!
//! [`Physical`] maps a stored buffer read-only into the address space, so decoding a large
//! record list doesn't require reading the whole file first. Pages are faulted in as the
//! reader touches them.

use super::Backend;
use crate::Result;

use memmap2::Mmap;
use std::{fs, path::Path};

/// A read-only memory-mapped file.
///
/// The file must not be modified while it is mapped. The reader treats the mapped bytes as
/// untrusted like any other buffer, but concurrent truncation by another process is outside of
/// what bounds checks can catch.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can't be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;
        Self::from_std_file(&file)
    }

    /// Map an already opened file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if mapping fails.
    pub fn from_std_file(file: &fs::File) -> Result<Physical> {
        // SAFETY: the mapping is read-only and the file is not modified by this crate
        let mmap = unsafe { Mmap::map(file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(out_of_bounds_error!(offset, len, self.data.len()))
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn into_data(self: Box<Self>) -> Vec<u8> {
        self.data.as_ref().to_vec()
    }
}

//! In-memory buffer backend.
//!
//! [`Memory`] owns an encoded buffer that is already resident, typically one fetched from a
//! database column or produced by [`crate::Builder::finish`] in the same process.

use super::Backend;
use crate::Result;

/// Owned in-memory buffer.
#[derive(Debug, Default)]
pub struct Memory {
    buffer: Vec<u8>,
}

impl Memory {
    /// Take ownership of an encoded buffer.
    #[must_use]
    pub fn new(buffer: Vec<u8>) -> Memory {
        Memory { buffer }
    }
}

impl From<Vec<u8>> for Memory {
    fn from(buffer: Vec<u8>) -> Self {
        Memory::new(buffer)
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.buffer.get(offset..end))
            .ok_or(out_of_bounds_error!(offset, len, self.buffer.len()))
    }

    fn data(&self) -> &[u8] {
        &self.buffer
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn into_data(self: Box<Self>) -> Vec<u8> {
        self.buffer
    }
}

//! Stored buffers and low-level wire helpers.
//!
//! Finished buffers usually end up in a database column or a file on disk. This module
//! abstracts over where the bytes live and keeps a validated [`crate::Reader`] next to them.
//!
//! # Key Components
//!
//! - [`RecordFile`] - Owns a buffer source and the reader borrowing it
//! - [`Backend`] - Trait for buffer sources
//! - [`Memory`] - Owned in-memory buffer
//! - [`Physical`] - Memory-mapped file
//! - [`io`] - Little-endian scalar encoding and wire constants
//!
//! # Examples
//!
//! ```rust,no_run
//! use shieldbuf::{records::TransactionInfo, RecordFile};
//! use std::path::Path;
//!
//! let file = RecordFile::from_file(Path::new("history.bin"))?;
//! let history: Vec<TransactionInfo> = file.decode_list()?;
//! println!("{} transactions", history.len());
//! # Ok::<(), shieldbuf::Error>(())
//! ```

pub mod io;

mod memory;
mod physical;

use std::path::Path;

pub use memory::Memory;
use ouroboros::self_referencing;
pub use physical::Physical;

use crate::{records, Error::Empty, Reader, ReaderConfig, Record, Result};

/// A source of buffer bytes. Implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedBuffer`] if the range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire buffer.
    fn data(&self) -> &[u8];

    /// Returns the size of the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the backend and return an owned copy of its bytes.
    fn into_data(self: Box<Self>) -> Vec<u8>;
}

#[self_referencing]
/// A stored buffer together with a reader over it.
///
/// Only the root offset is validated on load; fields are read lazily like with a plain
/// [`Reader`].
pub struct RecordFile {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// Reader borrowing the data.
    #[borrows(data)]
    #[covariant]
    reader: Reader<'this>,
}

impl RecordFile {
    /// Map the buffer stored at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can't be mapped, and
    /// [`crate::Error::Empty`] if it is empty.
    pub fn from_file(path: &Path) -> Result<RecordFile> {
        Self::from_file_with_config(path, ReaderConfig::default())
    }

    /// Map the buffer stored at `path` with a custom reader configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can't be mapped, and
    /// [`crate::Error::Empty`] if it is empty.
    pub fn from_file_with_config(path: &Path, config: ReaderConfig) -> Result<RecordFile> {
        let input = Physical::new(path)?;

        Self::load(input, config)
    }

    /// Take ownership of an in-memory buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if the buffer is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<RecordFile> {
        Self::from_mem_with_config(data, ReaderConfig::default())
    }

    /// Take ownership of an in-memory buffer with a custom reader configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if the buffer is empty.
    pub fn from_mem_with_config(data: Vec<u8>, config: ReaderConfig) -> Result<RecordFile> {
        let input = Memory::new(data);

        Self::load(input, config)
    }

    fn load<T: Backend + 'static>(data: T, config: ReaderConfig) -> Result<RecordFile> {
        if data.is_empty() {
            return Err(Empty);
        }

        RecordFile::try_new(Box::new(data), |data| {
            let reader = Reader::with_config(data.data(), config)?;
            // Reject a bad root early; fields are still validated lazily
            reader.root_position()?;
            Ok(reader)
        })
    }

    /// Size of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.borrow_data().len()
    }

    /// Returns `true` if the buffer is empty. Never the case for a loaded file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.borrow_data().is_empty()
    }

    /// The raw buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.borrow_data().data()
    }

    /// Borrow `len` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedBuffer`] if the range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.borrow_data().data_slice(offset, len)
    }

    /// The reader over the buffer.
    #[must_use]
    pub fn reader(&self) -> Reader<'_> {
        *self.borrow_reader()
    }

    /// Decode the buffer as a single record.
    ///
    /// # Errors
    /// Returns a decode error if the buffer is not a valid `R`.
    pub fn decode<R: Record>(&self) -> Result<R> {
        R::from_bytes_with(self.data(), *self.reader().config())
    }

    /// Decode the buffer as a list of records written by [`records::list_to_bytes`].
    ///
    /// # Errors
    /// Returns the first decode error encountered.
    pub fn decode_list<R: Record + Send>(&self) -> Result<Vec<R>> {
        records::list_from_bytes_with(self.data(), *self.reader().config())
    }

    /// Release the backend and return the bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.into_heads().data.into_data()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{records::AccountName, test::factories::records::alice, Error};

    #[test]
    fn from_mem() {
        let data = alice().to_bytes().unwrap();
        let file = RecordFile::from_mem(data.clone()).unwrap();

        assert_eq!(file.len(), data.len());
        assert_eq!(file.data_slice(0, 4).unwrap(), &data[..4]);
        assert_eq!(file.decode::<AccountName>().unwrap(), alice());
        assert_eq!(file.into_data(), data);
    }

    #[test]
    fn from_file() {
        let data = crate::records::list_to_bytes(&[alice(), AccountName::default()]).unwrap();
        let mut stored = tempfile::NamedTempFile::new().unwrap();
        stored.write_all(&data).unwrap();
        stored.flush().unwrap();

        let file = RecordFile::from_file(stored.path()).unwrap();
        let accounts: Vec<AccountName> = file.decode_list().unwrap();
        assert_eq!(accounts, vec![alice(), AccountName::default()]);
    }

    #[test]
    fn rejects_empty_and_bad_root() {
        assert!(matches!(RecordFile::from_mem(vec![]), Err(Error::Empty)));
        assert!(matches!(
            RecordFile::from_mem(vec![0x40, 0x00, 0x00, 0x00]),
            Err(Error::UnknownRootTable(0x40))
        ));
    }
}

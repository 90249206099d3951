//! Field directory (vtable) decoding.
//!
//! Every table starts with a signed 32-bit distance back to its directory:
//!
//! ```text
//! directory: [entry_count: u16][table_size: u16] ([slot: u16][offset: u16]) * entry_count
//! ```
//!
//! The explicit entry count bounds the directory, so entries for slots a reader doesn't know
//! (written by a newer schema) are simply never looked at. Several tables may point at the same
//! directory, but nothing here relies on that.

use crate::{
    file::io::{DIRECTORY_ENTRY_SIZE, DIRECTORY_HEADER_SIZE, SOFFSET_SIZE},
    reader::Reader,
    Result,
};

/// One entry of a field directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Slot number of the field
    pub slot: u16,
    /// Byte offset of the field from the table start
    pub offset: u16,
}

/// The decoded field directory of a single table.
///
/// Holds a borrowed slice of the raw entries; nothing is copied. The table region described by
/// the directory has been bounds-checked against the buffer when the directory was parsed.
#[derive(Clone, Copy, Debug)]
pub struct Directory<'a> {
    entries: &'a [u8],
    count: usize,
    table_size: usize,
    position: usize,
}

impl<'a> Directory<'a> {
    /// Locate and validate the directory of the table at `table`.
    ///
    /// # Errors
    /// Returns a bounds error if the directory or the table does not fit into the buffer, and
    /// [`crate::Error::Malformed`] if the directory does not precede the table or declares a
    /// table too small to hold its own header.
    pub(crate) fn parse(reader: Reader<'a>, table: usize) -> Result<Directory<'a>> {
        let soffset = reader.read::<i32>(table)?;
        let Ok(distance) = usize::try_from(soffset) else {
            return Err(malformed_error!(
                "Table at {} has a directory offset pointing forwards ({})",
                table,
                soffset
            ));
        };

        if distance == 0 || distance > table {
            return Err(malformed_error!(
                "Table at {} has an invalid directory offset {}",
                table,
                soffset
            ));
        }

        let position = table - distance;
        let count = usize::from(reader.read::<u16>(position)?);
        let table_size = usize::from(reader.read::<u16>(position + 2)?);

        if table_size < SOFFSET_SIZE {
            return Err(malformed_error!(
                "Directory at {} declares a table size of {}",
                position,
                table_size
            ));
        }

        let entries = reader.slice(
            position + DIRECTORY_HEADER_SIZE,
            count * DIRECTORY_ENTRY_SIZE,
        )?;
        reader.slice(table, table_size)?;

        Ok(Directory {
            entries,
            count,
            table_size,
            position,
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no field is present in the table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Size of the table described by this directory, in bytes.
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Absolute position of the directory in the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Entry at `index`, in directory order.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<DirectoryEntry> {
        let start = index.checked_mul(DIRECTORY_ENTRY_SIZE)?;
        let end = start.checked_add(DIRECTORY_ENTRY_SIZE)?;
        let raw = self.entries.get(start..end)?;

        Some(DirectoryEntry {
            slot: u16::from_le_bytes([raw[0], raw[1]]),
            offset: u16::from_le_bytes([raw[2], raw[3]]),
        })
    }

    /// Offset of `slot` from the table start, or `None` if the field is absent.
    ///
    /// Entries are written in ascending slot order, which allows a binary search. A directory
    /// that isn't sorted can only make fields look absent; it can't cause an invalid access.
    #[must_use]
    pub fn lookup(&self, slot: u16) -> Option<u16> {
        let mut low = 0;
        let mut high = self.count;

        while low < high {
            let mid = low + (high - low) / 2;
            let entry = self.entry(mid)?;
            match entry.slot.cmp(&slot) {
                std::cmp::Ordering::Equal => return Some(entry.offset),
                std::cmp::Ordering::Less => low = mid + 1,
                std::cmp::Ordering::Greater => high = mid,
            }
        }

        None
    }

    /// Iterate over all entries in directory order.
    pub fn iter(&self) -> impl Iterator<Item = DirectoryEntry> + '_ {
        (0..self.count).filter_map(move |index| self.entry(index))
    }
}

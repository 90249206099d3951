//! Field directory (vtable) construction.
//!
//! When a table is closed, the builder hands its staged fields to [`TablePlan::new`], which
//! decides where every field lives inside the table and encodes the matching directory:
//!
//! ```text
//! directory: [entry_count: u16][table_size: u16] ([slot: u16][offset: u16]) * entry_count
//! table:     [soffset to directory: i32][fields ...]
//! ```
//!
//! Directory entries are sorted by slot so readers can binary search them. Fields inside the
//! table are placed widest-first to keep padding minimal; since the table start is aligned to
//! the widest field, every field ends up naturally aligned in the buffer.
//!
//! [`DirectoryCache`] remembers where each distinct directory was written so tables with the
//! same layout can point at a single copy.

use std::collections::HashMap;

use crate::{
    file::io::{push_le, DIRECTORY_ENTRY_SIZE, DIRECTORY_HEADER_SIZE, SOFFSET_SIZE, UOFFSET_SIZE},
    Result,
};

/// The value staged for a single slot of the table under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldValue {
    /// A scalar, stored inline; only the first `size` bytes are meaningful.
    Scalar { bytes: [u8; 8], size: usize },
    /// A back-reference to a string, vector or table written earlier.
    Offset(u32),
}

impl FieldValue {
    /// Width of the value inside the table, which is also its alignment.
    pub(crate) fn size(&self) -> usize {
        match self {
            FieldValue::Scalar { size, .. } => *size,
            FieldValue::Offset(_) => UOFFSET_SIZE,
        }
    }
}

/// A field added to the open table, not yet placed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StagedField {
    pub slot: u16,
    pub value: FieldValue,
}

/// A field with its final offset from the table start.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlacedField {
    pub slot: u16,
    pub offset: u16,
    pub value: FieldValue,
}

/// The complete layout of one table: field placement plus its encoded directory.
#[derive(Debug)]
pub(crate) struct TablePlan {
    /// Fields in the order they appear in the table.
    pub fields: Vec<PlacedField>,
    /// Total size of the table, including the leading directory offset.
    pub table_size: usize,
    /// Required alignment of the table start.
    pub align: usize,
    /// Encoded directory bytes.
    pub directory: Vec<u8>,
}

impl TablePlan {
    /// Lay out the staged fields of a table.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the table or the directory would not be
    /// addressable with 16-bit offsets.
    pub(crate) fn new(staged: &[StagedField]) -> Result<TablePlan> {
        let mut ordered = staged.to_vec();
        ordered.sort_by(|a, b| {
            b.value
                .size()
                .cmp(&a.value.size())
                .then_with(|| a.slot.cmp(&b.slot))
        });

        let mut cursor = SOFFSET_SIZE;
        let mut align = SOFFSET_SIZE;
        let mut fields = Vec::with_capacity(ordered.len());
        for field in ordered {
            let size = field.value.size();
            cursor = cursor.next_multiple_of(size);
            align = align.max(size);

            let Ok(offset) = u16::try_from(cursor) else {
                return Err(malformed_error!(
                    "Field in slot {} lies beyond the addressable table size",
                    field.slot
                ));
            };

            fields.push(PlacedField {
                slot: field.slot,
                offset,
                value: field.value,
            });
            cursor += size;
        }

        let table_size = cursor;
        let Ok(encoded_size) = u16::try_from(table_size) else {
            return Err(malformed_error!(
                "Table of {} bytes exceeds the addressable table size",
                table_size
            ));
        };

        let Ok(entry_count) = u16::try_from(fields.len()) else {
            return Err(malformed_error!("Too many fields in a single table"));
        };

        let mut entries: Vec<(u16, u16)> = fields.iter().map(|f| (f.slot, f.offset)).collect();
        entries.sort_unstable_by_key(|(slot, _)| *slot);

        let mut directory =
            Vec::with_capacity(DIRECTORY_HEADER_SIZE + entries.len() * DIRECTORY_ENTRY_SIZE);
        push_le(&mut directory, entry_count);
        push_le(&mut directory, encoded_size);
        for (slot, offset) in entries {
            push_le(&mut directory, slot);
            push_le(&mut directory, offset);
        }

        Ok(TablePlan {
            fields,
            table_size,
            align,
            directory,
        })
    }
}

/// Positions of directories already written to the buffer, keyed by their encoded bytes.
///
/// Two tables can share a directory when they have the same present slots at the same
/// offsets and the same size; the encoded bytes capture exactly that.
#[derive(Debug, Default)]
pub(crate) struct DirectoryCache {
    positions: HashMap<Vec<u8>, u32>,
    hits: usize,
}

impl DirectoryCache {
    /// Look up a previously written directory and count the reuse.
    pub(crate) fn lookup(&mut self, directory: &[u8]) -> Option<u32> {
        let position = self.positions.get(directory).copied();
        if position.is_some() {
            self.hits += 1;
        }
        position
    }

    /// Remember where a directory was written.
    pub(crate) fn insert(&mut self, directory: Vec<u8>, position: u32) {
        self.positions.insert(directory, position);
    }

    /// Number of distinct directories written.
    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    /// Number of tables that reused an existing directory.
    pub(crate) fn hits(&self) -> usize {
        self.hits
    }
}

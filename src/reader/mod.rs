//! Bounds-checked, lazy buffer reader.
//!
//! [`Reader`] wraps an immutable byte region. Nothing is parsed up front: [`Reader::root`]
//! only validates the root offset, and every subsequent field access walks the table's field
//! directory on its own. Buffers are treated as untrusted input; every offset and length is
//! checked against the buffer before it is used, with overflow-safe arithmetic, so a corrupted
//! or truncated buffer results in an [`crate::Error`] and never in an out-of-bounds read.
//!
//! # Key Components
//!
//! - [`Reader`] - Entry point, root lookup and primitive checked reads
//! - [`TableView`] - A table at a known position, with typed field getters
//! - [`Directory`] - The decoded field directory of a table
//! - [`VectorView`] - A length-prefixed vector of scalars or tables
//! - [`Element`] - Types that can be read as vector elements
//! - [`DecodeBudget`] - Caps what a full decode may materialize
//!
//! # Thread Safety
//!
//! All views are `Copy` borrows of the underlying bytes and hold no mutable state, so the same
//! buffer can be decoded from any number of threads at once.
//!
//! # Examples
//!
//! ```rust
//! use shieldbuf::{records::ContactCard, Reader, Record};
//!
//! let card = ContactCard { id: 3, name: "Bob".to_string(), ..Default::default() };
//! let data = card.to_bytes()?;
//!
//! let reader = Reader::new(&data)?;
//! let root = reader.root()?;
//! assert_eq!(root.get_field::<u32>(0, 0)?, 3);
//! assert_eq!(root.get_str(2)?, Some("Bob"));
//! assert_eq!(root.get_str(3)?, None);
//! # Ok::<(), shieldbuf::Error>(())
//! ```

mod budget;
mod table;
mod vector;
mod vtable;

pub use budget::DecodeBudget;
pub use table::TableView;
pub use vector::{Element, VectorIter, VectorView};
pub use vtable::{Directory, DirectoryEntry};

use log::warn;

use crate::{
    file::io::{read_le_at, WireScalar, LENGTH_SIZE, ROOT_SIZE},
    Error, ReaderConfig, Result,
};

/// Read-only access to a finished buffer.
///
/// A `Reader` borrows the bytes; every view derived from it carries the same lifetime and
/// becomes unusable once the buffer is released.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    config: ReaderConfig,
    budget: Option<&'a DecodeBudget>,
}

impl<'a> Reader<'a> {
    /// Wrap a buffer with the default configuration.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for an empty buffer and [`Error::TruncatedBuffer`] if the
    /// buffer can't even hold the root offset.
    pub fn new(data: &'a [u8]) -> Result<Reader<'a>> {
        Self::with_config(data, ReaderConfig::default())
    }

    /// Wrap a buffer with a custom configuration.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for an empty buffer and [`Error::TruncatedBuffer`] if the
    /// buffer can't even hold the root offset.
    pub fn with_config(data: &'a [u8], config: ReaderConfig) -> Result<Reader<'a>> {
        if data.is_empty() {
            return Err(Error::Empty);
        }

        if data.len() < ROOT_SIZE {
            return Err(out_of_bounds_error!(0, ROOT_SIZE, data.len()));
        }

        Ok(Reader {
            data,
            config,
            budget: None,
        })
    }

    /// Wrap a buffer whose full decode is charged against `budget`.
    ///
    /// Every table visited and every string or byte field read through this reader and the
    /// views derived from it counts towards the budget.
    ///
    /// # Errors
    /// Same as [`Reader::with_config`].
    pub fn with_budget(
        data: &'a [u8],
        config: ReaderConfig,
        budget: &'a DecodeBudget,
    ) -> Result<Reader<'a>> {
        let mut reader = Self::with_config(data, config)?;
        reader.budget = Some(budget);
        Ok(reader)
    }

    /// The underlying bytes.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Size of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty. Never the case for a constructed reader.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The configuration used for all views derived from this reader.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The root table.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRootTable`] if the root offset points outside the buffer or
    /// into the root offset itself.
    pub fn root(&self) -> Result<TableView<'a>> {
        let position = self.root_position()?;
        self.charge_table()?;
        Ok(TableView::new(*self, position, 0))
    }

    /// The root of a list buffer: a vector of tables.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRootTable`] if the root offset is out of range, or a bounds
    /// error if the vector doesn't fit in the buffer.
    pub fn root_vector<T: Element<'a>>(&self) -> Result<VectorView<'a, T>> {
        let position = self.root_position()?;
        VectorView::new(*self, position, 0)
    }

    pub(crate) fn root_position(&self) -> Result<usize> {
        let position = self.read::<u32>(0)? as usize;
        if position < ROOT_SIZE || position >= self.data.len() {
            warn!(
                "Rejecting root offset {position} for a buffer of {} bytes",
                self.data.len()
            );
            return Err(Error::UnknownRootTable(position));
        }

        Ok(position)
    }

    /// Read a scalar at an absolute position.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedBuffer`] if the value does not fit,
    /// [`Error::MisalignedAccess`] if alignment checks are enabled and the position is not a
    /// multiple of the scalar width, or [`Error::Malformed`] if canonical checks are enabled
    /// and the bytes are not a canonical encoding.
    pub fn read<T: WireScalar>(&self, position: usize) -> Result<T> {
        self.check_alignment(position, T::SIZE)?;
        if self.config.check_canonical && !T::is_canonical(self.slice(position, T::SIZE)?) {
            return Err(malformed_error!(
                "Non-canonical {}-byte scalar at {}",
                T::SIZE,
                position
            ));
        }

        let mut cursor = position;
        read_le_at(self.data, &mut cursor)
    }

    /// Borrow `len` bytes starting at `position`.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedBuffer`] if the range does not fit, including when
    /// `position + len` overflows.
    pub fn slice(&self, position: usize, len: usize) -> Result<&'a [u8]> {
        let Some(end) = position.checked_add(len) else {
            return Err(out_of_bounds_error!(position, len, self.data.len()));
        };

        match self.data.get(position..end) {
            Some(slice) => Ok(slice),
            None => Err(out_of_bounds_error!(position, len, self.data.len())),
        }
    }

    /// Follow the back-reference stored at `position`.
    ///
    /// # Returns
    /// The absolute position of the referenced string, vector or table.
    ///
    /// # Errors
    /// Returns a bounds error if the reference can't be read, or [`Error::Malformed`] if it
    /// does not point strictly backwards into the buffer.
    pub fn follow(&self, position: usize) -> Result<usize> {
        let distance = self.read::<u32>(position)? as usize;
        if distance == 0 || distance > position {
            return Err(malformed_error!(
                "Reference at {} with distance {} does not point backwards into the buffer",
                position,
                distance
            ));
        }

        Ok(position - distance)
    }

    /// Read the length-prefixed byte vector at `position`.
    ///
    /// # Errors
    /// Returns a bounds error if the declared length reaches past the buffer, or
    /// [`Error::DecodeLimit`] if the reader's budget is exhausted.
    pub fn read_bytes(&self, position: usize) -> Result<&'a [u8]> {
        let len = self.read::<u32>(position)? as usize;
        // The prefix was read successfully, so this can't overflow
        let bytes = self.slice(position + LENGTH_SIZE, len)?;
        self.charge_bytes(len)?;
        Ok(bytes)
    }

    /// Read the length-prefixed, NUL-terminated string at `position`.
    ///
    /// # Errors
    /// Returns a bounds error if the declared length reaches past the buffer,
    /// [`Error::Malformed`] if the terminator is missing, and [`Error::InvalidUtf8`] if the
    /// bytes are not UTF-8. Returns [`Error::DecodeLimit`] if the reader's budget is exhausted.
    pub fn read_str(&self, position: usize) -> Result<&'a str> {
        let len = self.read::<u32>(position)? as usize;
        let start = position + LENGTH_SIZE;

        // Content plus terminator
        let Some(with_nul) = len.checked_add(1) else {
            return Err(out_of_bounds_error!(start, len, self.data.len()));
        };
        let bytes = self.slice(start, with_nul)?;

        let (content, terminator) = bytes.split_at(len);
        if terminator != [0] {
            return Err(malformed_error!("String at {} is not NUL terminated", position));
        }
        self.charge_bytes(len)?;

        std::str::from_utf8(content).map_err(|_| Error::InvalidUtf8 { offset: position })
    }

    pub(crate) fn check_alignment(&self, position: usize, align: usize) -> Result<()> {
        if self.config.check_alignment && align > 1 && position % align != 0 {
            return Err(Error::MisalignedAccess {
                offset: position,
                align,
            });
        }

        Ok(())
    }

    pub(crate) fn charge_bytes(&self, len: usize) -> Result<()> {
        match self.budget {
            Some(budget) => budget.charge_bytes(len),
            None => Ok(()),
        }
    }

    pub(crate) fn charge_table(&self) -> Result<()> {
        match self.budget {
            Some(budget) => budget.charge_table(),
            None => Ok(()),
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimit(self.config.max_depth));
        }

        Ok(())
    }
}

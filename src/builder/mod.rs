//! Buffer writer and table builder.
//!
//! [`Builder`] owns a growable byte buffer and appends values to it strictly front to back.
//! Children are always written before the tables that reference them, so every reference in a
//! finished buffer points backwards to data that already existed when it was written:
//!
//! ```text
//! [root: u32] [strings, vectors, directories, child tables ...] [root table]
//! ```
//!
//! # Writing values
//!
//! - [`Builder::write_string`] - `u32` length, UTF-8 bytes, NUL terminator
//! - [`Builder::write_bytes`] - `u32` length, raw bytes
//! - [`Builder::write_vector`] - `u32` length, naturally aligned scalars
//! - [`Builder::write_table_vector`] - `u32` length, back-references to tables
//! - [`Builder::write_scalar`] - a single aligned scalar
//!
//! # Building tables
//!
//! A table is opened with [`Builder::start_table`], receives its present fields through
//! [`Builder::add_field`], [`Builder::add_field_default`] and [`Builder::add_offset`], and is
//! closed with [`Builder::end_table`], which writes (or reuses) its field directory followed by
//! the table itself. Absent fields are simply never added.
//!
//! # Examples
//!
//! ```rust
//! use shieldbuf::{Builder, Reader, Table};
//!
//! let mut builder = Builder::new();
//! let name = builder.write_string("Alice")?;
//! builder.start_table()?;
//! builder.add_field(0, 1_u32)?;
//! builder.add_offset(1, name)?;
//! let root = builder.end_table::<Table>()?;
//! let data = builder.finish(root)?;
//!
//! let table = Reader::new(&data)?.root()?;
//! assert_eq!(table.get_field::<u32>(0, 0)?, 1);
//! assert_eq!(table.get_str(1)?, Some("Alice"));
//! # Ok::<(), shieldbuf::Error>(())
//! ```

mod vtable;

use std::{fmt, marker::PhantomData};

use log::{debug, trace};

use crate::{
    file::io::{push_le, write_le_at, WireScalar, LENGTH_SIZE, ROOT_SIZE},
    BuilderConfig, Error, Result,
};
use vtable::{DirectoryCache, FieldValue, StagedField, TablePlan};

/// Marker for an untyped table.
///
/// Used as the type parameter of [`Offset`] when a table is built by hand rather than through
/// a record codec.
pub enum Table {}

/// A typed position of a value written by a [`Builder`].
///
/// The type parameter records what lives at the position (`str`, `[u8]`, `[u32]`, a record
/// type, `[Offset<T>]` ...) so a string can't be passed where a table is expected.
pub struct Offset<T: ?Sized> {
    position: u32,
    _marker: PhantomData<fn() -> *const T>,
}

impl<T: ?Sized> Offset<T> {
    pub(crate) fn new(position: u32) -> Self {
        Offset {
            position,
            _marker: PhantomData,
        }
    }

    /// Absolute position within the buffer.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.position
    }
}

impl<T: ?Sized> Clone for Offset<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Offset<T> {}

impl<T: ?Sized> PartialEq for Offset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<T: ?Sized> Eq for Offset<T> {}

impl<T: ?Sized> fmt::Debug for Offset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset({})", self.position)
    }
}

/// Single-use writer for one buffer.
///
/// The builder exclusively owns the buffer while it is being built; [`Builder::finish`]
/// consumes the builder and hands the completed bytes to the caller. A failed write leaves the
/// buffer untouched, but the build should be abandoned: the only expected failure is the
/// capacity guard, and retrying will hit it again.
pub struct Builder {
    data: Vec<u8>,
    config: BuilderConfig,
    staged: Vec<StagedField>,
    table_open: bool,
    directories: DirectoryCache,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Create a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create a builder with a custom configuration.
    #[must_use]
    pub fn with_config(config: BuilderConfig) -> Self {
        let mut data = Vec::with_capacity(config.initial_capacity.max(ROOT_SIZE));
        // Root offset placeholder, patched by `finish`
        data.resize(ROOT_SIZE, 0);

        Builder {
            data,
            config,
            staged: Vec::new(),
            table_open: false,
            directories: DirectoryCache::default(),
        }
    }

    /// The configuration this builder was created with.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Whether default-valued fields are written instead of elided.
    #[must_use]
    pub fn force_defaults(&self) -> bool {
        self.config.force_defaults
    }

    /// Current size of the buffer, including the root placeholder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing but the root placeholder has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == ROOT_SIZE
    }

    /// Write a single scalar, aligned to its natural width.
    ///
    /// # Returns
    /// The absolute position of the scalar.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] while a table is open.
    pub fn write_scalar<T: WireScalar>(&mut self, value: T) -> Result<usize> {
        self.ensure_no_table("write a scalar")?;
        let padding = self.padding(T::SIZE);
        self.reserve(padding + T::SIZE)?;
        self.pad(padding);

        let position = self.data.len();
        push_le(&mut self.data, value);
        Ok(position)
    }

    /// Write a length-prefixed byte vector.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] while a table is open.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<Offset<[u8]>> {
        self.ensure_no_table("write a byte vector")?;
        let position = self.write_length(bytes.len(), 1, bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(Offset::new(position))
    }

    /// Write a length-prefixed, NUL-terminated UTF-8 string.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] while a table is open.
    pub fn write_string(&mut self, text: &str) -> Result<Offset<str>> {
        self.ensure_no_table("write a string")?;
        let position = self.write_length(text.len(), 1, text.len() + 1)?;
        self.data.extend_from_slice(text.as_bytes());
        self.data.push(0);
        Ok(Offset::new(position))
    }

    /// Write a length-prefixed vector of scalars. Elements are aligned to their width.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] while a table is open.
    pub fn write_vector<T: WireScalar>(&mut self, items: &[T]) -> Result<Offset<[T]>> {
        self.ensure_no_table("write a vector")?;
        let Some(payload) = items.len().checked_mul(T::SIZE) else {
            return Err(self.capacity_error(usize::MAX));
        };

        let position = self.write_length(items.len(), T::SIZE, payload)?;
        for item in items {
            push_le(&mut self.data, *item);
        }
        Ok(Offset::new(position))
    }

    /// Write a length-prefixed vector of back-references to previously written tables.
    ///
    /// Element order is preserved.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] while a table is open or if an offset was not produced by this
    /// builder.
    pub fn write_table_vector<T: ?Sized>(
        &mut self,
        items: &[Offset<T>],
    ) -> Result<Offset<[Offset<T>]>> {
        self.ensure_no_table("write a table vector")?;
        for item in items {
            self.check_target(item.value())?;
        }

        let Some(payload) = items.len().checked_mul(LENGTH_SIZE) else {
            return Err(self.capacity_error(usize::MAX));
        };

        let position = self.write_length(items.len(), LENGTH_SIZE, payload)?;
        for item in items {
            let element = self.data.len() as u32;
            push_le(&mut self.data, element - item.value());
        }
        Ok(Offset::new(position))
    }

    /// Open a new table. Tables can't be nested: write children first, then open the parent.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a table is already open.
    pub fn start_table(&mut self) -> Result<()> {
        if self.table_open {
            return Err(malformed_error!("start_table called while a table is open"));
        }

        self.table_open = true;
        self.staged.clear();
        Ok(())
    }

    /// Add a scalar field to the open table.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if no table is open or the slot was already added.
    pub fn add_field<T: WireScalar>(&mut self, slot: u16, value: T) -> Result<()> {
        let mut bytes = [0_u8; 8];
        bytes[..T::SIZE].copy_from_slice(value.to_le_bytes().as_ref());

        self.stage(
            slot,
            FieldValue::Scalar {
                bytes,
                size: T::SIZE,
            },
        )
    }

    /// Add a scalar field unless it equals `default`.
    ///
    /// With [`BuilderConfig::force_defaults`] set, the field is always written.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if no table is open or the slot was already added.
    pub fn add_field_default<T: WireScalar + PartialEq>(
        &mut self,
        slot: u16,
        value: T,
        default: T,
    ) -> Result<()> {
        if value == default && !self.config.force_defaults {
            return self.ensure_table("add a field");
        }

        self.add_field(slot, value)
    }

    /// Add a reference to a previously written string, vector or table.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if no table is open, the slot was already added, or the
    /// offset was not produced by this builder.
    pub fn add_offset<T: ?Sized>(&mut self, slot: u16, offset: Offset<T>) -> Result<()> {
        self.check_target(offset.value())?;
        self.stage(slot, FieldValue::Offset(offset.value()))
    }

    /// Close the open table: write its field directory (or reuse an identical one) followed by
    /// the table itself.
    ///
    /// # Returns
    /// The position of the table start.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the capacity guard is exceeded, or
    /// [`Error::Malformed`] if no table is open or the table is too large to address.
    pub fn end_table<T: ?Sized>(&mut self) -> Result<Offset<T>> {
        self.ensure_table("end a table")?;

        let plan = TablePlan::new(&self.staged)?;

        let shared = if self.config.share_directories {
            self.directories.lookup(&plan.directory)
        } else {
            None
        };

        // Capacity for padding, directory and table is reserved before anything is written
        let directory_len = if shared.is_some() { 0 } else { plan.directory.len() };
        let directory_padding = if shared.is_some() { 0 } else { self.padding(2) };
        let directory_end = self.data.len() + directory_padding + directory_len;
        let table_padding = directory_end.next_multiple_of(plan.align) - directory_end;
        self.reserve(directory_padding + directory_len + table_padding + plan.table_size)?;

        let directory_position = match shared {
            Some(position) => {
                trace!("Reusing field directory at {position}");
                position
            }
            None => {
                self.pad(directory_padding);
                let position = self.data.len() as u32;
                self.data.extend_from_slice(&plan.directory);
                if self.config.share_directories {
                    self.directories.insert(plan.directory.clone(), position);
                }
                position
            }
        };
        self.pad(table_padding);

        let table_position = self.data.len();
        let mut table = vec![0_u8; plan.table_size];

        let mut cursor = 0;
        let soffset = (table_position - directory_position as usize) as i32;
        write_le_at(&mut table, &mut cursor, soffset)?;

        for field in &plan.fields {
            let start = usize::from(field.offset);
            match field.value {
                FieldValue::Scalar { bytes, size } => {
                    table[start..start + size].copy_from_slice(&bytes[..size]);
                }
                FieldValue::Offset(target) => {
                    let absolute = (table_position + start) as u32;
                    let mut cursor = start;
                    write_le_at(&mut table, &mut cursor, absolute - target)?;
                }
            }
        }

        self.data.extend_from_slice(&table);
        self.table_open = false;
        self.staged.clear();

        Ok(Offset::new(table_position as u32))
    }

    /// Finish the buffer by storing the root offset at position 0.
    ///
    /// The root is normally a table; list buffers use a table vector as root.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a table is still open or the root was not produced by
    /// this builder.
    pub fn finish<T: ?Sized>(mut self, root: Offset<T>) -> Result<Vec<u8>> {
        self.ensure_no_table("finish the buffer")?;
        self.check_target(root.value())?;

        let mut cursor = 0;
        write_le_at(&mut self.data, &mut cursor, root.value())?;

        debug!(
            "Finished buffer of {} bytes ({} directories, {} shared)",
            self.data.len(),
            self.directories.len(),
            self.directories.hits()
        );

        Ok(self.data)
    }

    /// Pad and write a `u32` length prefix so that `payload` bytes can follow it with the
    /// first element aligned to `align`. Capacity for the prefix and the payload is reserved
    /// up front.
    fn write_length(&mut self, len: usize, align: usize, payload: usize) -> Result<u32> {
        let Ok(encoded) = u32::try_from(len) else {
            return Err(self.capacity_error(usize::MAX));
        };

        let align = align.max(LENGTH_SIZE);
        let mut padding = 0;
        while (self.data.len() + padding) % LENGTH_SIZE != 0
            || (self.data.len() + padding + LENGTH_SIZE) % align != 0
        {
            padding += 1;
        }

        let Some(total) = padding
            .checked_add(LENGTH_SIZE)
            .and_then(|n| n.checked_add(payload))
        else {
            return Err(self.capacity_error(usize::MAX));
        };

        self.reserve(total)?;
        self.data.resize(self.data.len() + padding, 0);

        let position = self.data.len() as u32;
        push_le(&mut self.data, encoded);
        Ok(position)
    }

    fn stage(&mut self, slot: u16, value: FieldValue) -> Result<()> {
        self.ensure_table("add a field")?;
        if self.staged.iter().any(|field| field.slot == slot) {
            return Err(malformed_error!("Slot {} added twice to the same table", slot));
        }

        self.staged.push(StagedField { slot, value });
        Ok(())
    }

    fn check_target(&self, target: u32) -> Result<()> {
        let target = target as usize;
        if target < ROOT_SIZE || target >= self.data.len() {
            return Err(malformed_error!(
                "Offset {} was not written by this builder",
                target
            ));
        }

        Ok(())
    }

    fn padding(&self, align: usize) -> usize {
        self.data.len().next_multiple_of(align) - self.data.len()
    }

    /// Append `padding` zero bytes. Capacity must have been reserved.
    fn pad(&mut self, padding: usize) {
        self.data.resize(self.data.len() + padding, 0);
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let max = self.config.effective_max_size();
        match self.data.len().checked_add(additional) {
            Some(requested) if requested <= max => {
                self.data.reserve(additional);
                Ok(())
            }
            Some(requested) => Err(Error::BufferTooSmall { requested, max }),
            None => Err(self.capacity_error(usize::MAX)),
        }
    }

    fn capacity_error(&self, requested: usize) -> Error {
        Error::BufferTooSmall {
            requested,
            max: self.config.effective_max_size(),
        }
    }

    fn ensure_table(&self, action: &str) -> Result<()> {
        if !self.table_open {
            return Err(malformed_error!("Cannot {} without an open table", action));
        }

        Ok(())
    }

    fn ensure_no_table(&self, action: &str) -> Result<()> {
        if self.table_open {
            return Err(malformed_error!("Cannot {} while a table is open", action));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_placeholder() {
        let builder = Builder::new();
        assert_eq!(builder.len(), 4);
        assert!(builder.is_empty());
    }

    #[test]
    fn string_layout() {
        let mut builder = Builder::new();
        let offset = builder.write_string("abc").unwrap();
        assert_eq!(offset.value(), 4);

        builder.start_table().unwrap();
        builder.add_offset(0, offset).unwrap();
        let root = builder.end_table::<Table>().unwrap();
        let data = builder.finish(root).unwrap();

        #[rustfmt::skip]
        let expected = [
            20, 0, 0, 0,                // root offset
            3, 0, 0, 0, b'a', b'b', b'c', 0x00, // "abc"
            1, 0, 8, 0, 0, 0, 4, 0,     // directory: 1 entry, size 8, slot 0 @ 4
            8, 0, 0, 0,                 // soffset: 20 - 12
            20, 0, 0, 0,                // back-reference: 24 - 4
        ];
        assert_eq!(data, expected);
    }

    #[test]
    fn scalar_alignment() {
        let mut builder = Builder::new();
        let position = builder.write_scalar(1_u8).unwrap();
        assert_eq!(position, 4);

        let position = builder.write_scalar(2_u64).unwrap();
        assert_eq!(position, 8);
        assert_eq!(builder.len(), 16);

        let position = builder.write_scalar(3_u16).unwrap();
        assert_eq!(position, 16);
    }

    #[test]
    fn vector_elements_aligned() {
        let mut builder = Builder::new();
        let offset = builder.write_vector(&[1_u64, 2, 3]).unwrap();
        // Length prefix at 4, elements start at 8
        assert_eq!(offset.value(), 4);
        assert_eq!(builder.len(), 8 + 24);

        let offset = builder.write_vector(&[7_u64]).unwrap();
        // Prefix must sit 4 bytes before an 8-aligned position
        assert_eq!(offset.value(), 36);
        assert_eq!((offset.value() + 4) % 8, 0);
    }

    #[test]
    fn table_vector_back_references() {
        let mut builder = Builder::new();

        builder.start_table().unwrap();
        builder.add_field(0, 7_u32).unwrap();
        let first = builder.end_table::<Table>().unwrap();

        builder.start_table().unwrap();
        builder.add_field(0, 9_u32).unwrap();
        let second = builder.end_table::<Table>().unwrap();

        let vector = builder.write_table_vector(&[first, second]).unwrap();
        let data = builder.finish(vector).unwrap();

        let start = vector.value() as usize;
        assert_eq!(&data[start..start + 4], &2_u32.to_le_bytes());

        let e0 = start + 4;
        let back0 = u32::from_le_bytes(data[e0..e0 + 4].try_into().unwrap());
        assert_eq!(e0 as u32 - back0, first.value());

        let e1 = start + 8;
        let back1 = u32::from_le_bytes(data[e1..e1 + 4].try_into().unwrap());
        assert_eq!(e1 as u32 - back1, second.value());
    }

    #[test]
    fn directories_shared() {
        let mut builder = Builder::new();
        let mut tables = Vec::new();
        for i in 0..3_u32 {
            builder.start_table().unwrap();
            builder.add_field(0, i + 1).unwrap();
            tables.push(builder.end_table::<Table>().unwrap());
        }
        let shared_len = builder.len();

        let mut builder = Builder::with_config(BuilderConfig::explicit());
        for i in 0..3_u32 {
            builder.start_table().unwrap();
            builder.add_field(0, i + 1).unwrap();
            builder.end_table::<Table>().unwrap();
        }

        assert!(shared_len < builder.len());
        assert_eq!(builder.directories.hits(), 0);
    }

    #[test]
    fn defaults_elided() {
        let mut builder = Builder::new();
        builder.start_table().unwrap();
        builder.add_field_default(0, 0_u32, 0).unwrap();
        builder.add_field_default(1, false, false).unwrap();
        builder.add_field_default(2, 5_u64, 0).unwrap();
        assert_eq!(builder.staged.len(), 1);
        builder.end_table::<Table>().unwrap();

        let mut builder = Builder::with_config(BuilderConfig::default().with_force_defaults(true));
        builder.start_table().unwrap();
        builder.add_field_default(0, 0_u32, 0).unwrap();
        builder.add_field_default(1, false, false).unwrap();
        assert_eq!(builder.staged.len(), 2);
    }

    #[test]
    fn misuse() {
        let mut builder = Builder::new();
        assert!(builder.add_field(0, 1_u32).is_err());
        assert!(builder.add_field_default(0, 0_u32, 0).is_err());
        assert!(builder.end_table::<Table>().is_err());

        builder.start_table().unwrap();
        assert!(builder.start_table().is_err());
        assert!(builder.write_string("nested").is_err());
        assert!(builder.write_bytes(&[1]).is_err());

        builder.add_field(3, 1_u32).unwrap();
        assert!(builder.add_field(3, 2_u32).is_err());
        assert!(builder.add_offset(4, Offset::<str>::new(400)).is_err());
        assert!(builder.add_offset(4, Offset::<str>::new(0)).is_err());

        let root = builder.end_table::<Table>().unwrap();
        assert!(builder.finish(Offset::<Table>::new(root.value() + 100)).is_err());
    }

    #[test]
    fn capacity_guard() {
        let config = BuilderConfig::default().with_max_buffer_size(32);
        let mut builder = Builder::with_config(config);

        builder.write_bytes(&[0xAA; 16]).unwrap();
        let before = builder.len();

        let result = builder.write_bytes(&[0xBB; 16]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall { max: 32, .. })
        ));
        assert_eq!(builder.len(), before);
    }

    #[test]
    fn capacity_guard_before_padding() {
        let config = BuilderConfig::default().with_max_buffer_size(12);
        let mut builder = Builder::with_config(config);

        builder.write_scalar(1_u8).unwrap();
        assert_eq!(builder.len(), 5);

        // 3 bytes of padding would fit, the u64 after them doesn't
        assert!(matches!(
            builder.write_scalar(2_u64),
            Err(Error::BufferTooSmall { max: 12, .. })
        ));
        assert_eq!(builder.len(), 5);
    }

    #[test]
    fn capacity_guard_in_end_table() {
        let config = BuilderConfig::default().with_max_buffer_size(24);
        let mut builder = Builder::with_config(config);
        builder.write_scalar(1_u8).unwrap();
        let before = builder.len();

        builder.start_table().unwrap();
        builder.add_field(0, 7_u64).unwrap();
        assert!(matches!(
            builder.end_table::<Table>(),
            Err(Error::BufferTooSmall { max: 24, .. })
        ));
        assert_eq!(builder.len(), before);
    }

    #[test]
    fn length_strictly_increases() {
        let mut builder = Builder::new();
        let mut last = builder.len();

        builder.write_string("").unwrap();
        assert!(builder.len() > last);
        last = builder.len();

        builder.write_bytes(&[]).unwrap();
        assert!(builder.len() > last);
        last = builder.len();

        builder.start_table().unwrap();
        builder.end_table::<Table>().unwrap();
        assert!(builder.len() > last);
    }
}

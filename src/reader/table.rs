//! Lazy view over a single encoded table.

use crate::{
    file::io::{WireScalar, SOFFSET_SIZE, UOFFSET_SIZE},
    reader::{Directory, Element, Reader, VectorView},
    Result,
};

/// A table at a known position in a buffer.
///
/// Creating a view does no work besides remembering the position. Each getter looks the slot
/// up in the field directory, validates the field against the table bounds and only then reads
/// it. A slot missing from the directory is not an error: scalar getters fall back to the
/// supplied default, the others return `None`.
///
/// # Examples
///
/// ```rust
/// use shieldbuf::{Builder, Reader, Table};
///
/// let mut builder = Builder::new();
/// let txid = builder.write_bytes(&[0xAB; 32])?;
/// builder.start_table()?;
/// builder.add_field(0, 419_200_u32)?;
/// builder.add_offset(2, txid)?;
/// let root = builder.end_table::<Table>()?;
/// let data = builder.finish(root)?;
///
/// let table = Reader::new(&data)?.root()?;
/// assert_eq!(table.get_field::<u32>(0, 0)?, 419_200);
/// assert_eq!(table.get_field::<u32>(1, 0)?, 0);
/// assert_eq!(table.get_bytes(2)?.map(<[u8]>::len), Some(32));
/// # Ok::<(), shieldbuf::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    reader: Reader<'a>,
    position: usize,
    depth: usize,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(reader: Reader<'a>, position: usize, depth: usize) -> Self {
        TableView {
            reader,
            position,
            depth,
        }
    }

    /// Absolute position of the table start.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Nesting depth below the root table.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The reader this view was derived from.
    #[must_use]
    pub fn reader(&self) -> Reader<'a> {
        self.reader
    }

    /// Decode and validate the field directory of this table.
    ///
    /// # Errors
    /// Returns a decode error if the directory or the table region is invalid.
    pub fn directory(&self) -> Result<Directory<'a>> {
        Directory::parse(self.reader, self.position)
    }

    /// Returns `true` if the slot is present in the directory.
    ///
    /// # Errors
    /// Returns a decode error if the directory is invalid.
    pub fn has_field(&self, slot: u16) -> Result<bool> {
        Ok(self.directory()?.lookup(slot).is_some())
    }

    /// Read a scalar field, or `default` if the slot is absent.
    ///
    /// # Errors
    /// Returns a decode error if the directory is invalid or the field does not fit into the
    /// table.
    pub fn get_field<T: WireScalar>(&self, slot: u16, default: T) -> Result<T> {
        Ok(self.get_field_opt(slot)?.unwrap_or(default))
    }

    /// Read a scalar field, or `None` if the slot is absent.
    ///
    /// # Errors
    /// Returns a decode error if the directory is invalid or the field does not fit into the
    /// table.
    pub fn get_field_opt<T: WireScalar>(&self, slot: u16) -> Result<Option<T>> {
        match self.field_position(slot, T::SIZE)? {
            Some(position) => self.reader.read::<T>(position).map(Some),
            None => Ok(None),
        }
    }

    /// Read a string field.
    ///
    /// # Errors
    /// Returns a decode error if the reference or the string is invalid.
    pub fn get_str(&self, slot: u16) -> Result<Option<&'a str>> {
        match self.reference(slot)? {
            Some(position) => self.reader.read_str(position).map(Some),
            None => Ok(None),
        }
    }

    /// Read a byte vector field without copying.
    ///
    /// # Errors
    /// Returns a decode error if the reference or the declared length is invalid.
    pub fn get_bytes(&self, slot: u16) -> Result<Option<&'a [u8]>> {
        match self.reference(slot)? {
            Some(position) => self.reader.read_bytes(position).map(Some),
            None => Ok(None),
        }
    }

    /// Read a vector field. `T` is either a scalar or [`TableView`] (or a record view).
    ///
    /// # Errors
    /// Returns a decode error if the reference is invalid or the vector does not fit.
    pub fn get_vector<T: Element<'a>>(&self, slot: u16) -> Result<Option<VectorView<'a, T>>> {
        match self.reference(slot)? {
            Some(position) => VectorView::new(self.reader, position, self.depth).map(Some),
            None => Ok(None),
        }
    }

    /// Read a vector field, treating an absent slot as an empty vector.
    ///
    /// # Errors
    /// Returns a decode error if the reference is invalid or the vector does not fit.
    pub fn get_vector_or_empty<T: Element<'a>>(&self, slot: u16) -> Result<VectorView<'a, T>> {
        match self.get_vector(slot)? {
            Some(vector) => Ok(vector),
            None => Ok(VectorView::empty(self.reader, self.depth)),
        }
    }

    /// Read a vector-of-tables field.
    ///
    /// # Errors
    /// Returns a decode error if the reference is invalid or the vector does not fit.
    pub fn get_table_vector(&self, slot: u16) -> Result<Option<VectorView<'a, TableView<'a>>>> {
        self.get_vector(slot)
    }

    /// Read a sub-table field.
    ///
    /// # Errors
    /// Returns a decode error if the reference is invalid,
    /// [`crate::Error::RecursionLimit`] if the sub-table would exceed the nesting limit, or
    /// [`crate::Error::DecodeLimit`] if the reader's budget is exhausted.
    pub fn get_table(&self, slot: u16) -> Result<Option<TableView<'a>>> {
        match self.field_position(slot, UOFFSET_SIZE)? {
            Some(position) => TableView::read(self.reader, position, self.depth).map(Some),
            None => Ok(None),
        }
    }

    fn reference(&self, slot: u16) -> Result<Option<usize>> {
        match self.field_position(slot, UOFFSET_SIZE)? {
            Some(position) => self.reader.follow(position).map(Some),
            None => Ok(None),
        }
    }

    fn field_position(&self, slot: u16, width: usize) -> Result<Option<usize>> {
        let directory = self.directory()?;
        let Some(offset) = directory.lookup(slot) else {
            return Ok(None);
        };

        let offset = usize::from(offset);
        if offset < SOFFSET_SIZE || offset + width > directory.table_size() {
            return Err(malformed_error!(
                "Field in slot {} at offset {} exceeds table of {} bytes at {}",
                slot,
                offset,
                directory.table_size(),
                self.position
            ));
        }

        Ok(Some(self.position + offset))
    }
}

impl<'a> Element<'a> for TableView<'a> {
    const WIDTH: usize = UOFFSET_SIZE;

    fn read(reader: Reader<'a>, position: usize, depth: usize) -> Result<Self> {
        let target = reader.follow(position)?;
        let depth = depth + 1;
        reader.check_depth(depth)?;
        reader.charge_table()?;

        Ok(TableView::new(reader, target, depth))
    }
}

//! Length-prefixed vectors of scalars or tables.

use std::marker::PhantomData;

use rayon::prelude::*;

use crate::{
    file::io::{WireScalar, LENGTH_SIZE},
    reader::Reader,
    Result,
};

/// A value that can be stored as a fixed-width vector element.
///
/// Scalars are stored inline; tables are stored as back-references and read as views. Record
/// views produced by [`crate::define_record`] implement this trait as well.
pub trait Element<'a>: Sized {
    /// Width of one element in the vector, which is also its alignment.
    const WIDTH: usize;

    /// Read the element stored at `position`. `depth` is the nesting depth of the table that
    /// owns the vector.
    ///
    /// # Errors
    /// Returns a decode error if the element is out of bounds or references invalid data.
    fn read(reader: Reader<'a>, position: usize, depth: usize) -> Result<Self>;
}

macro_rules! impl_scalar_element {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'a> Element<'a> for $ty {
                const WIDTH: usize = <$ty as WireScalar>::SIZE;

                fn read(reader: Reader<'a>, position: usize, _depth: usize) -> Result<Self> {
                    reader.read::<$ty>(position)
                }
            }
        )+
    };
}

impl_scalar_element!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// A vector at a known position in a buffer.
///
/// The length prefix and the element region are validated when the view is created, so
/// [`VectorView::get`] only has to check the index. Table elements are still validated lazily,
/// one table at a time.
pub struct VectorView<'a, T> {
    reader: Reader<'a>,
    start: usize,
    len: usize,
    depth: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for VectorView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorView<'_, T> {}

impl<T> std::fmt::Debug for VectorView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorView")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<'a, T: Element<'a>> VectorView<'a, T> {
    pub(crate) fn new(reader: Reader<'a>, position: usize, depth: usize) -> Result<Self> {
        let len = reader.read::<u32>(position)? as usize;
        let start = position + LENGTH_SIZE;

        let Some(byte_len) = len.checked_mul(T::WIDTH) else {
            return Err(out_of_bounds_error!(start, usize::MAX, reader.len()));
        };
        reader.slice(start, byte_len)?;
        if len > 0 {
            reader.check_alignment(start, T::WIDTH)?;
        }

        Ok(VectorView {
            reader,
            start,
            len,
            depth,
            _marker: PhantomData,
        })
    }

    pub(crate) fn empty(reader: Reader<'a>, depth: usize) -> Self {
        VectorView {
            reader,
            start: LENGTH_SIZE,
            len: 0,
            depth,
            _marker: PhantomData,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the element at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `index` is out of range, or a decode error if the
    /// element itself is invalid.
    pub fn get(&self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(malformed_error!(
                "Index {} out of range for vector of {} elements at {}",
                index,
                self.len,
                self.start - LENGTH_SIZE
            ));
        }

        T::read(self.reader, self.start + index * T::WIDTH, self.depth)
    }

    /// Iterate over the elements in order.
    #[must_use]
    pub fn iter(&self) -> VectorIter<'a, T> {
        VectorIter {
            vector: *self,
            index: 0,
        }
    }

    /// Read every element into a `Vec`, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first decode error encountered.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }

    /// Apply `f` to every element and collect the results in order.
    ///
    /// Vectors with at least [`crate::ReaderConfig::parallel_threshold`] elements are processed
    /// on the rayon thread pool.
    ///
    /// # Errors
    /// Returns a decode error from reading an element, or the first error returned by `f`.
    pub fn par_map<R, F>(&self, f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Send + Sync,
    {
        if self.len >= self.reader.config().parallel_threshold {
            (0..self.len)
                .into_par_iter()
                .map(|index| self.get(index).and_then(&f))
                .collect()
        } else {
            self.iter().map(|item| item.and_then(&f)).collect()
        }
    }
}

impl<'a, T: Element<'a>> IntoIterator for VectorView<'a, T> {
    type Item = Result<T>;
    type IntoIter = VectorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`VectorView`].
pub struct VectorIter<'a, T> {
    vector: VectorView<'a, T>,
    index: usize,
}

impl<'a, T: Element<'a>> Iterator for VectorIter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.len {
            return None;
        }

        let item = self.vector.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Element<'a>> ExactSizeIterator for VectorIter<'a, T> {}

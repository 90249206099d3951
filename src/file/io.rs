//! Low-level byte order and safe reading/writing utilities for the wire format.
//!
//! Every scalar on the wire is little-endian and stored at its natural width. This module
//! provides the [`crate::file::io::WireScalar`] trait, which abstracts over those scalar types,
//! together with bounds-checked helpers to read and write them. It is the foundational layer
//! for both [`crate::builder::Builder`] and [`crate::reader::Reader`].
//!
//! # Key Components
//!
//! - [`crate::file::io::WireScalar`] - Scalar types that can be stored in a table or vector
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//! - [`crate::file::io::write_le_at`] - Write a value at an offset and advance the offset
//! - [`crate::file::io::push_le`] - Append a value to a growable buffer
//!
//! # Wire Layout Constants
//!
//! The sizes of the fixed structural elements (offsets, directory header and entries) are
//! defined here so the writer and the reader can never disagree about them.
//!
//! # Examples
//!
//! ```rust
//! use shieldbuf::file::io::{read_le_at, push_le};
//!
//! let mut data = Vec::new();
//! push_le(&mut data, 1_u16);
//! push_le(&mut data, 0x0403_0201_u32);
//!
//! let mut offset = 0;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 1);
//! assert_eq!(read_le_at::<u32>(&data, &mut offset)?, 0x0403_0201);
//! assert_eq!(offset, 6);
//! # Ok::<(), shieldbuf::Error>(())
//! ```

use crate::Result;

/// Size of the absolute root offset at the beginning of every buffer.
pub const ROOT_SIZE: usize = 4;

/// Size of the signed directory offset that starts every table.
pub const SOFFSET_SIZE: usize = 4;

/// Size of a back-reference from a field or vector element to its target.
pub const UOFFSET_SIZE: usize = 4;

/// Size of the length prefix of strings, byte vectors and vectors.
pub const LENGTH_SIZE: usize = 4;

/// Size of the directory header: entry count (`u16`) followed by the table size (`u16`).
pub const DIRECTORY_HEADER_SIZE: usize = 4;

/// Size of a single directory entry: slot (`u16`) followed by the field offset (`u16`).
pub const DIRECTORY_ENTRY_SIZE: usize = 4;

/// Trait for scalar values that can be stored in a table field or a vector.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size byte
/// array of that type (e.g., `[u8; 4]` for `u32`). The natural width of the type doubles as its
/// alignment requirement on the wire.
///
/// `bool` is stored as a single byte, `0` or `1`. [`WireScalar::from_le_bytes`] decodes any
/// non-zero byte as `true`; [`WireScalar::is_canonical`] tells the two apart.
pub trait WireScalar: Sized + Copy {
    /// Associated type representing the byte array type for this scalar.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Natural width in bytes, which is also the required alignment.
    const SIZE: usize;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;

    /// Returns `true` if `bytes` is the encoding the builder would write for the value they
    /// decode to.
    fn is_canonical(_bytes: &[u8]) -> bool {
        true
    }
}

macro_rules! impl_wire_scalar {
    ($($ty:ty => $size:literal),* $(,)?) => {
        $(
            impl WireScalar for $ty {
                type Bytes = [u8; $size];
                const SIZE: usize = $size;

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_wire_scalar!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

impl WireScalar for bool {
    type Bytes = [u8; 1];
    const SIZE: usize = 1;

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        bytes[0] != 0
    }

    fn to_le_bytes(self) -> Self::Bytes {
        [u8::from(self)]
    }

    fn is_canonical(bytes: &[u8]) -> bool {
        matches!(bytes, [0] | [1])
    }
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Errors
/// Returns [`crate::Error::TruncatedBuffer`] if there are insufficient bytes.
pub fn read_le<T: WireScalar>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read. Overflowing offsets are rejected
/// instead of wrapping.
///
/// # Errors
/// Returns [`crate::Error::TruncatedBuffer`] if there are insufficient bytes.
pub fn read_le_at<T: WireScalar>(data: &[u8], offset: &mut usize) -> Result<T> {
    let Some(end) = offset.checked_add(T::SIZE) else {
        return Err(out_of_bounds_error!(*offset, T::SIZE, data.len()));
    };

    let Some(slice) = data.get(*offset..end) else {
        return Err(out_of_bounds_error!(*offset, T::SIZE, data.len()));
    };

    let Ok(read) = <T::Bytes as TryFrom<&[u8]>>::try_from(slice) else {
        return Err(out_of_bounds_error!(*offset, T::SIZE, data.len()));
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Safely writes a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes written.
///
/// # Errors
/// Returns [`crate::Error::TruncatedBuffer`] if the value does not fit.
pub fn write_le_at<T: WireScalar>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let size = data.len();
    let Some(end) = offset.checked_add(T::SIZE) else {
        return Err(out_of_bounds_error!(*offset, T::SIZE, size));
    };

    let Some(target) = data.get_mut(*offset..end) else {
        return Err(out_of_bounds_error!(*offset, T::SIZE, size));
    };

    target.copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;

    Ok(())
}

/// Appends a value of type `T` in little-endian byte order to a growable buffer.
///
/// No padding is inserted; callers are responsible for alignment.
pub fn push_le<T: WireScalar>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_le_bytes().as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// A directory header (2 entries, table size 16) and its first entry (slot 3 at offset 8).
    #[rustfmt::skip]
    const DIRECTORY: [u8; 8] = [
        0x02, 0x00, 0x10, 0x00,
        0x03, 0x00, 0x08, 0x00,
    ];

    #[test]
    fn directory_fields() {
        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&DIRECTORY, &mut offset).unwrap(), 2);
        assert_eq!(read_le_at::<u16>(&DIRECTORY, &mut offset).unwrap(), 16);
        assert_eq!(offset, DIRECTORY_HEADER_SIZE);

        assert_eq!(read_le_at::<u16>(&DIRECTORY, &mut offset).unwrap(), 3);
        assert_eq!(read_le_at::<u16>(&DIRECTORY, &mut offset).unwrap(), 8);
        assert_eq!(offset, DIRECTORY_HEADER_SIZE + DIRECTORY_ENTRY_SIZE);
    }

    #[test]
    fn wide_and_signed_values() {
        assert_eq!(read_le::<u32>(&DIRECTORY).unwrap(), 0x0010_0002);
        assert_eq!(read_le::<u64>(&DIRECTORY).unwrap(), 0x0008_0003_0010_0002);

        let amount = (-125_000_i64).to_le_bytes();
        assert_eq!(read_le::<i64>(&amount).unwrap(), -125_000);

        let soffset = (-20_i32).to_le_bytes();
        assert_eq!(read_le::<i32>(&soffset).unwrap(), -20);
    }

    #[test]
    fn flags() {
        assert!(!read_le::<bool>(&[0x00]).unwrap());
        assert!(read_le::<bool>(&[0x01]).unwrap());
        assert!(read_le::<bool>(&[0x80]).unwrap());

        assert!(bool::is_canonical(&[0x01]));
        assert!(!bool::is_canonical(&[0x80]));
        assert!(u32::is_canonical(&[0xFF; 4]));
    }

    #[test]
    fn reads_past_end() {
        let root = [0x08, 0x00, 0x00, 0x00];

        assert!(matches!(
            read_le::<u64>(&root),
            Err(Error::TruncatedBuffer {
                offset: 0,
                len: 8,
                size: 4
            })
        ));

        let mut offset = usize::MAX - 1;
        assert!(read_le_at::<u32>(&root, &mut offset).is_err());
        assert_eq!(offset, usize::MAX - 1);
    }

    #[test]
    fn patch_root_offset() {
        let mut buffer = vec![0_u8; ROOT_SIZE];
        push_le(&mut buffer, 7_u32);
        push_le(&mut buffer, true);
        assert_eq!(buffer, [0, 0, 0, 0, 7, 0, 0, 0, 1]);

        let mut offset = 0;
        write_le_at(&mut buffer, &mut offset, 4_u32).unwrap();
        assert_eq!(offset, ROOT_SIZE);
        assert_eq!(read_le::<u32>(&buffer).unwrap(), 4);

        let mut offset = buffer.len() - 2;
        assert!(write_le_at(&mut buffer, &mut offset, 0_u32).is_err());
    }
}

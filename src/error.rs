use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds an [`crate::Error::TruncatedBuffer`] for a read of `$len` bytes at `$offset`
/// that does not fit into a buffer of `$size` bytes.
macro_rules! out_of_bounds_error {
    ($offset:expr, $len:expr, $size:expr) => {
        crate::Error::TruncatedBuffer {
            offset: $offset,
            len: $len,
            size: $size,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Encoding can only fail through [`Error::BufferTooSmall`] (the configured capacity guard) or
/// through builder misuse, which is reported as [`Error::Malformed`]. Every other variant is a
/// decode failure: buffers arriving from disk or from a peer are untrusted, and any offset or
/// length that would leave the buffer is reported here instead of being dereferenced.
///
/// # Error Categories
///
/// ## Encoding Errors
/// - [`Error::BufferTooSmall`] - A write would grow the buffer past `max_buffer_size`
///
/// ## Decoding Errors
/// - [`Error::TruncatedBuffer`] - A declared offset or length reaches past the buffer end
/// - [`Error::MisalignedAccess`] - A scalar or vector is not aligned to its natural width
/// - [`Error::InvalidUtf8`] - A string field does not hold valid UTF-8
/// - [`Error::UnknownRootTable`] - The root offset at position 0 is out of range
/// - [`Error::RecursionLimit`] - Nested tables exceed the configured depth
/// - [`Error::DecodeLimit`] - Repeated references would inflate a full decode
/// - [`Error::Empty`] - An empty buffer was provided
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Invalid directory, offset direction or builder usage
///
/// ## Storage Errors
/// - [`Error::FileError`] - I/O errors from the storage collaborator
///
/// # Examples
///
/// ```rust
/// use shieldbuf::{records::AccountName, Error, Record};
///
/// match AccountName::from_bytes(&[0x08, 0x00]) {
///     Ok(account) => println!("Loaded {}", account.name),
///     Err(Error::TruncatedBuffer { offset, len, size }) => {
///         eprintln!("Truncated: {len} bytes at {offset} (buffer is {size} bytes)");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Growing the buffer would exceed the configured maximum size.
    ///
    /// Raised by the builder before any byte is appended, so the partially built buffer is
    /// never handed out. The build in progress should be abandoned.
    ///
    /// # Fields
    ///
    /// * `requested` - Total buffer size the write would have required
    /// * `max` - The configured `max_buffer_size`
    #[error("Buffer would grow to {requested} bytes, exceeding the maximum of {max}")]
    BufferTooSmall {
        /// Total buffer size the write would have required
        requested: usize,
        /// The configured maximum buffer size
        max: usize,
    },

    /// A read would extend past the end of the buffer.
    ///
    /// Covers truncated buffers as well as crafted lengths and offsets. The check happens
    /// before any byte is touched.
    #[error("Read of {len} bytes at offset {offset} exceeds buffer of {size} bytes")]
    TruncatedBuffer {
        /// Start of the attempted read
        offset: usize,
        /// Number of bytes the read required
        len: usize,
        /// Total size of the buffer
        size: usize,
    },

    /// A value was read at an offset that is not a multiple of its natural width.
    ///
    /// Only reported when alignment checking is enabled in the reader configuration.
    #[error("Access at offset {offset} is not aligned to {align} bytes")]
    MisalignedAccess {
        /// Offset of the attempted access
        offset: usize,
        /// Required alignment in bytes
        align: usize,
    },

    /// A string field holds bytes that are not valid UTF-8.
    #[error("String at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Offset of the string's length prefix
        offset: usize,
    },

    /// The root offset stored at position 0 does not point into the buffer.
    #[error("Root table offset {0} is out of range")]
    UnknownRootTable(usize),

    /// The buffer is structurally invalid, or the builder was used incorrectly.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Nested tables exceed the configured maximum depth.
    #[error("Reach the maximum nesting level allowed - {0}")]
    RecursionLimit(usize),

    /// A full decode would materialize more than the buffer can legitimately hold.
    ///
    /// Raised when references point at the same strings, byte fields or tables over and over.
    /// See [`crate::reader::DecodeBudget`].
    #[error("Decode exceeds the limit of {limit} {what}")]
    DecodeLimit {
        /// Which limit was hit
        what: &'static str,
        /// The limit derived from the buffer size
        limit: usize,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised while mapping or reading a stored buffer.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

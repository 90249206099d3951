//! Configuration for encoding and decoding.
//!
//! [`BuilderConfig`] controls how buffers are produced (capacity guard, directory sharing,
//! default elision) and [`ReaderConfig`] controls how strictly untrusted buffers are checked
//! while decoding. Both provide sensible defaults plus named presets.

/// Largest buffer the wire format can address: offsets are 32-bit and the directory offset
/// that starts every table is signed.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// Configuration for [`crate::Builder`].
///
/// # Examples
///
/// ```rust
/// use shieldbuf::BuilderConfig;
///
/// let config = BuilderConfig::default()
///     .with_max_buffer_size(64 * 1024)
///     .with_force_defaults(true);
/// assert_eq!(config.max_buffer_size, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Number of bytes reserved up front.
    pub initial_capacity: usize,

    /// Writes that would grow the buffer past this size fail with
    /// [`crate::Error::BufferTooSmall`]. Clamped to [`MAX_BUFFER_SIZE`].
    pub max_buffer_size: usize,

    /// Reuse an identical, previously written field directory instead of emitting a new one.
    pub share_directories: bool,

    /// Write fields even when they hold their default value.
    pub force_defaults: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_buffer_size: MAX_BUFFER_SIZE,
            share_directories: true,
            force_defaults: false,
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest output: defaults are elided and directories are shared.
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Every field is written and every table carries its own directory.
    ///
    /// Useful when the exact presence of fields matters to a consumer, or when inspecting the
    /// layout of a buffer by hand.
    #[must_use]
    pub fn explicit() -> Self {
        Self {
            share_directories: false,
            force_defaults: true,
            ..Self::default()
        }
    }

    /// Set the number of bytes reserved up front.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the maximum buffer size, clamped to [`MAX_BUFFER_SIZE`].
    #[must_use]
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size.min(MAX_BUFFER_SIZE);
        self
    }

    /// Enable or disable directory sharing.
    #[must_use]
    pub fn with_share_directories(mut self, share_directories: bool) -> Self {
        self.share_directories = share_directories;
        self
    }

    /// Enable or disable writing of default-valued fields.
    #[must_use]
    pub fn with_force_defaults(mut self, force_defaults: bool) -> Self {
        self.force_defaults = force_defaults;
        self
    }

    /// The effective capacity limit.
    #[must_use]
    pub fn effective_max_size(&self) -> usize {
        self.max_buffer_size.min(MAX_BUFFER_SIZE)
    }
}

/// Configuration for [`crate::Reader`].
///
/// # Examples
///
/// ```rust
/// use shieldbuf::ReaderConfig;
///
/// let config = ReaderConfig::strict();
/// assert!(config.check_alignment);
/// assert!(config.check_canonical);
///
/// let config = ReaderConfig::permissive();
/// assert!(!config.check_alignment);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum nesting depth of sub-tables below the root.
    pub max_depth: usize,

    /// Reject scalars, length prefixes and vector elements that are not aligned to their
    /// natural width with [`crate::Error::MisalignedAccess`].
    pub check_alignment: bool,

    /// Reject scalars whose bytes are not the canonical encoding of their value. Only `bool`
    /// has non-canonical encodings: when disabled, any non-zero byte reads as `true`.
    pub check_canonical: bool,

    /// Vectors of tables with at least this many elements are decoded in parallel by
    /// [`crate::reader::VectorView::par_map`] and list decoding.
    pub parallel_threshold: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            check_alignment: true,
            check_canonical: false,
            parallel_threshold: 256,
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tight nesting limit, alignment and canonical scalar enforcement, for buffers from
    /// untrusted peers.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_depth: 8,
            check_alignment: true,
            check_canonical: true,
            ..Self::default()
        }
    }

    /// Accept unaligned data written by other encoders. Bounds are still always checked.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            check_alignment: false,
            ..Self::default()
        }
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable alignment checks.
    #[must_use]
    pub fn with_check_alignment(mut self, check_alignment: bool) -> Self {
        self.check_alignment = check_alignment;
        self
    }

    /// Enable or disable canonical scalar checks.
    #[must_use]
    pub fn with_check_canonical(mut self, check_canonical: bool) -> Self {
        self.check_canonical = check_canonical;
        self
    }

    /// Set the element count from which vectors are decoded in parallel.
    #[must_use]
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }
}

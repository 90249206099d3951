// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # shieldbuf
//!
//! A table-based binary serialization layer for shielded-wallet records.
//!
//! Records are encoded into compact little-endian buffers made of tables with numbered,
//! optional fields. Buffers are read back lazily: a view only remembers where a table starts,
//! and each field access walks the table's field directory on its own, bounds-checked against
//! the buffer. Unknown fields written by newer software are skipped and fields that older
//! software did not write read as defaults, so wallets can exchange records across versions.
//!
//! ## Features
//!
//! - **Zero-copy views** - Strings and byte fields borrow directly from the buffer
//! - **Forward and backward compatible** - Slots are append-only, absent fields have defaults
//! - **Safe on untrusted input** - Every offset and length is checked with overflow-safe
//!   arithmetic; corrupted or truncated buffers produce an [`Error`], never a panic
//! - **Parallel list decoding** - Long record lists are decoded on the rayon thread pool
//! - **Memory-mapped storage** - [`RecordFile`] keeps a mapped file and its reader together
//!
//! ## Quick Start
//!
//! ```rust
//! use shieldbuf::prelude::*;
//!
//! let tx = TransactionInfo {
//!     id: 1,
//!     txid: vec![0xAB; 32],
//!     height: 2_000_000,
//!     amount: -10_000,
//!     memo: "Coffee".to_string(),
//!     ..Default::default()
//! };
//!
//! let data = tx.to_bytes()?;
//!
//! // Read a single field without decoding the rest
//! let view = TransactionInfo::view_bytes(&data)?;
//! assert_eq!(view.memo()?, "Coffee");
//!
//! // Or decode everything
//! assert_eq!(TransactionInfo::from_bytes(&data)?, tx);
//! # Ok::<(), shieldbuf::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`builder`] - Append-only buffer writer and table builder
//! - [`reader`] - Bounds-checked lazy reader, table and vector views
//! - [`records`] - The wallet record types and list buffers
//! - [`file`] - Stored buffers (memory or memory-mapped) and wire helpers
//! - [`define_record!`] - Declares further record types
//! - [`BuilderConfig`] / [`ReaderConfig`] - Size limits, defaults handling, validation depth
//!
//! ## Wire format
//!
//! ```text
//! [root offset: u32] [strings, vectors, directories, child tables ...] [root table]
//!
//! table:     [soffset to directory: i32] [fields, widest first]
//! directory: [entry count: u16] [table size: u16] ([slot: u16] [offset: u16])*
//! string:    [length: u32] [UTF-8 bytes] [0x00]
//! vector:    [length: u32] [elements] - scalars inline, tables as u32 back-references
//! ```
//!
//! All references point backwards: a child is always written before the table referring to
//! it. The root offset at position 0 is the only absolute position in the buffer.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and never installs a logger. Buffer finalization
//! and record encode/decode entry points log at `debug`, directory reuse at `trace`, and
//! rejected root offsets at `warn`.
//!
//! ## Development
//!
//! ```bash
//! cargo test
//! cargo bench --bench records
//! cargo +nightly fuzz run records
//! ```

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod config;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use shieldbuf::prelude::*;
///
/// let data = AccountName { id: 4, ..Default::default() }.to_bytes()?;
/// assert_eq!(AccountName::view_bytes(&data)?.id()?, 4);
/// # Ok::<(), shieldbuf::Error>(())
/// ```
pub mod prelude;

/// Buffer writer and table builder.
pub mod builder;

/// Stored buffers and wire-level helpers.
pub mod file;

/// Bounds-checked lazy reader.
pub mod reader;

/// Wallet record types.
pub mod records;

/// `shieldbuf` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`]. Used consistently throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// `shieldbuf` Error type
///
/// All fallible operations in this crate return this error type.
pub use error::Error;

pub use builder::{Builder, Offset, Table};
pub use config::{BuilderConfig, ReaderConfig, MAX_BUFFER_SIZE};
pub use file::{Backend, Memory, Physical, RecordFile};
pub use reader::{Reader, TableView, VectorView};
pub use records::{Record, RecordKind, RecordView};

//! Wallet record codecs.
//!
//! Every wallet entity is a table whose fields are numbered by declaration order. Each record
//! type comes in two shapes:
//!
//! - an owned struct (e.g. [`AccountName`]) that is encoded with [`Record::to_bytes`] and fully
//!   decoded with [`Record::from_bytes`]
//! - a zero-copy view (e.g. [`AccountNameView`]) borrowing the buffer, whose accessors read a
//!   single field on demand
//!
//! Both are generated by [`crate::define_record`] from a slot list, so the numbering, the
//! defaults and the child-before-parent write order are identical for all types.
//!
//! # Field kinds
//!
//! | Kind | Owned type | View accessor | Absent value |
//! |------|------------|---------------|--------------|
//! | `u32`, `u64`, `i64`, `bool`, ... | the scalar | the scalar | `0` / `false` |
//! | `string` | `String` | `&str` | `""` |
//! | `opt_string` | `Option<String>` | `Option<&str>` | `None` |
//! | `bytes` | `Vec<u8>` | `&[u8]` | empty |
//! | `[Record]` | `Vec<Record>` | [`VectorView`] of views | empty |
//!
//! # List buffers
//!
//! Records are often shipped as a plain list, e.g. the transaction history of an account.
//! [`list_to_bytes`] writes such a list with a vector of tables as root, and [`list_from_bytes`]
//! decodes it, in parallel for long lists.
//!
//! # Examples
//!
//! ```rust
//! use shieldbuf::{records::AccountName, Record, RecordView};
//!
//! let account = AccountName {
//!     id: 1,
//!     name: "Alice".to_string(),
//!     sapling_address: "zs1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq".to_string(),
//!     birth: 419_200,
//! };
//!
//! let data = account.to_bytes()?;
//! let view = AccountName::view_bytes(&data)?;
//! assert_eq!(view.name()?, "Alice");
//! assert_eq!(view.unpack()?, account);
//! # Ok::<(), shieldbuf::Error>(())
//! ```

mod account;
mod address;
mod backup;
mod message;
mod note;
mod payment;
mod transaction;

pub use account::{
    AccountName, AccountNameList, AccountNameListView, AccountNameView, ContactCard,
    ContactCardView,
};
pub use address::{UAReceivers, UAReceiversView};
pub use backup::{Backup, BackupView};
pub use message::{ShieldedMessage, ShieldedMessageView};
pub use note::{ShieldedNote, ShieldedNoteView};
pub use payment::{
    PaymentRequest, PaymentRequestView, TransactionRecipient, TransactionRecipientView,
    TransactionSummary, TransactionSummaryView,
};
pub use transaction::{
    InputShielded, InputShieldedView, InputTransparent, InputTransparentView, OutputShielded,
    OutputShieldedView, OutputTransparent, OutputTransparentView, TransactionInfo,
    TransactionInfoExtended, TransactionInfoExtendedView, TransactionInfoView,
};

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::{
    reader::{DecodeBudget, Element, TableView},
    Builder, BuilderConfig, Offset, Reader, ReaderConfig, Result,
};

/// Identifies one of the built-in record types.
///
/// Gives access to the slot layout of a type and decodes a buffer whose type is only known at
/// runtime (see [`RecordKind::check`]).
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumCount, Serialize, Deserialize,
)]
pub enum RecordKind {
    /// Account backup with key material
    Backup,
    /// Summary line of the transaction history
    TransactionInfo,
    /// Full transaction with transparent, sapling and orchard parts
    TransactionInfoExtended,
    /// Transparent input
    InputTransparent,
    /// Transparent output
    OutputTransparent,
    /// Sapling or orchard spend
    InputShielded,
    /// Sapling or orchard output
    OutputShielded,
    /// Unspent shielded note
    ShieldedNote,
    /// Memo-based message
    ShieldedMessage,
    /// Receivers of a unified address
    UAReceivers,
    /// Payment request (ZIP-321 style)
    PaymentRequest,
    /// Account entry
    AccountName,
    /// Address book entry
    ContactCard,
    /// Single recipient of a transaction plan
    TransactionRecipient,
    /// Summary of a transaction plan
    TransactionSummary,
    /// List of accounts
    AccountNameList,
}

impl RecordKind {
    /// Slot layout of this record type as `(slot, field name)` pairs.
    #[must_use]
    pub fn fields(self) -> &'static [(u16, &'static str)] {
        match self {
            RecordKind::Backup => Backup::FIELDS,
            RecordKind::TransactionInfo => TransactionInfo::FIELDS,
            RecordKind::TransactionInfoExtended => TransactionInfoExtended::FIELDS,
            RecordKind::InputTransparent => InputTransparent::FIELDS,
            RecordKind::OutputTransparent => OutputTransparent::FIELDS,
            RecordKind::InputShielded => InputShielded::FIELDS,
            RecordKind::OutputShielded => OutputShielded::FIELDS,
            RecordKind::ShieldedNote => ShieldedNote::FIELDS,
            RecordKind::ShieldedMessage => ShieldedMessage::FIELDS,
            RecordKind::UAReceivers => UAReceivers::FIELDS,
            RecordKind::PaymentRequest => PaymentRequest::FIELDS,
            RecordKind::AccountName => AccountName::FIELDS,
            RecordKind::ContactCard => ContactCard::FIELDS,
            RecordKind::TransactionRecipient => TransactionRecipient::FIELDS,
            RecordKind::TransactionSummary => TransactionSummary::FIELDS,
            RecordKind::AccountNameList => AccountNameList::FIELDS,
        }
    }

    /// Fully decode `data` as a record of this kind and discard the result.
    ///
    /// # Errors
    /// Returns the first decode error encountered.
    pub fn check(self, data: &[u8], config: ReaderConfig) -> Result<()> {
        match self {
            RecordKind::Backup => Backup::from_bytes_with(data, config).map(drop),
            RecordKind::TransactionInfo => TransactionInfo::from_bytes_with(data, config).map(drop),
            RecordKind::TransactionInfoExtended => {
                TransactionInfoExtended::from_bytes_with(data, config).map(drop)
            }
            RecordKind::InputTransparent => {
                InputTransparent::from_bytes_with(data, config).map(drop)
            }
            RecordKind::OutputTransparent => {
                OutputTransparent::from_bytes_with(data, config).map(drop)
            }
            RecordKind::InputShielded => InputShielded::from_bytes_with(data, config).map(drop),
            RecordKind::OutputShielded => OutputShielded::from_bytes_with(data, config).map(drop),
            RecordKind::ShieldedNote => ShieldedNote::from_bytes_with(data, config).map(drop),
            RecordKind::ShieldedMessage => ShieldedMessage::from_bytes_with(data, config).map(drop),
            RecordKind::UAReceivers => UAReceivers::from_bytes_with(data, config).map(drop),
            RecordKind::PaymentRequest => PaymentRequest::from_bytes_with(data, config).map(drop),
            RecordKind::AccountName => AccountName::from_bytes_with(data, config).map(drop),
            RecordKind::ContactCard => ContactCard::from_bytes_with(data, config).map(drop),
            RecordKind::TransactionRecipient => {
                TransactionRecipient::from_bytes_with(data, config).map(drop)
            }
            RecordKind::TransactionSummary => {
                TransactionSummary::from_bytes_with(data, config).map(drop)
            }
            RecordKind::AccountNameList => AccountNameList::from_bytes_with(data, config).map(drop),
        }
    }
}

/// An owned record type with a table encoding.
///
/// Implemented by [`crate::define_record`]; the provided methods cover the common buffer
/// round trips.
pub trait Record: Sized {
    /// Zero-copy view type of this record.
    type View<'a>: RecordView<'a, Owned = Self>;

    /// Which built-in record type this is, `None` for records declared outside this crate.
    const KIND: Option<RecordKind>;

    /// Name of the record type, used in log output.
    const NAME: &'static str;

    /// Slot layout as `(slot, field name)` pairs, in slot order.
    const FIELDS: &'static [(u16, &'static str)];

    /// Write all children and then the table of this record.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the builder's capacity guard is exceeded.
    fn encode(&self, builder: &mut Builder) -> Result<Offset<Self>>;

    /// Interpret a table as this record type. No validation happens until a field is read.
    fn view(table: TableView<'_>) -> Self::View<'_>;

    /// Decode a table into an owned record.
    ///
    /// # Errors
    /// Returns a decode error if any present field is invalid.
    fn decode(table: TableView<'_>) -> Result<Self> {
        Self::view(table).unpack()
    }

    /// Encode into a finished buffer with the default builder configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the buffer would exceed the maximum size.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(BuilderConfig::default())
    }

    /// Encode into a finished buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the buffer would exceed the maximum size.
    fn to_bytes_with(&self, config: BuilderConfig) -> Result<Vec<u8>> {
        debug!("Encoding {}", Self::NAME);

        let mut builder = Builder::with_config(config);
        let root = self.encode(&mut builder)?;
        builder.finish(root)
    }

    /// Decode a buffer with the default reader configuration.
    ///
    /// # Errors
    /// Returns a decode error if the buffer is truncated, corrupted or not valid UTF-8 where a
    /// string is expected.
    fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with(data, ReaderConfig::default())
    }

    /// Decode a buffer. The decode runs under a [`DecodeBudget`] sized for `data`.
    ///
    /// # Errors
    /// Returns a decode error if the buffer is truncated, corrupted or not valid UTF-8 where a
    /// string is expected, and [`crate::Error::DecodeLimit`] if it references the same data
    /// more often than a builder would.
    fn from_bytes_with(data: &[u8], config: ReaderConfig) -> Result<Self> {
        debug!("Decoding {} from {} bytes", Self::NAME, data.len());

        let budget = DecodeBudget::for_buffer(data.len());
        let reader = Reader::with_budget(data, config, &budget)?;
        Self::decode(reader.root()?)
    }

    /// Create a zero-copy view of the root table of `data`.
    ///
    /// # Errors
    /// Returns a decode error if the root offset is invalid.
    fn view_bytes(data: &[u8]) -> Result<Self::View<'_>> {
        let reader = Reader::new(data)?;
        Ok(Self::view(reader.root()?))
    }
}

/// A zero-copy view of a record table.
pub trait RecordView<'a>: Copy + Send + Sync + Element<'a> {
    /// The owned record type.
    type Owned: Record;

    /// The underlying table.
    fn table(&self) -> TableView<'a>;

    /// Read every field into an owned record.
    ///
    /// # Errors
    /// Returns a decode error if any present field is invalid.
    fn unpack(&self) -> Result<Self::Owned>;
}

/// Encode `items` as a list buffer: a vector of tables as root.
///
/// # Errors
/// Returns [`crate::Error::BufferTooSmall`] if the buffer would exceed the maximum size.
pub fn list_to_bytes<R: Record>(items: &[R]) -> Result<Vec<u8>> {
    list_to_bytes_with(items, BuilderConfig::default())
}

/// Encode `items` as a list buffer with a custom builder configuration.
///
/// # Errors
/// Returns [`crate::Error::BufferTooSmall`] if the buffer would exceed the maximum size.
pub fn list_to_bytes_with<R: Record>(items: &[R], config: BuilderConfig) -> Result<Vec<u8>> {
    debug!("Encoding list of {} {}", items.len(), R::NAME);

    let mut builder = Builder::with_config(config);
    let mut offsets = Vec::with_capacity(items.len());
    for item in items {
        offsets.push(item.encode(&mut builder)?);
    }

    let root = builder.write_table_vector(&offsets)?;
    builder.finish(root)
}

/// Decode a list buffer written by [`list_to_bytes`].
///
/// # Errors
/// Returns the first decode error encountered.
pub fn list_from_bytes<R: Record + Send>(data: &[u8]) -> Result<Vec<R>> {
    list_from_bytes_with(data, ReaderConfig::default())
}

/// Decode a list buffer with a custom reader configuration. Lists with at least
/// [`ReaderConfig::parallel_threshold`] entries are decoded on the rayon thread pool. All
/// entries share one [`DecodeBudget`] sized for `data`.
///
/// # Errors
/// Returns the first decode error encountered.
pub fn list_from_bytes_with<R: Record + Send>(data: &[u8], config: ReaderConfig) -> Result<Vec<R>> {
    let budget = DecodeBudget::for_buffer(data.len());
    let reader = Reader::with_budget(data, config, &budget)?;
    let items = reader.root_vector::<R::View<'_>>()?;
    debug!("Decoding list of {} {}", items.len(), R::NAME);

    items.par_map(|item| item.unpack())
}

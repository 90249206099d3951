//! # shieldbuf Prelude
//!
//! The commonly used types and traits of the crate. Import with `use shieldbuf::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all shieldbuf operations
pub use crate::Error;

/// The result type used throughout shieldbuf
pub use crate::Result;

/// Builder and reader configuration
pub use crate::{BuilderConfig, ReaderConfig};

// ================================================================================================
// Encoding and Decoding
// ================================================================================================

/// Low-level buffer access
pub use crate::{Builder, Offset, Reader, Table, TableView, VectorView};

/// Record traits and introspection
pub use crate::{Record, RecordKind, RecordView};

/// List buffers
pub use crate::records::{list_from_bytes, list_to_bytes};

/// Stored buffers
pub use crate::RecordFile;

// ================================================================================================
// Record Types
// ================================================================================================

/// Accounts and contacts
pub use crate::records::{AccountName, AccountNameList, Backup, ContactCard};

/// Transactions
pub use crate::records::{
    InputShielded, InputTransparent, OutputShielded, OutputTransparent, TransactionInfo,
    TransactionInfoExtended,
};

/// Notes, messages and addresses
pub use crate::records::{ShieldedMessage, ShieldedNote, UAReceivers};

/// Payments
pub use crate::records::{PaymentRequest, TransactionRecipient, TransactionSummary};

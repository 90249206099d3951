//! Transaction history records.
//!
//! [`TransactionInfo`] is the compact line shown in the history list. [`TransactionInfoExtended`]
//! carries the decoded contents of a transaction: transparent inputs and outputs plus the
//! sapling and orchard spends and outputs. Sapling and orchard parts share the
//! [`InputShielded`] / [`OutputShielded`] tables; the pool is given by the vector they are
//! stored in.

use serde::{Deserialize, Serialize};

define_record! {
    /// A line of the transaction history.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct TransactionInfo => TransactionInfoView {
        kind: TransactionInfo;
        /// Wallet-local transaction number
        0 => id: u32,
        /// Transaction hash
        1 => txid: bytes,
        2 => height: u32,
        3 => confirmations: u32,
        /// Block time, seconds since the epoch
        4 => timestamp: u32,
        /// Net change of the account balance, in zatoshis
        5 => amount: i64,
        6 => address: string,
        /// Name of the matching address book entry
        7 => contact: string,
        8 => memo: string,
    }
}

define_record! {
    /// A transparent input.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct InputTransparent => InputTransparentView {
        kind: InputTransparent;
        /// Hash of the transaction that created the spent output
        0 => txid: bytes,
        /// Index of the spent output
        1 => vout: u32,
        2 => address: string,
        3 => value: u64,
    }
}

define_record! {
    /// A transparent output.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct OutputTransparent => OutputTransparentView {
        kind: OutputTransparent;
        0 => address: string,
        1 => value: u64,
    }
}

define_record! {
    /// A shielded spend.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct InputShielded => InputShieldedView {
        kind: InputShielded;
        /// Nullifier
        0 => nf: bytes,
        1 => address: string,
        2 => value: u64,
        /// Note commitment randomness
        3 => rcm: bytes,
        /// Orchard rho, empty for sapling
        4 => rho: bytes,
    }
}

define_record! {
    /// A shielded output.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct OutputShielded => OutputShieldedView {
        kind: OutputShielded;
        /// Whether the output was received by this wallet
        0 => incoming: bool,
        /// Note commitment
        1 => cmx: bytes,
        2 => address: string,
        3 => value: u64,
        /// Note commitment randomness
        4 => rcm: bytes,
        /// Orchard rho, empty for sapling
        5 => rho: bytes,
        6 => memo: string,
    }
}

define_record! {
    /// The decoded contents of a transaction.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct TransactionInfoExtended => TransactionInfoExtendedView {
        kind: TransactionInfoExtended;
        0 => height: u32,
        1 => timestamp: u32,
        2 => txid: bytes,
        /// Transparent inputs
        3 => tins: [InputTransparent],
        /// Transparent outputs
        4 => touts: [OutputTransparent],
        /// Sapling spends
        5 => sins: [InputShielded],
        /// Sapling outputs
        6 => souts: [OutputShielded],
        /// Orchard spends
        7 => oins: [InputShielded],
        /// Orchard outputs
        8 => oouts: [OutputShielded],
    }
}

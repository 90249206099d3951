//! Accounts and address book entries.

use serde::{Deserialize, Serialize};

define_record! {
    /// An account of the wallet as listed in the account picker.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct AccountName => AccountNameView {
        kind: AccountName;
        /// Account number
        0 => id: u32,
        /// Display name
        1 => name: string,
        /// Default sapling address
        2 => sapling_address: string,
        /// Birth height, the first block that can contain transactions for this account
        3 => birth: u32,
    }
}

define_record! {
    /// An address book entry.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct ContactCard => ContactCardView {
        kind: ContactCard;
        /// Contact number
        0 => id: u32,
        /// Account the contact belongs to
        1 => account: u32,
        2 => name: string,
        3 => address: string,
        /// Whether the contact has been stored on chain
        4 => saved: bool,
    }
}

define_record! {
    /// All accounts of the wallet.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct AccountNameList => AccountNameListView {
        kind: AccountNameList;
        0 => items: [AccountName],
    }
}

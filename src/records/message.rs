//! Memo-based messages.

use serde::{Deserialize, Serialize};

define_record! {
    /// A message exchanged through transaction memos.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct ShieldedMessage => ShieldedMessageView {
        kind: ShieldedMessage;
        0 => id_msg: u32,
        /// Number of the transaction that carried the message
        1 => id_tx: u32,
        2 => txid: bytes,
        3 => height: u32,
        4 => timestamp: u32,
        5 => incoming: bool,
        /// Output index of the memo within the transaction
        6 => nout: u32,
        7 => sender: string,
        8 => recipient: string,
        9 => subject: string,
        10 => body: string,
        11 => read: bool,
    }
}

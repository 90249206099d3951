//! Unspent shielded notes.

use serde::{Deserialize, Serialize};

define_record! {
    /// A received note that has not been spent yet.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct ShieldedNote => ShieldedNoteView {
        kind: ShieldedNote;
        /// Height of the block that contains the note
        0 => height: u32,
        1 => confirmations: u32,
        2 => timestamp: u32,
        /// Note value in zatoshis
        3 => value: u64,
        /// `true` for orchard notes, `false` for sapling notes
        4 => orchard: bool,
    }
}

//! Unified address receivers.

use serde::{Deserialize, Serialize};

define_record! {
    /// The receivers a unified address decodes to. Missing receivers are empty strings.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct UAReceivers => UAReceiversView {
        kind: UAReceivers;
        0 => transparent: string,
        1 => sapling: string,
        2 => orchard: string,
    }
}

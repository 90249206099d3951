//! Payment requests and transaction plans.

use serde::{Deserialize, Serialize};

define_record! {
    /// A request to pay an address, as parsed from a payment URI.
    ///
    /// Missing keys default when parsed from JSON.
    #[derive(Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct PaymentRequest => PaymentRequestView {
        kind: PaymentRequest;
        0 => address: string,
        /// Amount in zatoshis
        1 => amount: u64,
        /// Memo text
        2 => memo_string: string,
        /// Raw memo, used instead of the text when not empty
        3 => memo_bytes: bytes,
    }
}

define_record! {
    /// A single recipient of a transaction plan.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct TransactionRecipient => TransactionRecipientView {
        kind: TransactionRecipient;
        0 => address: string,
        1 => amount: u64,
    }
}

define_record! {
    /// Summary of a transaction plan shown for confirmation before signing.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct TransactionSummary => TransactionSummaryView {
        kind: TransactionSummary;
        0 => recipients: [TransactionRecipient],
        /// Total of the transparent inputs
        1 => transparent_ins: u64,
        /// Net change of the sapling pool
        2 => sapling_net: i64,
        /// Net change of the orchard pool
        3 => orchard_net: i64,
        4 => fee: u64,
        /// Serialized unsigned plan
        5 => data: bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::factories::records::plan_summary, Record};

    #[test]
    fn request_from_partial_json() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"address":"zs1dest","amount":250000}"#).unwrap();
        assert_eq!(request.memo_string, "");
        assert!(request.memo_bytes.is_empty());

        let data = request.to_bytes().unwrap();
        let view = PaymentRequest::view_bytes(&data).unwrap();
        assert_eq!(view.address().unwrap(), "zs1dest");
        assert_eq!(view.amount().unwrap(), 250_000);
        assert!(view.memo_bytes().unwrap().is_empty());
    }

    #[test]
    fn summary() {
        let summary = plan_summary();
        let data = summary.to_bytes().unwrap();
        let view = TransactionSummary::view_bytes(&data).unwrap();

        let recipients = view.recipients().unwrap();
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients.get(1).unwrap().address().unwrap(), "u1second");
        assert_eq!(view.sapling_net().unwrap(), -310_000);
        assert_eq!(view.orchard_net().unwrap(), 300_000);
        assert_eq!(TransactionSummary::from_bytes(&data).unwrap(), summary);
    }

    #[test]
    fn summary_without_recipients() {
        let summary = TransactionSummary {
            fee: 10_000,
            ..Default::default()
        };
        let data = summary.to_bytes().unwrap();
        let view = TransactionSummary::view_bytes(&data).unwrap();
        assert!(view.recipients().unwrap().is_empty());
        assert!(view.recipients().unwrap().get(0).is_err());
        assert_eq!(TransactionSummary::from_bytes(&data).unwrap(), summary);
    }
}

//! Sample records with realistic field values.

use crate::records::{
    AccountName, Backup, InputShielded, TransactionInfo, TransactionInfoExtended,
    TransactionRecipient, TransactionSummary,
};

pub fn alice() -> AccountName {
    AccountName {
        id: 1,
        name: "Alice".to_string(),
        sapling_address: "zs1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq".to_string(),
        birth: 419_200,
    }
}

pub fn seed_backup() -> Backup {
    Backup {
        name: "Main".to_string(),
        seed: Some(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
             abandon about"
                .to_string(),
        ),
        index: 0,
        birth: 1_687_104,
        saved: true,
        ..Default::default()
    }
}

pub fn history_line() -> TransactionInfo {
    TransactionInfo {
        id: 33,
        txid: vec![0xEF; 32],
        height: 2_200_000,
        confirmations: 12,
        timestamp: 1_700_000_000,
        amount: -125_000,
        address: "zs1recipient".to_string(),
        contact: "Bob".to_string(),
        memo: "Rent".to_string(),
    }
}

/// A transaction with two sapling spends and nothing else.
pub fn two_sapling_spends() -> TransactionInfoExtended {
    let spend = |nf: u8, value: u64| InputShielded {
        nf: vec![nf; 32],
        address: "zs1spender".to_string(),
        value,
        rcm: vec![0x33; 32],
        rho: Vec::new(),
    };

    TransactionInfoExtended {
        height: 2_000_123,
        timestamp: 1_690_000_000,
        txid: vec![0xAB; 32],
        sins: vec![spend(0x11, 50_000), spend(0x22, 70_000)],
        ..Default::default()
    }
}

pub fn plan_summary() -> TransactionSummary {
    TransactionSummary {
        recipients: vec![
            TransactionRecipient {
                address: "zs1first".to_string(),
                amount: 100_000,
            },
            TransactionRecipient {
                address: "u1second".to_string(),
                amount: 200_000,
            },
        ],
        transparent_ins: 0,
        sapling_net: -310_000,
        orchard_net: 300_000,
        fee: 10_000,
        data: vec![0x01, 0x02, 0x03],
    }
}

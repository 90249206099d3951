//! Fixtures shared by the integration tests.
//!
//! [`each_populated`] hands one record of every [`RecordKind`] to a [`Visit`] implementation.
//! Every field of those records, nested records included, holds a non-default value.

#![allow(dead_code)]

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use shieldbuf::prelude::*;
use strum::IntoEnumIterator;

/// What the tests need from a record type besides its encoding.
pub trait Sample: Record + Default + Serialize + DeserializeOwned + PartialEq + Debug + Send {}

impl<R> Sample for R where R: Record + Default + Serialize + DeserializeOwned + PartialEq + Debug + Send {}

/// Receives one record per kind from [`each_populated`].
pub trait Visit {
    fn visit<R: Sample>(&mut self, kind: RecordKind, record: R);
}

/// Visit a fully populated record of every kind, in declaration order.
pub fn each_populated<V: Visit>(visitor: &mut V) {
    for kind in RecordKind::iter() {
        match kind {
            RecordKind::Backup => visitor.visit(kind, backup()),
            RecordKind::TransactionInfo => visitor.visit(kind, transaction()),
            RecordKind::TransactionInfoExtended => visitor.visit(kind, extended()),
            RecordKind::InputTransparent => visitor.visit(kind, transparent_input(0)),
            RecordKind::OutputTransparent => visitor.visit(kind, transparent_output(0)),
            RecordKind::InputShielded => visitor.visit(kind, shielded_input(0x11)),
            RecordKind::OutputShielded => visitor.visit(kind, shielded_output(0x44)),
            RecordKind::ShieldedNote => visitor.visit(kind, note()),
            RecordKind::ShieldedMessage => visitor.visit(kind, message()),
            RecordKind::UAReceivers => visitor.visit(kind, receivers()),
            RecordKind::PaymentRequest => visitor.visit(kind, payment()),
            RecordKind::AccountName => visitor.visit(kind, account(1)),
            RecordKind::ContactCard => visitor.visit(kind, contact()),
            RecordKind::TransactionRecipient => visitor.visit(kind, recipient(1)),
            RecordKind::TransactionSummary => visitor.visit(kind, summary()),
            RecordKind::AccountNameList => visitor.visit(
                kind,
                AccountNameList {
                    items: vec![account(1), account(2)],
                },
            ),
        }
    }
}

pub fn backup() -> Backup {
    Backup {
        name: "Main".to_string(),
        seed: Some("abandon ability able about above absent".to_string()),
        index: 3,
        sk: Some("secret-extended-key-main".to_string()),
        fvk: Some("zxviews1main".to_string()),
        uvk: Some("uview1main".to_string()),
        tsk: Some("xprv9main".to_string()),
        birth: 1_687_104,
        saved: true,
    }
}

pub fn transaction() -> TransactionInfo {
    TransactionInfo {
        id: 1,
        txid: vec![0xAB; 32],
        height: 2_000_000,
        confirmations: 4,
        timestamp: 1_700_000_000,
        amount: -50_000,
        address: "zs1dest".to_string(),
        contact: "Dana".to_string(),
        memo: "Groceries ✓".to_string(),
    }
}

pub fn transparent_input(vout: u32) -> InputTransparent {
    InputTransparent {
        txid: vec![0x01; 32],
        vout: vout + 2,
        address: "t1in".to_string(),
        value: 9_000,
    }
}

pub fn transparent_output(index: u64) -> OutputTransparent {
    OutputTransparent {
        address: format!("t1out{index}"),
        value: 8_000 + index,
    }
}

pub fn shielded_input(nf: u8) -> InputShielded {
    InputShielded {
        nf: vec![nf; 32],
        address: "zs1in".to_string(),
        value: 40_000,
        rcm: vec![0x22; 32],
        rho: vec![0x33; 32],
    }
}

pub fn shielded_output(cmx: u8) -> OutputShielded {
    OutputShielded {
        incoming: true,
        cmx: vec![cmx; 32],
        address: "u1out".to_string(),
        value: 30_000,
        rcm: vec![0x55; 32],
        rho: vec![0x66; 32],
        memo: "hi".to_string(),
    }
}

pub fn extended() -> TransactionInfoExtended {
    TransactionInfoExtended {
        height: 2_000_123,
        timestamp: 1_690_000_000,
        txid: vec![0x77; 32],
        tins: vec![transparent_input(0), transparent_input(1)],
        touts: vec![transparent_output(0), transparent_output(1)],
        sins: vec![shielded_input(0x11), shielded_input(0x12)],
        souts: vec![shielded_output(0x44)],
        oins: vec![shielded_input(0x13)],
        oouts: vec![shielded_output(0x45), shielded_output(0x46)],
    }
}

pub fn note() -> ShieldedNote {
    ShieldedNote {
        height: 2_000_000,
        confirmations: 3,
        timestamp: 1_700_000_000,
        value: 123_456,
        orchard: true,
    }
}

pub fn message() -> ShieldedMessage {
    ShieldedMessage {
        id_msg: 7,
        id_tx: 33,
        txid: vec![0xCC; 32],
        height: 2_100_000,
        timestamp: 1_710_000_000,
        incoming: true,
        nout: 1,
        sender: "zs1sender".to_string(),
        recipient: "zs1me".to_string(),
        subject: "Lunch".to_string(),
        body: "Tomorrow at noon?".to_string(),
        read: true,
    }
}

pub fn receivers() -> UAReceivers {
    UAReceivers {
        transparent: "t1abc".to_string(),
        sapling: "zs1abc".to_string(),
        orchard: "u1abc".to_string(),
    }
}

pub fn payment() -> PaymentRequest {
    PaymentRequest {
        address: "zs1pay".to_string(),
        amount: 250_000,
        memo_string: "Invoice 12".to_string(),
        memo_bytes: vec![0xF6, 0x01],
    }
}

pub fn account(id: u32) -> AccountName {
    AccountName {
        id,
        name: format!("Account {id}"),
        sapling_address: format!("zs1account{id}"),
        birth: 419_200 + id,
    }
}

pub fn contact() -> ContactCard {
    ContactCard {
        id: 9,
        account: 1,
        name: "Carol".to_string(),
        address: "u1carol".to_string(),
        saved: true,
    }
}

pub fn recipient(amount: u64) -> TransactionRecipient {
    TransactionRecipient {
        address: format!("zs1to{amount}"),
        amount,
    }
}

pub fn summary() -> TransactionSummary {
    TransactionSummary {
        recipients: vec![recipient(10), recipient(20)],
        transparent_ins: 1,
        sapling_net: -2,
        orchard_net: 3,
        fee: 10_000,
        data: vec![5; 8],
    }
}

//! Integration tests for schema evolution.
//!
//! Buffers written with one version of a record layout must be readable with another one as
//! long as slots are only ever appended: older readers skip fields they don't know, newer
//! readers see defaults for fields that were never written.

use shieldbuf::{define_record, prelude::*};

define_record! {
    /// First published layout of a note.
    #[derive(Eq)]
    pub struct NoteV1 => NoteV1View {
        0 => height: u32,
        1 => value: u64,
    }
}

define_record! {
    /// Second layout: two fields appended.
    #[derive(Eq)]
    pub struct NoteV2 => NoteV2View {
        0 => height: u32,
        1 => value: u64,
        2 => label: string,
        3 => spends: [NoteV1],
    }
}

define_record! {
    /// An account reader that only knows the first two slots.
    #[derive(Eq)]
    pub struct AccountHeader => AccountHeaderView {
        0 => id: u32,
        1 => name: string,
    }
}

#[test]
fn old_reader_skips_new_fields() {
    let v2 = NoteV2 {
        height: 1_000,
        value: 5_000,
        label: "change".to_string(),
        spends: vec![NoteV1 {
            height: 900,
            value: 6_000,
        }],
    };
    let data = v2.to_bytes().unwrap();

    let v1 = NoteV1::from_bytes(&data).unwrap();
    assert_eq!(
        v1,
        NoteV1 {
            height: 1_000,
            value: 5_000
        }
    );
}

#[test]
fn new_reader_defaults_missing_fields() {
    let data = NoteV1 {
        height: 1_000,
        value: 5_000,
    }
    .to_bytes()
    .unwrap();

    let view = NoteV2::view_bytes(&data).unwrap();
    assert_eq!(view.label().unwrap(), "");
    assert!(view.spends().unwrap().is_empty());
    assert_eq!(
        view.unpack().unwrap(),
        NoteV2 {
            height: 1_000,
            value: 5_000,
            ..Default::default()
        }
    );
}

#[test]
fn partial_account_reader() {
    let account = AccountName {
        id: 12,
        name: "Savings".to_string(),
        sapling_address: "zs1savings".to_string(),
        birth: 2_500_000,
    };
    let data = account.to_bytes().unwrap();

    let header = AccountHeader::from_bytes(&data).unwrap();
    assert_eq!(header.id, 12);
    assert_eq!(header.name, "Savings");

    // Writing the header back yields a valid account with defaults for the dropped slots
    let rewritten = AccountName::from_bytes(&header.to_bytes().unwrap()).unwrap();
    assert_eq!(rewritten.sapling_address, "");
    assert_eq!(rewritten.birth, 0);
}

#[test]
fn unknown_slots_visible_in_directory() {
    let data = NoteV2 {
        label: "x".to_string(),
        ..Default::default()
    }
    .to_bytes()
    .unwrap();

    let table = NoteV1::view_bytes(&data).unwrap().table();
    assert!(table.has_field(2).unwrap());
    assert_eq!(table.get_str(2).unwrap(), Some("x"));
    assert!(!table.has_field(0).unwrap());
}

#[test]
fn declared_records_have_no_builtin_kind() {
    assert_eq!(NoteV2::KIND, None);
    assert_eq!(NoteV2::NAME, "NoteV2");
    assert_eq!(AccountName::KIND, Some(RecordKind::AccountName));
}

#[test]
fn slot_layout_introspection() {
    assert_eq!(
        NoteV2::FIELDS,
        &[(0, "height"), (1, "value"), (2, "label"), (3, "spends")]
    );
    assert_eq!(RecordKind::AccountName.fields()[..2], AccountHeader::FIELDS[..]);
}

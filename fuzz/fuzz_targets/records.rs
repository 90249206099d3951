#![no_main]

use libfuzzer_sys::fuzz_target;
use shieldbuf::{records::list_from_bytes, records::ShieldedNote, ReaderConfig, RecordKind};
use strum::IntoEnumIterator;

fuzz_target!(|data: &[u8]| {
    for kind in RecordKind::iter() {
        let _ = kind.check(data, ReaderConfig::permissive());
    }
    let _ = list_from_bytes::<ShieldedNote>(data);
});

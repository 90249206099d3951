//! Account backups.
//!
//! The key fields are the only optional fields of the schema: depending on how an account was
//! created, exactly one of seed, secret key, viewing key or unified viewing key is its primary
//! secret. A key that is `Some` is always written, even when it is an empty string.

use serde::{Deserialize, Serialize};

define_record! {
    /// Everything required to restore an account.
    #[derive(Eq, Serialize, Deserialize)]
    pub struct Backup => BackupView {
        kind: Backup;
        /// Account name
        0 => name: string,
        /// Seed phrase
        1 => seed: opt_string,
        /// Derivation index below the seed
        2 => index: u32,
        /// Sapling extended secret key
        3 => sk: opt_string,
        /// Sapling full viewing key
        4 => fvk: opt_string,
        /// Unified viewing key
        5 => uvk: opt_string,
        /// Transparent secret key
        6 => tsk: opt_string,
        /// Birth height
        7 => birth: u32,
        /// Whether the user confirmed that the backup was saved
        8 => saved: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::factories::records::seed_backup, BuilderConfig, Reader, Record};

    #[test]
    fn seed_account() {
        let backup = seed_backup();
        let data = backup.to_bytes().unwrap();
        let view = Backup::view_bytes(&data).unwrap();

        assert_eq!(view.name().unwrap(), "Main");
        assert!(view.seed().unwrap().is_some());
        assert_eq!(view.sk().unwrap(), None);
        assert_eq!(view.fvk().unwrap(), None);
        assert_eq!(Backup::from_bytes(&data).unwrap(), backup);
    }

    #[test]
    fn empty_key_is_present() {
        let backup = Backup {
            name: "Watch only".to_string(),
            fvk: Some(String::new()),
            ..Default::default()
        };
        let data = backup.to_bytes().unwrap();

        let root = Reader::new(&data).unwrap().root().unwrap();
        assert!(root.has_field(4).unwrap());
        assert!(!root.has_field(1).unwrap());

        let decoded = Backup::from_bytes(&data).unwrap();
        assert_eq!(decoded.fvk.as_deref(), Some(""));
        assert_eq!(decoded.seed, None);
    }

    #[test]
    fn force_defaults_keeps_absent_keys_absent() {
        let data = Backup::default()
            .to_bytes_with(BuilderConfig::explicit())
            .unwrap();
        let root = Reader::new(&data).unwrap().root().unwrap();

        // Scalars and the plain string are written, the optional keys are not
        let slots: Vec<u16> = root.directory().unwrap().iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![0, 2, 7, 8]);
        assert_eq!(Backup::from_bytes(&data).unwrap(), Backup::default());
    }
}

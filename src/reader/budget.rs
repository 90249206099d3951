//! Limits on how much a full decode may materialize.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{file::io::SOFFSET_SIZE, Error, Result};

/// Running totals of one full decode, shared by every view derived from a [`crate::Reader`].
///
/// The builder writes every string, byte field and table exactly once. A buffer it produced
/// therefore never yields more string and byte payload than its own length, nor more tables
/// than fit into it at [`SOFFSET_SIZE`] bytes each. A crafted buffer that references the same
/// data over and over exceeds one of these limits and is rejected with
/// [`Error::DecodeLimit`] before the copies are made.
///
/// [`crate::Record::from_bytes`] and the list decoders attach a budget automatically. Zero-copy
/// views from [`crate::Reader::new`] run without one.
///
/// # Examples
///
/// ```rust
/// use shieldbuf::{records::AccountName, reader::DecodeBudget, Reader, ReaderConfig, Record};
///
/// let data = AccountName { id: 2, name: "Bob".to_string(), ..Default::default() }.to_bytes()?;
/// let budget = DecodeBudget::for_buffer(data.len());
/// let reader = Reader::with_budget(&data, ReaderConfig::default(), &budget)?;
///
/// let account = AccountName::decode(reader.root()?)?;
/// assert_eq!(account.name, "Bob");
/// assert_eq!(budget.tables(), 1);
/// assert_eq!(budget.bytes(), 3);
/// # Ok::<(), shieldbuf::Error>(())
/// ```
#[derive(Debug)]
pub struct DecodeBudget {
    max_bytes: usize,
    max_tables: usize,
    bytes: AtomicUsize,
    tables: AtomicUsize,
}

impl DecodeBudget {
    /// Budget for decoding a buffer of `len` bytes.
    #[must_use]
    pub fn for_buffer(len: usize) -> DecodeBudget {
        DecodeBudget {
            max_bytes: len,
            max_tables: len / SOFFSET_SIZE,
            bytes: AtomicUsize::new(0),
            tables: AtomicUsize::new(0),
        }
    }

    /// String and byte payload materialized so far.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Tables visited so far.
    #[must_use]
    pub fn tables(&self) -> usize {
        self.tables.load(Ordering::Relaxed)
    }

    pub(crate) fn charge_bytes(&self, len: usize) -> Result<()> {
        Self::charge(&self.bytes, len, self.max_bytes, "payload bytes")
    }

    pub(crate) fn charge_table(&self) -> Result<()> {
        Self::charge(&self.tables, 1, self.max_tables, "tables")
    }

    fn charge(counter: &AtomicUsize, amount: usize, limit: usize, what: &'static str) -> Result<()> {
        let total = counter
            .fetch_add(amount, Ordering::Relaxed)
            .saturating_add(amount);
        if total > limit {
            return Err(Error::DecodeLimit { what, limit });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_follow_buffer_size() {
        let budget = DecodeBudget::for_buffer(10);

        budget.charge_bytes(6).unwrap();
        budget.charge_bytes(4).unwrap();
        assert!(matches!(
            budget.charge_bytes(1),
            Err(Error::DecodeLimit {
                what: "payload bytes",
                limit: 10
            })
        ));

        budget.charge_table().unwrap();
        budget.charge_table().unwrap();
        assert!(matches!(
            budget.charge_table(),
            Err(Error::DecodeLimit { limit: 2, .. })
        ));
        assert_eq!(budget.tables(), 3);
    }

    #[test]
    fn huge_charge_saturates() {
        let budget = DecodeBudget::for_buffer(64);
        budget.charge_bytes(8).unwrap();
        assert!(budget.charge_bytes(usize::MAX).is_err());
        assert!(budget.charge_bytes(1).is_err());
    }
}

use std::sync::{Arc, PoisonError, RwLock};

use crate::ledger::Ledger;

/// Process-wide holder for the live ledger generation.
///
/// Readers take an `Arc` snapshot and keep working against that generation
/// even if an import swaps in a new one mid-search; `replace` is the only
/// mutation and exchanges the whole generation under the write lock, so a
/// search can never observe a partially rebuilt store.
#[derive(Debug)]
pub struct LedgerStore {
    current: RwLock<Arc<Ledger>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        LedgerStore {
            current: RwLock::new(Arc::new(Ledger::empty())),
        }
    }

    pub fn snapshot(&self) -> Arc<Ledger> {
        // A poisoned lock only means a panic elsewhere mid-read; the Arc
        // swap itself cannot be left half-done.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a freshly built generation, discarding the previous one.
    pub fn replace(&self, ledger: Ledger) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(ledger);
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::purchase::PurchaseRecord;
    use chrono::NaiveDate;

    fn one_record_ledger(id: u64) -> Ledger {
        Ledger::from_records(vec![PurchaseRecord {
            id,
            order_id: "A".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 30).unwrap(),
            amount: Money::from_cents(1420),
            description: String::new(),
            item_url: String::new(),
            order_url: String::new(),
            asin: String::new(),
            quantity: 1,
        }])
    }

    #[test]
    fn starts_empty() {
        assert!(LedgerStore::new().snapshot().is_empty());
    }

    #[test]
    fn replace_swaps_the_whole_generation() {
        let store = LedgerStore::new();
        store.replace(one_record_ledger(1));
        assert_eq!(store.snapshot().purchases().len(), 1);

        store.replace(Ledger::empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn snapshots_survive_a_replace() {
        let store = LedgerStore::new();
        store.replace(one_record_ledger(1));

        let before = store.snapshot();
        store.replace(Ledger::empty());

        // The old generation stays consistent for readers that hold it.
        assert_eq!(before.purchases().len(), 1);
        assert!(store.snapshot().is_empty());
    }
}

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::PrayerRecord;

/// Holds the imported prayer times. An import swaps in a whole new snapshot,
/// so a reader either sees the old list or the new one.
#[derive(Debug)]
pub struct PrayerStore {
    records: RwLock<Arc<[PrayerRecord]>>,
}

impl PrayerStore {
    pub fn new(records: Vec<PrayerRecord>) -> Self {
        Self {
            records: RwLock::new(records.into()),
        }
    }

    pub fn snapshot(&self) -> Arc<[PrayerRecord]> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, records: Vec<PrayerRecord>) {
        let next: Arc<[PrayerRecord]> = records.into();
        log::info!("Replacing prayer times: {} records", next.len());
        *self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PrayerStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

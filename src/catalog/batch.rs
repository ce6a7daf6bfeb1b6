use crate::inventory::ApplicationRecord;

/// Default maximum number of applications per generation call
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// A contiguous, non-empty slice of the inventory processed in one tool call
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Zero-based position among the run's batches
    pub index: usize,
    pub records: &'a [ApplicationRecord],
}

impl<'a> Batch<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

/// Splits `records` into batches of at most `max_size`, preserving order.
///
/// A `max_size` of zero is treated as one.
pub fn partition(records: &[ApplicationRecord], max_size: usize) -> Vec<Batch<'_>> {
    records
        .chunks(max_size.max(1))
        .enumerate()
        .map(|(index, records)| Batch { index, records })
        .collect()
}

use super::{Catalog, CatalogEntry};
use crate::extract::ExtractionResult;
use crate::inventory::ApplicationRecord;
use tracing::debug;

/// Produces exactly one catalog entry per requested record.
///
/// Descriptions come from `extracted` when it has the record's name and are empty
/// otherwise. Names in `extracted` that were never requested are dropped.
pub fn merge(records: &[ApplicationRecord], extracted: &ExtractionResult) -> Catalog {
    let merged: Catalog = records
        .iter()
        .map(|record| {
            let description = extracted
                .get(&record.name)
                .map(String::as_str)
                .unwrap_or_default();
            (
                record.name.clone(),
                CatalogEntry::from_record(record, description),
            )
        })
        .collect();

    let unrequested = extracted
        .keys()
        .filter(|name| !merged.contains_key(name.as_str()))
        .count();
    if unrequested > 0 {
        debug!(unrequested, "Discarded descriptions for applications not in batch");
    }

    merged
}

use crate::inventory::ApplicationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application name to merged catalog entry
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// Generated description merged with the application's collected metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Generated description, empty when generation or extraction missed
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub raw_description: String,
    #[serde(default)]
    pub bundle_identifier: String,
    #[serde(default)]
    pub path: String,
}

impl CatalogEntry {
    pub fn from_record(record: &ApplicationRecord, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            version: record.version.clone(),
            created: record.created,
            modified: record.modified,
            copyright: record.copyright.clone(),
            raw_description: record.raw_description.clone(),
            bundle_identifier: record.bundle_identifier.clone(),
            path: record.path.clone(),
        }
    }

    pub fn is_described(&self) -> bool {
        !self.description.is_empty()
    }
}

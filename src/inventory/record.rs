use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about one installed application, as collected from its bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Bundle name without the `.app` suffix; unique within a run
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub bundle_identifier: String,
    #[serde(default)]
    pub copyright: String,
    /// Description shipped in the bundle manifest, if any
    #[serde(default)]
    pub raw_description: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version: String::new(),
            bundle_identifier: String::new(),
            copyright: String::new(),
            raw_description: String::new(),
            created: None,
            modified: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_bundle_identifier(mut self, bundle_identifier: impl Into<String>) -> Self {
        self.bundle_identifier = bundle_identifier.into();
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn with_raw_description(mut self, raw_description: impl Into<String>) -> Self {
        self.raw_description = raw_description.into();
        self
    }

    pub fn with_timestamps(
        mut self,
        created: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let record = ApplicationRecord::new("Safari", "/Applications/Safari.app")
            .with_version("17.5")
            .with_bundle_identifier("com.apple.Safari")
            .with_copyright("© Apple Inc.")
            .with_raw_description("Browser")
            .with_timestamps(Some(created), None);

        assert_eq!(record.name, "Safari");
        assert_eq!(record.version, "17.5");
        assert_eq!(record.bundle_identifier, "com.apple.Safari");
        assert_eq!(record.copyright, "© Apple Inc.");
        assert_eq!(record.raw_description, "Browser");
        assert_eq!(record.created, Some(created));
        assert!(record.modified.is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let record: ApplicationRecord =
            serde_json::from_str(r#"{"name": "Skim", "path": "/Applications/Skim.app"}"#).unwrap();
        assert_eq!(record, ApplicationRecord::new("Skim", "/Applications/Skim.app"));
    }
}

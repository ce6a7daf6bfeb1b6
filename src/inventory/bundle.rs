use super::plist::{parse_info_plist, BundleInfo};
use super::{ApplicationRecord, InventoryCollector};
use crate::fs::{FileSystem, FileType, RealFileSystem};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BUNDLE_SUFFIX: &str = ".app";
const MAX_PLIST_BYTES: usize = 4 * 1024 * 1024;

/// Collects `.app` bundles from one or more directories
pub struct BundleCollector<F: FileSystem = RealFileSystem> {
    fs: F,
    search_dirs: Vec<PathBuf>,
    limit: Option<usize>,
}

impl BundleCollector<RealFileSystem> {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self::with_fs(RealFileSystem::new(), search_dirs)
    }
}

impl<F: FileSystem> BundleCollector<F> {
    pub fn with_fs(fs: F, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            fs,
            search_dirs,
            limit: None,
        }
    }

    /// Keeps only the first `limit` applications (after sorting by name)
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn read_bundle(&self, bundle_path: &Path, name: &str) -> ApplicationRecord {
        let (created, modified) = match self.fs.metadata(bundle_path) {
            Ok(meta) => (meta.created, meta.modified),
            Err(e) => {
                debug!(bundle = %bundle_path.display(), error = %e, "No bundle timestamps");
                (None, None)
            }
        };

        let info = self.read_info(bundle_path);

        ApplicationRecord::new(name, bundle_path.display().to_string())
            .with_version(info.version)
            .with_bundle_identifier(info.bundle_identifier)
            .with_copyright(info.copyright)
            .with_raw_description(info.description)
            .with_timestamps(created, modified)
    }

    fn read_info(&self, bundle_path: &Path) -> BundleInfo {
        let plist_path = bundle_path.join("Contents").join("Info.plist");
        if !self.fs.is_file(&plist_path) {
            debug!(bundle = %bundle_path.display(), "Bundle has no Info.plist");
            return BundleInfo::default();
        }

        let bytes = match self.fs.read_bytes(&plist_path, MAX_PLIST_BYTES) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(plist = %plist_path.display(), error = %e, "Unreadable Info.plist");
                return BundleInfo::default();
            }
        };

        parse_info_plist(&bytes).unwrap_or_else(|e| {
            debug!(plist = %plist_path.display(), error = %e, "Invalid Info.plist");
            BundleInfo::default()
        })
    }
}

impl<F: FileSystem> InventoryCollector for BundleCollector<F> {
    fn collect(&self) -> Result<Vec<ApplicationRecord>> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.search_dirs {
            if !self.fs.is_dir(dir) {
                warn!(dir = %dir.display(), "Application directory not found, skipping");
                continue;
            }

            let mut entries = self
                .fs
                .read_dir(dir)
                .with_context(|| format!("Failed to list applications in {}", dir.display()))?;
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            for entry in entries {
                let Some(name) = entry.file_name().strip_suffix(BUNDLE_SUFFIX) else {
                    continue;
                };
                if name.is_empty() || entry.file_type() != FileType::Directory {
                    continue;
                }
                if !seen.insert(name.to_string()) {
                    warn!(
                        app = name,
                        path = %entry.path().display(),
                        "Duplicate application name, keeping the first one found"
                    );
                    continue;
                }

                records.push(self.read_bundle(entry.path(), name));
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        debug!(applications = records.len(), "Inventory collected");
        Ok(records)
    }
}

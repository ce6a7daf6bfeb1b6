use super::Catalog;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Durable storage for a finished catalog
pub trait CatalogStore: Send + Sync {
    /// Replaces the stored catalog with `catalog`
    fn save(&self, catalog: &Catalog) -> Result<()>;

    /// Reads the stored catalog
    fn load(&self) -> Result<Catalog>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Pretty-printed JSON document on disk, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonCatalogStore {
    fn save(&self, catalog: &Catalog) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;

        let json =
            serde_json::to_string_pretty(catalog).context("Failed to serialize catalog to JSON")?;

        // Same directory as the target so the final rename stays on one filesystem
        let mut staged = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
        staged
            .write_all(json.as_bytes())
            .and_then(|_| staged.write_all(b"\n"))
            .context("Failed to write catalog")?;
        staged
            .as_file()
            .sync_all()
            .context("Failed to flush catalog to disk")?;
        staged
            .persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(
            path = %self.path.display(),
            entries = catalog.len(),
            "Catalog saved"
        );
        Ok(())
    }

    fn load(&self) -> Result<Catalog> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog {}", self.path.display()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

//! Installed application inventory

mod bundle;
pub mod plist;
mod record;

pub use bundle::BundleCollector;
pub use record::ApplicationRecord;

use anyhow::Result;

/// Source of the applications to describe in a run
pub trait InventoryCollector: Send + Sync {
    /// Returns the applications in a stable order, names unique
    fn collect(&self) -> Result<Vec<ApplicationRecord>>;
}

/// A fixed inventory, e.g. one loaded from elsewhere or built in tests
impl InventoryCollector for Vec<ApplicationRecord> {
    fn collect(&self) -> Result<Vec<ApplicationRecord>> {
        Ok(self.clone())
    }
}

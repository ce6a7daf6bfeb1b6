//! Catalog model, batching, merge and persistence

mod batch;
mod entry;
mod merge;
mod store;

pub use batch::{partition, Batch, DEFAULT_BATCH_SIZE};
pub use entry::{Catalog, CatalogEntry};
pub use merge::merge;
pub use store::{CatalogStore, JsonCatalogStore};

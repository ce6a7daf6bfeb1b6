//! appscribe - catalog installed applications with generated descriptions
//!
//! The crate collects application bundles, asks an external text generation tool to
//! describe them in batches, and merges whatever it can recover from the tool's
//! free-form output with the metadata it collected itself. The result is a catalog
//! keyed by application name that always has one entry per collected application.
//!
//! # Example Usage
//!
//! ```no_run
//! use appscribe::{BundleCollector, CatalogBuilder, CommandInvoker, JsonCatalogStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let invoker = Arc::new(CommandInvoker::new("goose", vec!["run".into(), "-t".into()]));
//! let builder = CatalogBuilder::new(invoker).with_batch_size(10);
//!
//! let collector = BundleCollector::new(vec!["/Applications".into()]);
//! let store = JsonCatalogStore::new("applications.json");
//! let summary = builder.run(&collector, &store).await?;
//! println!("{} of {} described", summary.described, summary.applications);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`inventory`]: application bundle discovery and Info.plist metadata
//! - [`prompt`]: prompt rendering for a batch
//! - [`invoker`]: running the generation tool
//! - [`sanitize`] and [`extract`]: recovering a name to description mapping from output
//! - [`catalog`]: batching, merging and persistence
//! - [`pipeline`]: the sequential run that ties them together

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fs;
pub mod inventory;
pub mod invoker;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod sanitize;
pub mod transcript;
pub mod util;

pub use catalog::{merge, partition, Batch, Catalog, CatalogEntry, CatalogStore, JsonCatalogStore};
pub use config::{AppscribeConfig, ConfigError};
pub use error::{CatalogError, InvokeError};
pub use extract::{extract, ExtractionResult};
pub use inventory::{ApplicationRecord, BundleCollector, InventoryCollector};
pub use invoker::{CommandInvoker, GenerationInvoker, MockInvoker};
pub use pipeline::{CatalogBuilder, RunSummary};
pub use prompt::{PromptBuilder, TemplatePromptBuilder};
pub use sanitize::strip_ansi;
pub use util::{init_from_args, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

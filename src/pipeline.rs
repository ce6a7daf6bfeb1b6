//! Catalog run orchestration
//!
//! [`CatalogBuilder`] drives every batch through render, invoke, sanitize, extract and
//! merge, strictly one batch at a time. A batch whose prompt cannot be rendered or whose
//! invocation fails still contributes an entry (with an empty description) for each of
//! its applications, so a run always covers the whole inventory.

use crate::catalog::{merge, partition, Batch, Catalog, CatalogStore, DEFAULT_BATCH_SIZE};
use crate::config::{AppscribeConfig, ConfigError};
use crate::error::CatalogError;
use crate::extract::{extract, ExtractionResult};
use crate::inventory::{ApplicationRecord, InventoryCollector};
use crate::invoker::GenerationInvoker;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::prompt::{PromptBuilder, TemplatePromptBuilder};
use crate::sanitize::strip_ansi;
use crate::transcript::TranscriptLogger;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Counts describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub applications: usize,
    /// Entries with a non-empty description
    pub described: usize,
    pub batches: usize,
    pub failed_batches: usize,
}

struct BatchOutcome {
    extracted: ExtractionResult,
    failed: bool,
}

pub struct CatalogBuilder {
    prompt_builder: Arc<dyn PromptBuilder>,
    invoker: Arc<dyn GenerationInvoker>,
    progress: Arc<dyn ProgressHandler>,
    transcript: TranscriptLogger,
    batch_size: usize,
}

impl CatalogBuilder {
    pub fn new(invoker: Arc<dyn GenerationInvoker>) -> Self {
        Self {
            prompt_builder: Arc::new(TemplatePromptBuilder::default()),
            invoker,
            progress: Arc::new(NoOpHandler),
            transcript: TranscriptLogger::disabled(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Wires the prompt template, transcript and batch size from `config`
    pub fn from_config(
        config: &AppscribeConfig,
        invoker: Arc<dyn GenerationInvoker>,
    ) -> Result<Self, ConfigError> {
        let prompt_builder = match &config.prompt_template {
            Some(path) => TemplatePromptBuilder::from_file(path)?,
            None => TemplatePromptBuilder::default(),
        };

        Ok(Self::new(invoker)
            .with_prompt_builder(Arc::new(prompt_builder))
            .with_transcript(TranscriptLogger::new(config.transcript_path.clone()))
            .with_batch_size(config.batch_size))
    }

    pub fn with_prompt_builder(mut self, prompt_builder: Arc<dyn PromptBuilder>) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    pub fn with_progress_handler(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_transcript(mut self, transcript: TranscriptLogger) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Describes every record, returning one catalog entry per record.
    pub async fn build(&self, records: &[ApplicationRecord]) -> (Catalog, RunSummary) {
        let start = Instant::now();
        let batches = partition(records, self.batch_size);
        let total = batches.len();

        self.progress.on_progress(&ProgressEvent::RunStarted {
            applications: records.len(),
            batches: total,
        });

        let mut catalog = Catalog::new();
        let mut summary = RunSummary {
            applications: records.len(),
            batches: total,
            ..Default::default()
        };

        for batch in &batches {
            let outcome = self.describe_batch(batch, total).await;
            if outcome.failed {
                summary.failed_batches += 1;
            }
            catalog.extend(merge(batch.records, &outcome.extracted));
        }

        summary.described = catalog.values().filter(|e| e.is_described()).count();

        self.progress.on_progress(&ProgressEvent::RunCompleted {
            described: summary.described,
            total: catalog.len(),
            elapsed: start.elapsed(),
        });

        (catalog, summary)
    }

    async fn describe_batch(&self, batch: &Batch<'_>, total: usize) -> BatchOutcome {
        let failed = |error: String| {
            self.progress.on_progress(&ProgressEvent::BatchFailed {
                index: batch.index,
                error,
            });
            BatchOutcome {
                extracted: ExtractionResult::new(),
                failed: true,
            }
        };

        let prompt = match self.prompt_builder.render(batch) {
            Ok(prompt) => prompt,
            Err(e) => return failed(format!("{:#}", e)),
        };

        self.progress.on_progress(&ProgressEvent::BatchStarted {
            index: batch.index,
            total,
            size: batch.len(),
        });

        let call_start = Instant::now();
        let raw = self.invoker.generate(&prompt).await;
        let elapsed = call_start.elapsed();

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                self.transcript.log_batch(
                    batch.index,
                    &prompt,
                    "",
                    &ExtractionResult::new(),
                    elapsed.as_millis() as u64,
                );
                return failed(e.to_string());
            }
        };

        self.progress.on_progress(&ProgressEvent::BatchInvoked {
            index: batch.index,
            response_len: raw.len(),
            elapsed,
        });

        let response = strip_ansi(&raw);
        let extracted = extract(&response);
        self.transcript.log_batch(
            batch.index,
            &prompt,
            &response,
            &extracted,
            elapsed.as_millis() as u64,
        );

        let found = batch
            .names()
            .filter(|name| extracted.contains_key(*name))
            .count();
        self.progress.on_progress(&ProgressEvent::BatchExtracted {
            index: batch.index,
            extracted: found,
            requested: batch.len(),
        });

        BatchOutcome {
            extracted,
            failed: false,
        }
    }

    /// Collects the inventory, describes it, and replaces the stored catalog.
    ///
    /// Nothing is written when the inventory is empty or collection fails.
    pub async fn run(
        &self,
        collector: &dyn InventoryCollector,
        store: &dyn CatalogStore,
    ) -> Result<RunSummary, CatalogError> {
        let records = collector.collect().map_err(CatalogError::Inventory)?;
        if records.is_empty() {
            return Err(CatalogError::EmptyInventory);
        }
        debug!(applications = records.len(), "Inventory collected");

        let (catalog, summary) = self.build(&records).await;

        store.save(&catalog).map_err(CatalogError::Persist)?;
        info!(
            location = %store.location(),
            entries = catalog.len(),
            "Catalog written"
        );

        Ok(summary)
    }
}

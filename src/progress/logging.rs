//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted {
                applications,
                batches,
            } => {
                info!(applications, batches, "Building catalog");
            }
            ProgressEvent::BatchStarted { index, total, size } => {
                info!(
                    batch = format!("{}/{}", index + 1, total),
                    size, "Describing batch"
                );
            }
            ProgressEvent::BatchInvoked {
                index,
                response_len,
                elapsed,
            } => {
                debug!(
                    batch = index,
                    response_len,
                    elapsed_ms = elapsed.as_millis(),
                    "Generation tool responded"
                );
            }
            ProgressEvent::BatchFailed { index, error } => {
                warn!(batch = index, error = %error, "Batch failed, descriptions left empty");
            }
            ProgressEvent::BatchExtracted {
                index,
                extracted,
                requested,
            } => {
                if extracted < requested {
                    warn!(
                        batch = index,
                        extracted, requested, "Some descriptions missing from response"
                    );
                } else {
                    debug!(batch = index, extracted, requested, "Descriptions extracted");
                }
            }
            ProgressEvent::RunCompleted {
                described,
                total,
                elapsed,
            } => {
                info!(
                    described,
                    total,
                    total_time_ms = elapsed.as_millis(),
                    "Catalog complete"
                );
            }
        }
    }
}

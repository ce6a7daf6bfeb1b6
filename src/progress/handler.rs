//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a catalog is being built
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Inventory collected and partitioned
    RunStarted { applications: usize, batches: usize },

    /// Prompt rendered, generation tool about to run
    BatchStarted {
        index: usize,
        total: usize,
        size: usize,
    },

    /// Generation tool returned output
    BatchInvoked {
        index: usize,
        response_len: usize,
        elapsed: Duration,
    },

    /// Prompt rendering or generation failed; the batch contributes empty descriptions
    BatchFailed { index: usize, error: String },

    /// Descriptions extracted from the batch response
    BatchExtracted {
        index: usize,
        extracted: usize,
        requested: usize,
    },

    /// Every batch processed
    RunCompleted {
        described: usize,
        total: usize,
        elapsed: Duration,
    },
}

/// Trait for handling progress events during a catalog run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

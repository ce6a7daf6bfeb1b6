// Transcript of every generation exchange, one JSON object per line
use crate::extract::ExtractionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Serialize)]
struct TranscriptEntry<'a> {
    batch: usize,
    prompt: &'a str,
    response: &'a str,
    extracted: &'a ExtractionResult,
    latency_ms: u64,
    timestamp: DateTime<Utc>,
}

pub struct TranscriptLogger {
    writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl TranscriptLogger {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let writer = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Arc::new(Mutex::new(BufWriter::new(file)))),
                Err(e) => {
                    warn!("Failed to open transcript file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Appends one exchange. `response` is the sanitized tool output, empty when
    /// the invocation failed.
    pub fn log_batch(
        &self,
        batch: usize,
        prompt: &str,
        response: &str,
        extracted: &ExtractionResult,
        latency_ms: u64,
    ) {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = TranscriptEntry {
            batch,
            prompt,
            response,
            extracted,
            latency_ms,
            timestamp: Utc::now(),
        };

        if let Ok(mut writer) = writer.lock() {
            match serde_json::to_string(&entry) {
                Ok(json) => {
                    if let Err(e) = writeln!(writer, "{}", json) {
                        warn!("Failed to write transcript entry: {}", e);
                    }
                    if let Err(e) = writer.flush() {
                        warn!("Failed to flush transcript: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize transcript entry for batch {}: {}", batch, e);
                }
            }
        }

        debug!("Transcript: batch={} latency_ms={}", batch, latency_ms);
    }
}

impl Default for TranscriptLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

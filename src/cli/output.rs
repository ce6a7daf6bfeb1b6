//! Output formatting for JSON, YAML and human-readable text
//!
//! Every printable value goes through [`OutputFormatter`] so the subcommands share one
//! notion of each format. JSON output is pretty-printed with non-ASCII text preserved.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::extract::ExtractionResult;
use crate::pipeline::RunSummary;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Result of probing the generation tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub tool: String,
    pub available: bool,
    pub message: String,
    /// First line of the tool's `--version` output
    pub details: Option<String>,
}

impl HealthStatus {
    pub fn available(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            available: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn unavailable(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            available: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    catalog: &'a str,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn format_data<T: Serialize>(&self, value: &T, what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what)),
            _ => serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what)),
        }
    }

    pub fn format_catalog(&self, catalog: &Catalog) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_catalog_human(catalog)),
            _ => self.format_data(catalog, "catalog"),
        }
    }

    pub fn format_entry(&self, name: &str, entry: &CatalogEntry) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_entry_human(name, entry)),
            _ => self.format_data(entry, "catalog entry"),
        }
    }

    pub fn format_extraction(&self, extracted: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                if extracted.is_empty() {
                    return Ok("No descriptions recovered\n".to_string());
                }
                let mut output = String::new();
                for (name, description) in extracted {
                    output.push_str(&format!("{}: {}\n", name, description));
                }
                Ok(output)
            }
            _ => self.format_data(extracted, "extraction result"),
        }
    }

    pub fn format_summary(&self, summary: &RunSummary, location: &str) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let symbol = if summary.failed_batches == 0 {
                    "\u{2713}"
                } else {
                    "\u{26A0}"
                };
                let mut output = format!("{} Catalog written to {}\n", symbol, location);
                output.push_str(&format!(
                    "  Described: {}/{}\n",
                    summary.described, summary.applications
                ));
                output.push_str(&format!(
                    "  Batches:   {} ({} failed)\n",
                    summary.batches, summary.failed_batches
                ));
                Ok(output)
            }
            _ => self.format_data(
                &RunReport {
                    catalog: location,
                    summary,
                },
                "run summary",
            ),
        }
    }

    pub fn format_health(&self, status: &HealthStatus) -> Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str("Generation Tool Health\n");
                output.push_str(RULE);
                output.push_str("\n\n");

                let symbol = if status.available {
                    "\u{2713}"
                } else {
                    "\u{2717}"
                };
                output.push_str(&format!("{} {}\n", symbol, status.tool));
                output.push_str(&format!(
                    "  Status: {}\n",
                    if status.available {
                        "Available"
                    } else {
                        "Unavailable"
                    }
                ));
                output.push_str(&format!("  Message: {}\n", status.message));
                if let Some(ref details) = status.details {
                    output.push_str(&format!("  Details: {}\n", details));
                }
                Ok(output)
            }
            _ => self.format_data(status, "health status"),
        }
    }
}

fn format_catalog_human(catalog: &Catalog) -> String {
    let described = catalog.values().filter(|e| e.is_described()).count();

    let mut output = String::new();
    output.push_str(&format!(
        "Application Catalog ({} applications, {} described)\n",
        catalog.len(),
        described
    ));
    output.push_str(RULE);
    output.push_str("\n\n");

    for (name, entry) in catalog {
        if entry.version.is_empty() {
            output.push_str(&format!("{}\n", name));
        } else {
            output.push_str(&format!("{} ({})\n", name, entry.version));
        }
        if entry.is_described() {
            output.push_str(&format!("  {}\n", entry.description));
        } else {
            output.push_str("  (no description)\n");
        }
    }

    output
}

fn format_entry_human(name: &str, entry: &CatalogEntry) -> String {
    let mut output = format!("{}\n", name);
    if entry.is_described() {
        output.push_str(&format!("  {}\n\n", entry.description));
    } else {
        output.push_str("  (no description)\n\n");
    }

    let mut fields = vec![
        ("Version", entry.version.clone()),
        ("Identifier", entry.bundle_identifier.clone()),
        ("Path", entry.path.clone()),
        ("Copyright", entry.copyright.clone()),
    ];
    if let Some(modified) = entry.modified {
        fields.push(("Modified", modified.to_rfc3339()));
    }

    let last = fields.iter().rposition(|(_, v)| !v.is_empty());
    for (i, (label, value)) in fields.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let connector = if Some(i) == last {
            "\u{2514}\u{2500}"
        } else {
            "\u{251C}\u{2500}"
        };
        output.push_str(&format!("{} {:<11} {}\n", connector, format!("{}:", label), value));
    }

    output
}

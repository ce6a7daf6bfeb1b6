//! Prompt rendering for a batch of applications
//!
//! Templates are Jinja documents rendered with `minijinja`. They see three variables:
//! `apps` (the batch's records as objects), `applications` (the same records as a
//! pretty JSON array) and `count`.

use crate::catalog::Batch;
use crate::config::ConfigError;
use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A template must reference at least one of these to list the batch
pub const LISTING_VARIABLES: [&str; 2] = ["applications", "apps"];

const DEFAULT_TEMPLATE: &str = r#"You are cataloguing the applications installed on a Mac.

For each of the {{count}} applications below, write one or two plain sentences describing
what the application does and who it is for. Use the bundle metadata as a hint, but rely on
your own knowledge when the metadata is empty.

Applications:
{{applications}}

Respond with a single JSON object inside one ```json fenced code block. Use each
application's exact "name" as the key and its description as the string value. Do not add
nested objects, arrays, or any other keys.
"#;

pub trait PromptBuilder: Send + Sync {
    fn render(&self, batch: &Batch<'_>) -> Result<String>;
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

/// Entry of the `applications` JSON listing
#[derive(Serialize)]
struct PromptApplication<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    version: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    bundle_identifier: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    description: &'a str,
}

/// Entry of the `apps` sequence; every field is present, empty when unknown
#[derive(Serialize)]
struct TemplateApplication<'a> {
    name: &'a str,
    path: &'a str,
    version: &'a str,
    bundle_identifier: &'a str,
    description: &'a str,
}

/// Fills a Jinja template with the batch's application list
#[derive(Debug, Clone)]
pub struct TemplatePromptBuilder {
    source: String,
}

impl TemplatePromptBuilder {
    /// Compiles `template` once to reject syntax errors and templates that never
    /// reference the application list.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let source = template.into();
        let env = Environment::new();
        let referenced = env
            .template_from_str(&source)
            .map_err(|e| ConfigError::InvalidTemplate(e.to_string()))?
            .undeclared_variables(false);

        if !LISTING_VARIABLES.iter().any(|v| referenced.contains(*v)) {
            return Err(ConfigError::MissingPlaceholder("applications or apps"));
        }
        Ok(Self { source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let template = fs::read_to_string(path).map_err(|e| ConfigError::TemplateUnreadable {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::new(template)
    }

}

impl Default for TemplatePromptBuilder {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptBuilder for TemplatePromptBuilder {
    fn render(&self, batch: &Batch<'_>) -> Result<String> {
        let applications: Vec<PromptApplication<'_>> = batch
            .records
            .iter()
            .map(|r| PromptApplication {
                name: &r.name,
                version: &r.version,
                bundle_identifier: &r.bundle_identifier,
                description: &r.raw_description,
            })
            .collect();

        let listing = serde_json::to_string_pretty(&applications)
            .context("Failed to serialize applications for prompt")?;

        let apps: Vec<TemplateApplication<'_>> = batch
            .records
            .iter()
            .map(|r| TemplateApplication {
                name: &r.name,
                path: &r.path,
                version: &r.version,
                bundle_identifier: &r.bundle_identifier,
                description: &r.raw_description,
            })
            .collect();

        let env = Environment::new();
        let template = env
            .template_from_str(&self.source)
            .context("Invalid prompt template")?;
        template
            .render(context! {
                applications => listing,
                apps => apps,
                count => batch.len(),
            })
            .context("Failed to render prompt template")
    }
}

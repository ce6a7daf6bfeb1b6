//! Subcommand handlers. Each returns the process exit code.

use super::commands::{BuildArgs, DescribeArgs, HealthArgs, ParseArgs, ShowArgs};
use super::output::{HealthStatus, OutputFormat, OutputFormatter};
use crate::catalog::{Catalog, CatalogStore, JsonCatalogStore};
use crate::config::AppscribeConfig;
use crate::extract::extract;
use crate::inventory::BundleCollector;
use crate::invoker::CommandInvoker;
use crate::pipeline::CatalogBuilder;
use crate::progress::{LoggingHandler, NoOpHandler, ProgressHandler};
use crate::sanitize::strip_ansi;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub async fn handle_build(args: &BuildArgs, quiet: bool) -> i32 {
    let mut config = AppscribeConfig::default();
    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }
    debug!("{}", config);

    let invoker = Arc::new(CommandInvoker::from_config(&config));
    let progress: Arc<dyn ProgressHandler> = if quiet {
        Arc::new(NoOpHandler)
    } else {
        Arc::new(LoggingHandler)
    };
    let builder = match CatalogBuilder::from_config(&config, invoker) {
        Ok(builder) => builder.with_progress_handler(progress),
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };

    let collector =
        BundleCollector::new(config.application_dirs.clone()).with_limit(config.limit);
    let store = JsonCatalogStore::new(&config.output_path);

    info!(
        tool = %config.tool_command,
        batch_size = config.batch_size,
        "Refreshing catalog"
    );

    let summary = match builder.run(&collector, &store).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Catalog build failed: {}", e);
            return 1;
        }
    };

    if summary.failed_batches > 0 {
        warn!(
            failed = summary.failed_batches,
            "Some batches failed; rerun build to retry their descriptions"
        );
    }

    if !quiet {
        let formatter = OutputFormatter::new(args.format.into());
        match formatter.format_summary(&summary, &store.location()) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                error!("Failed to format output: {}", e);
                return 1;
            }
        }
    }

    0
}

fn catalog_path(explicit: &Option<PathBuf>) -> PathBuf {
    explicit
        .clone()
        .unwrap_or_else(|| AppscribeConfig::default().output_path)
}

fn load_catalog(explicit: &Option<PathBuf>) -> Option<Catalog> {
    let store = JsonCatalogStore::new(catalog_path(explicit));
    match store.load() {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\nRun 'appscribe build' to create the catalog.");
            None
        }
    }
}

fn print_output(output: Result<String>) -> i32 {
    match output {
        Ok(output) => {
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            0
        }
        Err(e) => {
            error!("Failed to format output: {}", e);
            1
        }
    }
}

pub fn handle_show(args: &ShowArgs) -> i32 {
    let Some(catalog) = load_catalog(&args.catalog) else {
        return 1;
    };
    print_output(OutputFormatter::new(args.format.into()).format_catalog(&catalog))
}

pub fn handle_describe(args: &DescribeArgs) -> i32 {
    let Some(catalog) = load_catalog(&args.catalog) else {
        return 1;
    };

    match catalog.get(&args.name) {
        Some(entry) => print_output(
            OutputFormatter::new(args.format.into()).format_entry(&args.name, entry),
        ),
        None => {
            eprintln!("No application named '{}' in the catalog", args.name);
            1
        }
    }
}

fn read_response(file: Option<&Path>) -> Result<String> {
    // Tool output is not guaranteed to be UTF-8
    let mut bytes = Vec::new();
    match file {
        Some(path) => {
            bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read standard input")?;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn handle_parse(args: &ParseArgs) -> i32 {
    let raw = match read_response(args.file.as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let extracted = extract(&strip_ansi(&raw));
    if extracted.is_empty() {
        warn!("No descriptions could be recovered from the response");
    }

    print_output(OutputFormatter::new(args.format.into()).format_extraction(&extracted))
}

pub async fn handle_health(args: &HealthArgs) -> i32 {
    let mut config = AppscribeConfig::default();
    if let Some(tool) = &args.tool {
        config.tool_command = tool.clone();
    }
    info!(tool = %config.tool_command, "Checking generation tool");

    let invoker = CommandInvoker::from_config(&config);
    let status = match invoker.probe().await {
        Ok(version) => {
            let status = HealthStatus::available(&config.tool_command, "Tool launched successfully");
            if version.is_empty() {
                status
            } else {
                status.with_details(version)
            }
        }
        Err(e) => {
            warn!(error = %e, "Generation tool is not available");
            HealthStatus::unavailable(&config.tool_command, e.to_string())
        }
    };

    let format: OutputFormat = args.format.into();
    let code = print_output(OutputFormatter::new(format).format_health(&status));
    if code != 0 || !status.available {
        1
    } else {
        0
    }
}

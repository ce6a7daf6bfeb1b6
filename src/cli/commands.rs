use crate::config::AppscribeConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Catalog installed applications with descriptions from a text generation tool
#[derive(Parser, Debug)]
#[command(
    name = "appscribe",
    about = "Catalog installed applications with descriptions from a text generation tool",
    version,
    long_about = "appscribe scans application bundles, asks an external generation tool to \
                  describe them in batches, recovers the descriptions from whatever text the \
                  tool prints, and writes a JSON catalog keyed by application name."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan applications and rebuild the catalog",
        long_about = "Collects application bundles, describes them in batches with the \
                      generation tool and replaces the catalog file once every batch is done.\n\n\
                      Examples:\n  \
                      appscribe build\n  \
                      appscribe build --applications-dir ~/Applications --batch-size 5\n  \
                      appscribe build --tool llm --tool-arg prompt --limit 20"
    )]
    Build(BuildArgs),

    #[command(about = "Print a saved catalog")]
    Show(ShowArgs),

    #[command(
        about = "Print one application's catalog entry",
        long_about = "Looks up an application by exact name. Exits with status 1 when the \
                      catalog has no entry for it."
    )]
    Describe(DescribeArgs),

    #[command(
        about = "Extract a description mapping from saved tool output",
        long_about = "Strips terminal escapes from a captured generation response and runs \
                      the extractor over it, printing the recovered mapping.\n\n\
                      Examples:\n  \
                      appscribe parse response.txt\n  \
                      goose run -t \"...\" | appscribe parse"
    )]
    Parse(ParseArgs),

    #[command(about = "Check that the generation tool can be launched")]
    Health(HealthArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct BuildArgs {
    #[arg(
        long = "applications-dir",
        value_name = "DIR",
        help = "Directory to scan for .app bundles (repeatable; replaces the configured list)"
    )]
    pub applications_dirs: Vec<PathBuf>,

    #[arg(short = 'o', long, value_name = "FILE", help = "Catalog file to write")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "N", help = "Applications per generation call")]
    pub batch_size: Option<usize>,

    #[arg(long, value_name = "SECONDS", help = "Generation call timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "PROGRAM", help = "Generation tool executable")]
    pub tool: Option<String>,

    #[arg(
        long = "tool-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        help = "Argument placed before the prompt (repeatable; replaces the configured list)"
    )]
    pub tool_args: Vec<String>,

    #[arg(long, value_name = "FILE", help = "Jinja prompt template referencing `apps` or `applications`")]
    pub prompt_template: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Append every exchange to this JSONL file")]
    pub transcript: Option<PathBuf>,

    #[arg(long, value_name = "N", help = "Only describe the first N applications")]
    pub limit: Option<usize>,

    #[arg(long, help = "Ask the generation tool not to buffer its output")]
    pub unbuffered: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Run summary format"
    )]
    pub format: OutputFormatArg,
}

impl BuildArgs {
    /// Overrides `config` with every flag that was given
    pub fn apply_to(&self, config: &mut AppscribeConfig) {
        if !self.applications_dirs.is_empty() {
            config.application_dirs = self
                .applications_dirs
                .iter()
                .map(|d| crate::config::expand_home(d))
                .collect();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(tool) = &self.tool {
            config.tool_command = tool.clone();
        }
        if !self.tool_args.is_empty() {
            config.tool_args = self.tool_args.clone();
        }
        if let Some(template) = &self.prompt_template {
            config.prompt_template = Some(template.clone());
        }
        if let Some(transcript) = &self.transcript {
            config.transcript_path = Some(transcript.clone());
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        if self.unbuffered {
            config.disable_output_buffering = true;
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Catalog file (defaults to the configured output)"
    )]
    pub catalog: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeArgs {
    #[arg(value_name = "NAME", help = "Application name, as listed in the catalog")]
    pub name: String,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Catalog file (defaults to the configured output)"
    )]
    pub catalog: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    #[arg(value_name = "FILE", help = "Saved tool output (reads stdin when omitted)")]
    pub file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, value_name = "PROGRAM", help = "Generation tool to check")]
    pub tool: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    #[default]
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

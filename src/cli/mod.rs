pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    BuildArgs, CliArgs, Commands, DescribeArgs, HealthArgs, OutputFormatArg, ParseArgs, ShowArgs,
};
pub use output::{HealthStatus, OutputFormat, OutputFormatter};

use appscribe::cli::commands::{CliArgs, Commands};
use appscribe::cli::handlers::{
    handle_build, handle_describe, handle_health, handle_parse, handle_show,
};
use appscribe::util::init_from_args;
use appscribe::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_from_args(args.log_level.as_deref(), args.verbose, args.quiet);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Build(build_args) => handle_build(build_args, args.quiet).await,
        Commands::Show(show_args) => handle_show(show_args),
        Commands::Describe(describe_args) => handle_describe(describe_args),
        Commands::Parse(parse_args) => handle_parse(parse_args),
        Commands::Health(health_args) => handle_health(health_args).await,
    };

    process::exit(exit_code);
}

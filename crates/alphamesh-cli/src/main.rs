mod config;
mod error;
mod pipeline;
mod tools;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{GenerateArgs, GenerateOptions, ImageArgs, ImageOptions};
use crate::error::CliError;

#[derive(Parser)]
#[command(version, about = "Turn the opaque regions of an image into triangle meshes", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace an image (or an EPS trace) and write its triangles as JSON
    Generate(GenerateArgs),
    /// Render a generated JSON mesh to PNG for inspection
    Image(ImageArgs),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Generate(args) => pipeline::run_generate(&GenerateOptions::from_args(args)?),
        Commands::Image(args) => pipeline::run_image(&ImageOptions::from_args(args)?),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

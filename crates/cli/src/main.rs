mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{ExtractArgs, cmd_extract};
use crate::output::{OutputFormat, print_error};

/// buildinfo - Build metadata extraction
#[derive(Parser)]
#[command(name = "buildinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format for summaries
  #[arg(short, long, global = true, value_enum, default_value_t)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Extract a build-info record from a graph snapshot
  Extract {
    /// Path to the graph snapshot (JSON)
    #[arg(short, long)]
    graph: PathBuf,

    /// Path to the configuration file (default: buildinfo.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a configuration property (key=value)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Record the process environment as build variables
    #[arg(long)]
    include_env: bool,

    /// Write the record to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Extract {
      graph,
      config,
      defines,
      include_env,
      output,
    } => cmd_extract(
      ExtractArgs {
        graph,
        config,
        defines,
        include_env,
        output,
      },
      cli.format,
    ),
  };

  if let Err(e) = result {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

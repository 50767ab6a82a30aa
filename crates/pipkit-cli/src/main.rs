mod dispatch;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use crate::dispatch::run_cli;

const LOG_ENV: &str = "PIPKIT_LOG";

#[derive(Parser, Debug)]
#[command(name = "pipkit")]
#[command(about = "Dependency-resolving package manager", long_about = None)]
struct Cli {
    /// Directory holding one sub-directory per package.
    #[arg(long, env = "PIPKIT_REGISTRY", global = true)]
    registry: Option<PathBuf>,
    /// Directory packages are installed into. Must start empty.
    #[arg(long, env = "PIPKIT_WORKSPACE", global = true)]
    workspace: Option<PathBuf>,
    /// TOML manager configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Render listings and search results as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Disable status badges and colors.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install packages and their dependencies.
    Install {
        /// Read package names from a requirements file.
        #[arg(short = 'r', long = "requirement")]
        requirement: Option<PathBuf>,
        names: Vec<String>,
    },
    /// Execute a session script against one manager.
    Run { script: PathBuf },
    /// Print a shell completion script.
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

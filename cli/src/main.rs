//! CLOAK Operator CLI
//!
//! Command-line tools for configuring and exercising a shielded pool.
//!
//! # Usage
//!
//! ```bash
//! # Write a local development configuration
//! cloak init --profile local
//!
//! # Print the accumulator zero table for the configured oracle
//! cloak zeros --depth 20
//!
//! # Replay an operation script, keeping state between runs
//! cloak simulate script.json --state pool.bin
//! ```

use clap::{Parser, Subcommand};
use cloak_hash::HashOracle;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use commands::{InitCommand, SimulateCommand, ZerosCommand};
use config::CloakConfig;

/// CLOAK shielded pool
#[derive(Parser)]
#[command(name = "cloak")]
#[command(author = "CLOAK Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shielded value ledger operator tools", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long, global = true, env = "CLOAK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a configuration file
    Init(InitCommand),

    /// Print the zero table and empty root
    Zeros(ZerosCommand),

    /// Replay a JSON operation script against a pool
    Simulate(SimulateCommand),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = CloakConfig::resolve(cli.config.clone(), cli.data_dir.clone())
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = cli.log_level.as_deref().unwrap_or(&settings.level);
    logging::init(level, cli.json_logs || settings.format == "json")?;

    match cli.command {
        Commands::Init(cmd) => cmd.execute(cli.data_dir),
        Commands::Zeros(cmd) => cmd.execute(cli.config, cli.data_dir),
        Commands::Simulate(cmd) => cmd.execute(cli.config, cli.data_dir),
        Commands::Version => {
            println!("cloak {}", env!("CARGO_PKG_VERSION"));
            println!(
                "Accumulator: depth {}, {} historical roots",
                cloak_pool::DEFAULT_TREE_DEPTH,
                cloak_pool::ROOT_HISTORY_SIZE
            );
            println!("Default oracle: {}", cloak_hash::PoseidonOracle::new().name());
            Ok(())
        }
    }
}

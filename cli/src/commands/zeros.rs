//! Zeros Command - print the accumulator zero table

use std::path::PathBuf;

use clap::Args;
use cloak_pool::Accumulator;
use serde::Serialize;

use crate::config::{CloakConfig, OracleKind};

/// Print `zeros[i]` for every level and the empty-tree root
#[derive(Args)]
pub struct ZerosCommand {
    /// Tree depth (defaults to the configured depth)
    #[arg(long)]
    depth: Option<usize>,

    /// Hash oracle (defaults to the configured oracle)
    #[arg(long, value_enum)]
    oracle: Option<OracleKind>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ZeroTable {
    oracle: &'static str,
    depth: usize,
    zeros: Vec<String>,
    empty_root: String,
}

impl ZerosCommand {
    pub fn execute(self, config: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
        let config = CloakConfig::resolve(config, data_dir)?;
        let depth = self.depth.unwrap_or(config.pool.tree_depth);
        let oracle = self.oracle.unwrap_or(config.ledger.oracle);

        let table = zero_table(depth, oracle)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&table)?);
        } else {
            println!("oracle: {}", table.oracle);
            for (level, zero) in table.zeros.iter().enumerate() {
                println!("zero[{:>2}] {}", level, zero);
            }
            println!("root     {}", table.empty_root);
        }

        Ok(())
    }
}

fn zero_table(depth: usize, oracle: OracleKind) -> anyhow::Result<ZeroTable> {
    let accumulator = Accumulator::new(depth, oracle.build())?;
    let zeros = (0..depth)
        .filter_map(|level| accumulator.zeros(level))
        .map(|zero| zero.to_hex())
        .collect();

    Ok(ZeroTable {
        oracle: accumulator.oracle_name(),
        depth,
        zeros,
        empty_root: accumulator.empty_root().to_hex(),
    })
}

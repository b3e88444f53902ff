//! Init Command - write a configuration file

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::config::{default_config_path, default_data_dir, CloakConfig};

/// Write a configuration file for a profile
#[derive(Args)]
pub struct InitCommand {
    /// Profile to initialize (local, production)
    #[arg(short, long, default_value = "local")]
    profile: String,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    pub fn execute(self, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
        let data_dir = data_dir.unwrap_or_else(|| default_data_dir(&self.profile));
        let config_path = default_config_path(&data_dir);

        info!("Initializing {} pool configuration", self.profile);
        info!("Data directory: {}", data_dir.display());

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        fs::create_dir_all(data_dir.join("state"))?;

        let config = CloakConfig::for_profile(&self.profile);
        config.save(&config_path)?;
        info!("Configuration saved to {}", config_path.display());

        if config.ledger.admins.is_empty() {
            warn!("No administrators configured; asset registration and pausing are disabled");
        }

        println!();
        println!("Pool configuration written to {}", config_path.display());
        println!("  variant:    {}", config.pool.variant);
        println!("  tree depth: {}", config.pool.tree_depth);
        println!("  oracle:     {:?}", config.ledger.oracle);
        println!();
        println!("To replay an operation script:");
        println!(
            "  cloak simulate <script.json> --data-dir {} --state {}",
            data_dir.display(),
            data_dir.join("state").join("pool.bin").display()
        );

        Ok(())
    }
}

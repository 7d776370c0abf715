//! Command-line argument parsing for the healing engine.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Healing engine command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "mend", about = "Mend terrain healing engine")]
pub struct CliArgs {
    /// Seconds to wait before an event starts healing.
    #[arg(long)]
    pub wait: Option<u32>,

    /// Restore one block per poll instead of batching.
    #[arg(long)]
    pub block_per_block: Option<bool>,

    /// Enable the probabilistic collateral scan.
    #[arg(long)]
    pub collateral: Option<bool>,

    /// Collateral inclusion chance, 0-100.
    #[arg(long)]
    pub collateral_chance: Option<u8>,

    /// Fixed seed for the collateral draw (reproducible runs).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(wait) = args.wait {
            self.heal.wait_seconds = wait;
        }
        if let Some(bpb) = args.block_per_block {
            self.heal.block_per_block = bpb;
        }
        if let Some(enabled) = args.collateral {
            self.collateral.enabled = enabled;
        }
        if let Some(chance) = args.collateral_chance {
            self.collateral.chance_percent = chance;
        }
        if let Some(seed) = args.seed {
            self.collateral.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            wait: Some(5),
            block_per_block: None,
            collateral: Some(true),
            collateral_chance: None,
            seed: Some(42),
            log_level: None,
            config: None,
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.heal.wait_seconds, 5);
        assert!(config.collateral.enabled);
        assert_eq!(config.collateral.seed, Some(42));
        // Non-overridden fields retain defaults
        assert!(!config.heal.block_per_block);
        assert_eq!(config.collateral.chance_percent, 20);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs {
            wait: None,
            block_per_block: None,
            collateral: None,
            collateral_chance: None,
            seed: None,
            log_level: None,
            config: None,
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config, original);
    }
}

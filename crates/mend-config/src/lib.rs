//! Configuration system for the Mend healing engine.
//!
//! Provides runtime-configurable healing policy that persists to disk as RON
//! files. Supports per-world overrides with a block blacklist, CLI overrides
//! via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BlockMatch, CollateralConfig, Config, DebugConfig, HealConfig, SafetyConfig, WorldOverrides,
    WorldPolicy,
};
pub use error::ConfigError;

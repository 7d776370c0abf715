//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level healing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Timing and mode settings.
    pub heal: HealConfig,
    /// Probabilistic collateral inclusion settings.
    pub collateral: CollateralConfig,
    /// Exploit-prevention and occupant-safety settings.
    pub safety: SafetyConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// Per-world overrides, keyed by world name.
    pub worlds: HashMap<String, WorldOverrides>,
}

/// Timing and mode settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealConfig {
    /// Seconds between an event and the start of its restoration.
    pub wait_seconds: u32,
    /// Restore one block per poll instead of the whole event at once.
    pub block_per_block: bool,
    /// Drop blacklisted destroyed blocks as loot instead of discarding them.
    pub drop_destroyed: bool,
}

/// Probabilistic collateral inclusion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollateralConfig {
    /// Scan for collateral-kind blocks around each event.
    pub enabled: bool,
    /// Scan radius in blocks (spherical, clipped to world height bounds).
    pub radius: u8,
    /// Per-block inclusion chance, 0–100.
    pub chance_percent: u8,
    /// Fixed seed for the collateral draw. `None` seeds from OS entropy at
    /// startup; set a value for reproducible runs.
    pub seed: Option<u64>,
}

/// Exploit-prevention and occupant-safety settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SafetyConfig {
    /// Restore destroyed explosives immediately instead of letting them
    /// chain-detonate.
    pub prevent_chain_reaction: bool,
    /// Relocate occupants embedded in restored terrain.
    pub teleport_on_suffocate: bool,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g. "debug", "info", "warn").
    pub log_level: String,
}

/// A blacklist entry: matches a block kind, optionally narrowed to one
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockMatch {
    /// The registry kind to match.
    pub kind: u16,
    /// Restrict the match to this variant; `None` matches every variant.
    pub variant: Option<u8>,
}

impl BlockMatch {
    /// Returns `true` if this entry matches the given kind/variant pair.
    pub fn matches(&self, kind: u16, variant: u8) -> bool {
        self.kind == kind && self.variant.is_none_or(|v| v == variant)
    }
}

/// Per-world overrides. Absent fields fall back to the global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldOverrides {
    /// Override of [`HealConfig::wait_seconds`].
    pub wait_seconds: Option<u32>,
    /// Override of [`HealConfig::block_per_block`].
    pub block_per_block: Option<bool>,
    /// Override of [`HealConfig::drop_destroyed`].
    pub drop_destroyed: Option<bool>,
    /// Override of [`SafetyConfig::prevent_chain_reaction`].
    pub prevent_chain_reaction: Option<bool>,
    /// Block kinds never restored in this world.
    pub blacklist: Vec<BlockMatch>,
}

/// The merged per-world policy view handed to the capture pipeline.
///
/// Resolved once per event by [`Config::world_policy`]; an event keeps the
/// policy it was recorded under even if the config is reloaded mid-flight.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolicy {
    /// Seconds between the event and the start of its restoration.
    pub wait_seconds: u32,
    /// Restore one block per poll instead of batching.
    pub block_per_block: bool,
    /// Drop blacklisted destroyed blocks as loot.
    pub drop_destroyed: bool,
    /// Restore destroyed explosives immediately.
    pub prevent_chain_reaction: bool,
    /// Block kinds never restored in this world.
    pub blacklist: Vec<BlockMatch>,
}

impl WorldPolicy {
    /// Returns `true` if the given kind/variant pair is blacklisted.
    pub fn is_blacklisted(&self, kind: u16, variant: u8) -> bool {
        self.blacklist.iter().any(|m| m.matches(kind, variant))
    }
}

// --- Default implementations ---

impl Default for HealConfig {
    fn default() -> Self {
        Self {
            wait_seconds: 60,
            block_per_block: false,
            drop_destroyed: true,
        }
    }
}

impl Default for CollateralConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 5,
            chance_percent: 20,
            seed: None,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            prevent_chain_reaction: false,
            teleport_on_suffocate: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks every value that would corrupt later computations.
    ///
    /// A bad wait time or scan radius poisons every event recorded under it,
    /// so loading and event construction both refuse invalid configs up
    /// front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collateral.chance_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "collateral.chance_percent must be 0-100, got {}",
                self.collateral.chance_percent
            )));
        }
        if self.collateral.enabled && self.collateral.radius == 0 {
            return Err(ConfigError::Invalid(
                "collateral.radius must be at least 1 when the scan is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the merged policy for a world by name.
    ///
    /// Worlds without an override entry get the global settings and an empty
    /// blacklist.
    pub fn world_policy(&self, world_name: &str) -> WorldPolicy {
        let overrides = self.worlds.get(world_name);
        WorldPolicy {
            wait_seconds: overrides
                .and_then(|o| o.wait_seconds)
                .unwrap_or(self.heal.wait_seconds),
            block_per_block: overrides
                .and_then(|o| o.block_per_block)
                .unwrap_or(self.heal.block_per_block),
            drop_destroyed: overrides
                .and_then(|o| o.drop_destroyed)
                .unwrap_or(self.heal.drop_destroyed),
            prevent_chain_reaction: overrides
                .and_then(|o| o.prevent_chain_reaction)
                .unwrap_or(self.safety.prevent_chain_reaction),
            blacklist: overrides.map(|o| o.blacklist.clone()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("wait_seconds: 60"));
        assert!(ron_str.contains("chance_percent: 20"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `collateral` section entirely
        let ron_str = "(heal: (), safety: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.collateral, CollateralConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.heal.wait_seconds = 180;
        config.collateral.enabled = true;
        config.worlds.insert(
            "nether".to_string(),
            WorldOverrides {
                block_per_block: Some(true),
                ..Default::default()
            },
        );

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.heal.wait_seconds = 5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().heal.wait_seconds, 5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_chance_over_100_rejected() {
        let mut config = Config::default();
        config.collateral.chance_percent = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_radius_rejected_only_when_enabled() {
        let mut config = Config::default();
        config.collateral.radius = 0;
        assert!(config.validate().is_ok());
        config.collateral.enabled = true;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_world_policy_merges_overrides() {
        let mut config = Config::default();
        config.worlds.insert(
            "nether".to_string(),
            WorldOverrides {
                wait_seconds: Some(10),
                blacklist: vec![BlockMatch {
                    kind: 7,
                    variant: None,
                }],
                ..Default::default()
            },
        );

        let policy = config.world_policy("nether");
        assert_eq!(policy.wait_seconds, 10);
        // Non-overridden fields fall back to globals.
        assert!(!policy.block_per_block);
        assert!(policy.is_blacklisted(7, 0));
        assert!(policy.is_blacklisted(7, 3));
        assert!(!policy.is_blacklisted(8, 0));

        let other = config.world_policy("overworld");
        assert_eq!(other.wait_seconds, 60);
        assert!(other.blacklist.is_empty());
    }

    #[test]
    fn test_block_match_variant_narrowing() {
        let m = BlockMatch {
            kind: 3,
            variant: Some(2),
        };
        assert!(m.matches(3, 2));
        assert!(!m.matches(3, 1));
        assert!(!m.matches(4, 2));
    }
}

//! Healing engine error types.

use mend_config::ConfigError;

/// Errors surfaced when constructing a heal event.
///
/// Restoration itself never fails fatally: capture anomalies are skipped and
/// restore anomalies degrade to dropping the block as loot. Only a policy
/// anomaly -- an invalid configuration that would corrupt every subsequent
/// computation -- is rejected up front.
#[derive(Debug, thiserror::Error)]
pub enum HealError {
    /// The active configuration failed validation.
    #[error("rejected heal event: {0}")]
    Config(#[from] ConfigError),
}

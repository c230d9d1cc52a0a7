//! Collection id generation and asset purge settings.

use serde::{Deserialize, Serialize};

/// Settings for minting collection ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// How many random ids are tried before giving up.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
    /// Seed for the random source; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            retry_budget: default_retry_budget(),
            seed: None,
        }
    }
}

/// Settings for the asset purge loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Assets fetched (and deleted) per cycle; the service caps this at 1000.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Wall-clock budget for one purge, in minutes.
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            timeout_minutes: default_timeout_minutes(),
        }
    }
}

/// Settings for collection create/delete behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Re-read the live directory before each create and refuse to write
    /// when the id appeared under another parent since planning.
    #[serde(default = "default_true")]
    pub verify_before_write: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            verify_before_write: default_true(),
        }
    }
}

fn default_retry_budget() -> u32 {
    5
}

fn default_batch_size() -> u32 {
    1000
}

fn default_timeout_minutes() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

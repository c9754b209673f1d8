//! `[storage]` section configuration.
//!
//! ```toml
//! [storage]
//! channels = "data/channels.json"   # relative to the config file
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Channel store file.
    pub channels: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            channels: "channels.json".into(),
        }
    }
}

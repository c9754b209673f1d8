//! Channels: persisted feed configurations.
//!
//! # Module Structure
//!
//! ```text
//! channel/
//! ├── store      # ChannelStore: durable CRUD keyed by id
//! ├── validate   # FieldErrors and per-field checks
//! └── manager    # ChannelManager: lifecycle + render pipeline
//! ```

mod manager;
mod store;
mod validate;

pub use manager::{ChannelManager, FeedSettings, RenderedFeed};
pub use store::ChannelStore;
pub use validate::{FieldErrors, fields};

use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Numeric channel id, assigned by the store (starts at 1).
pub type ChannelId = u32;

/// A named feed configuration bound to one content type and one feed type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Assigned on creation; ignored on drafts.
    #[serde(default)]
    pub id: ChannelId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Content type code; immutable once the channel exists.
    pub content_type: String,
    /// Feed type token (see [`crate::feed::FeedType`]).
    pub feed_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl Channel {
    pub fn new(
        content_type: impl Into<String>,
        feed_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            feed_type: feed_type.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn matches_status(&self, status: ChannelStatus) -> bool {
        match status {
            ChannelStatus::Active => self.active,
            ChannelStatus::NotActive => !self.active,
            ChannelStatus::All => true,
        }
    }
}

/// Listing filter on the activation flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "NOT_ACTIVE")]
    NotActive,
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl ChannelStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::NotActive => "NOT_ACTIVE",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ACTIVE" => Ok(Self::Active),
            "NOT_ACTIVE" => Ok(Self::NotActive),
            "ALL" => Ok(Self::All),
            other => Err(format!(
                "unknown status `{other}` (expected ACTIVE, NOT_ACTIVE or ALL)"
            )),
        }
    }
}

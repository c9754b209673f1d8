//! Error types shared by the channel core.

use crate::channel::{ChannelId, FieldErrors};
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Channel core errors.
///
/// Every failure is typed and propagated; the caller decides whether to
/// report, retry or abort.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more invalid fields (all violations are reported together).
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("channel {0} not found")]
    NotFound(ChannelId),

    #[error("content type `{content_type}` cannot back a feed: {issue}")]
    Binding {
        content_type: String,
        issue: BindingIssue,
    },

    #[error("unsupported feed type `{0}`")]
    UnsupportedFormat(String),

    #[error("IO error on channel store `{0}`")]
    Storage(PathBuf, #[source] io::Error),

    #[error("channel ids are exhausted")]
    IdsExhausted,

    #[error("channel store `{0}` is corrupt")]
    Corrupt(PathBuf, #[source] serde_json::Error),

    #[error("feed serialization failed: {0}")]
    Serialize(String),
}

impl Error {
    pub fn binding(content_type: impl Into<String>, issue: BindingIssue) -> Self {
        Self::Binding {
            content_type: content_type.into(),
            issue,
        }
    }

    pub fn serialize(err: impl fmt::Display) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Why a content type has no usable feed-title binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingIssue {
    UnknownType,
    MissingTitle { role: String },
    AmbiguousTitle { role: String, attributes: Vec<String> },
}

impl fmt::Display for BindingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType => write!(f, "not registered"),
            Self::MissingTitle { role } => write!(f, "no attribute has role `{role}`"),
            Self::AmbiguousTitle { role, attributes } => write!(
                f,
                "role `{role}` is set on several attributes: {}",
                attributes.join(", ")
            ),
        }
    }
}

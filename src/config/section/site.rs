//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! base_url = "https://news.example.com"
//! language = "it"
//! generator = "syndic"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Public site metadata copied into every feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public site URL; channel and item links are built from it.
    pub base_url: String,

    /// Language code (e.g., "en", "it").
    pub language: String,

    /// Generator name written into feeds that carry one.
    pub generator: String,
}

pub struct SiteFields {
    pub base_url: FieldPath,
    pub language: FieldPath,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5280".into(),
            language: "en".into(),
            generator: env!("CARGO_PKG_NAME").into(),
        }
    }
}

impl SiteConfig {
    pub const FIELDS: SiteFields = SiteFields {
        base_url: FieldPath::new("site.base_url"),
        language: FieldPath::new("site.language"),
    };

    /// `base_url` without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `base_url` must be an http(s) URL with a host
    /// - `language` must not be empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.base_url,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.base_url,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::FIELDS.base_url,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com",
                );
            }
        }

        if self.language.trim().is_empty() {
            diag.error(Self::FIELDS.language, "language must not be empty");
        }
    }
}

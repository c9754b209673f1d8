//! `[feed]` section configuration.
//!
//! ```toml
//! [feed]
//! path_prefix = "/feed"                  # feeds served at {base_url}/feed/{id}
//! item_link = "{base_url}/content/{id}"  # placeholders: {base_url} {type} {id}
//! max_items = 50                         # 0 = unlimited
//! minify = false
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL path under which channels are served.
    pub path_prefix: String,

    /// Entry link template.
    pub item_link: String,

    /// Maximum entries per feed (0 = unlimited).
    pub max_items: usize,

    /// Strip indentation from rendered feeds.
    pub minify: bool,
}

pub struct FeedFields {
    pub path_prefix: FieldPath,
    pub item_link: FieldPath,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/feed".into(),
            item_link: "{base_url}/content/{id}".into(),
            max_items: 50,
            minify: false,
        }
    }
}

impl FeedConfig {
    pub const FIELDS: FeedFields = FeedFields {
        path_prefix: FieldPath::new("feed.path_prefix"),
        item_link: FieldPath::new("feed.item_link"),
    };

    /// `path_prefix` with a leading slash and no trailing slash.
    pub fn path_prefix(&self) -> String {
        let trimmed = self.path_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Validate against the site's `base_url`.
    ///
    /// # Checks
    /// - `path_prefix` must be a plain URL path
    /// - `item_link` must contain `{id}` and expand to an absolute URL
    pub fn validate(&self, base_url: &str, diag: &mut ConfigDiagnostics) {
        if self
            .path_prefix
            .contains(|c: char| c.is_whitespace() || matches!(c, '?' | '#'))
        {
            diag.error_with_hint(
                Self::FIELDS.path_prefix,
                format!("invalid path prefix '{}'", self.path_prefix),
                "use a plain URL path like \"/feed\"",
            );
        }

        if !self.item_link.contains("{id}") {
            diag.error_with_hint(
                Self::FIELDS.item_link,
                "item link template must contain `{id}`",
                "e.g. \"{base_url}/content/{id}\"",
            );
        } else if url::Url::parse(base_url).is_ok() {
            // an invalid base_url is reported under `site.base_url`
            let sample = self
                .item_link
                .replace("{base_url}", base_url)
                .replace("{type}", "ART")
                .replace("{id}", "1");
            if let Err(e) = url::Url::parse(&sample) {
                diag.error_with_hint(
                    Self::FIELDS.item_link,
                    format!("item link '{sample}' is not an absolute URL ({e})"),
                    "start the template with {base_url} or a full http(s) URL",
                );
            }
        }
    }
}

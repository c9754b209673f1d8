//! `[registry]` section configuration.
//!
//! Points at the content registry and names the attribute roles that bind
//! content to feed entries.
//!
//! ```toml
//! [registry]
//! path = "content.toml"
//! title_role = "feed:title"
//! description_role = "feed:description"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Content registry TOML file, relative to the config file.
    pub path: PathBuf,

    /// Role marking the attribute that supplies entry titles.
    pub title_role: String,

    /// Role marking the attribute that supplies entry descriptions.
    pub description_role: String,
}

pub struct RegistryFields {
    pub title_role: FieldPath,
    pub description_role: FieldPath,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: "content.toml".into(),
            title_role: "feed:title".into(),
            description_role: "feed:description".into(),
        }
    }
}

impl RegistryConfig {
    pub const FIELDS: RegistryFields = RegistryFields {
        title_role: FieldPath::new("registry.title_role"),
        description_role: FieldPath::new("registry.description_role"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title_role.trim().is_empty() {
            diag.error(Self::FIELDS.title_role, "title role must not be empty");
        }
        if self.description_role.trim().is_empty() {
            diag.error(
                Self::FIELDS.description_role,
                "description role must not be empty",
            );
        } else if self.description_role == self.title_role {
            diag.error_with_hint(
                Self::FIELDS.description_role,
                format!("same role as {}", Self::FIELDS.title_role),
                "use distinct markers, e.g. \"feed:title\" and \"feed:description\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.registry.path, PathBuf::from("content.toml"));
        assert_eq!(config.registry.title_role, "feed:title");
        assert_eq!(config.registry.description_role, "feed:description");
    }

    #[test]
    fn test_custom_roles() {
        let config = test_parse_config("[registry]\ntitle_role = \"rss:titolo\"");
        assert_eq!(config.registry.title_role, "rss:titolo");
        assert_eq!(config.registry.description_role, "feed:description");
    }

    #[test]
    fn test_validate_roles() {
        let mut diag = ConfigDiagnostics::new();
        RegistryConfig {
            title_role: String::new(),
            ..RegistryConfig::default()
        }
        .validate(&mut diag);
        assert_eq!(diag.len(), 1);

        let mut diag = ConfigDiagnostics::new();
        RegistryConfig {
            description_role: "feed:title".into(),
            ..RegistryConfig::default()
        }
        .validate(&mut diag);
        assert_eq!(diag.errors()[0].field, RegistryConfig::FIELDS.description_role);
    }
}

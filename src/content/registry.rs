//! TOML-backed content registry.
//!
//! # Example
//!
//! ```toml
//! [[types]]
//! code = "ART"
//! description = "Articolo rassegna stampa"
//!
//! [[types.attributes]]
//! name = "Titolo"
//! roles = ["feed:title"]
//!
//! [[items]]
//! id = "ART1"
//! type = "ART"
//! last_modified = "2024-06-15"
//!
//! [items.attributes]
//! Titolo = "Hello"
//! ```

use super::{ContentItem, ContentRegistry, ContentType};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::{fs, path::Path};

/// In-memory registry loaded once from a TOML document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticRegistry {
    #[serde(default)]
    types: Vec<ContentType>,
    #[serde(default)]
    items: Vec<ContentItem>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content registry {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid content registry {}", path.display()))
    }

    /// Parse and check a registry document.
    ///
    /// Type codes must be unique and every item must reference a known type.
    pub fn from_str(content: &str) -> Result<Self> {
        let registry: Self = toml::from_str(content)?;

        let mut codes = FxHashSet::default();
        for ty in &registry.types {
            if !codes.insert(ty.code.as_str()) {
                bail!("duplicate content type `{}`", ty.code);
            }
        }
        for item in &registry.items {
            if !codes.contains(item.content_type.as_str()) {
                bail!(
                    "item `{}` references unknown content type `{}`",
                    item.id,
                    item.content_type
                );
            }
        }

        Ok(registry)
    }

    pub fn with_type(mut self, content_type: ContentType) -> Self {
        self.types.push(content_type);
        self
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl ContentRegistry for StaticRegistry {
    fn content_types(&self) -> Vec<ContentType> {
        self.types.clone()
    }

    fn content_type(&self, code: &str) -> Option<ContentType> {
        self.types.iter().find(|t| t.code == code).cloned()
    }

    fn published_items(&self, code: &str) -> Vec<ContentItem> {
        self.items
            .iter()
            .filter(|item| item.published && item.content_type == code)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
[[types]]
code = "ART"
description = "Articolo rassegna stampa"

[[types.attributes]]
name = "Titolo"
roles = ["feed:title"]

[[types.attributes]]
name = "Abstract"

[[types]]
code = "EVN"
description = "Evento"

[[items]]
id = "ART1"
type = "ART"
last_modified = "2024-06-15"

[items.attributes]
Titolo = "Primo"

[[items]]
id = "ART2"
type = "ART"
published = false

[[items]]
id = "EVN1"
type = "EVN"
"#;

    #[test]
    fn test_parse_registry() {
        let registry = StaticRegistry::from_str(REGISTRY).unwrap();
        assert_eq!(registry.content_types().len(), 2);
        assert_eq!(registry.item_count(), 3);

        let art = registry.content_type("ART").unwrap();
        assert_eq!(art.description, "Articolo rassegna stampa");
        assert_eq!(art.attributes.len(), 2);
        assert!(art.attribute("Titolo").unwrap().has_role("feed:title"));
        assert!(art.attribute("Abstract").unwrap().roles.is_empty());
        assert!(registry.content_type("NWS").is_none());
    }

    #[test]
    fn test_published_items_only() {
        let registry = StaticRegistry::from_str(REGISTRY).unwrap();
        let items = registry.published_items("ART");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "ART1");
        assert_eq!(items[0].attribute("Titolo"), Some("Primo"));
        assert_eq!(items[0].last_modified.as_deref(), Some("2024-06-15"));
        assert!(registry.published_items("NWS").is_empty());
    }

    #[test]
    fn test_unknown_item_type_rejected() {
        let doc = "[[items]]\nid = \"X1\"\ntype = \"NWS\"";
        let err = StaticRegistry::from_str(doc).unwrap_err();
        assert!(err.to_string().contains("unknown content type `NWS`"));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let doc = "[[types]]\ncode = \"ART\"\n[[types]]\ncode = \"ART\"";
        assert!(StaticRegistry::from_str(doc).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.toml");
        std::fs::write(&path, REGISTRY).unwrap();
        let registry = StaticRegistry::from_path(&path).unwrap();
        assert_eq!(registry.content_types().len(), 2);

        let missing = StaticRegistry::from_path(&dir.path().join("missing.toml"));
        assert!(missing.is_err());
    }
}

//! Content registry contract.
//!
//! The registry is an external collaborator: the channel core only reads
//! content types and published items from it, and never mutates content.
//! Implementations are injected as `Arc<dyn ContentRegistry>`.

mod binding;
mod registry;

pub use binding::BindingResolver;
pub use registry::StaticRegistry;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only access to content types and their published items.
pub trait ContentRegistry: Send + Sync {
    /// Every registered content type.
    fn content_types(&self) -> Vec<ContentType>;

    /// Look up one content type by code.
    fn content_type(&self, code: &str) -> Option<ContentType>;

    /// Published items of one content type, in registry order.
    fn published_items(&self, code: &str) -> Vec<ContentItem>;
}

/// A content type and its attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
}

impl ContentType {
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes carrying the given role marker, in declaration order.
    ///
    /// The yielded attributes borrow from the content type only, so they
    /// outlive a short-lived `role`.
    pub fn attributes_with_role<'a, 'r>(
        &'a self,
        role: &'r str,
    ) -> impl Iterator<Item = &'a AttributeDef> + use<'a, 'r> {
        self.attributes.iter().filter(move |a| a.has_role(role))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    #[inline]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A content item as seen by the feed pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

const fn default_published() -> bool {
    true
}

impl ContentItem {
    pub fn new(id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            last_modified: None,
            published: true,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_last_modified(mut self, date: impl Into<String>) -> Self {
        self.last_modified = Some(date.into());
        self
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_matches_outlive_role_string() {
        let ty = ContentType {
            code: "ART".into(),
            description: String::new(),
            attributes: vec![
                AttributeDef::new("Titolo").with_role("feed:title"),
                AttributeDef::new("Abstract").with_role("feed:description"),
                AttributeDef::new("Sottotitolo").with_role("feed:title"),
            ],
        };

        let names: Vec<&str> = {
            let role = String::from("feed:title");
            ty.attributes_with_role(&role).map(|a| a.name.as_str()).collect()
        };
        assert_eq!(names, ["Titolo", "Sottotitolo"]);
        assert_eq!(ty.attributes_with_role("none").count(), 0);
    }
}

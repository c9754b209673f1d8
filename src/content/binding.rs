//! Content type binding: which types can back a feed, and which attribute
//! supplies each entry's title.
//!
//! A content type is feed-capable only when exactly one of its attributes
//! carries the feed-title role. Types without the role (or with it on several
//! attributes) are never offered for new channels.

use super::{ContentRegistry, ContentType};
use crate::error::{BindingIssue, Error, Result};
use std::{collections::BTreeMap, sync::Arc};

/// Resolves role bindings against an injected registry.
#[derive(Clone)]
pub struct BindingResolver {
    registry: Arc<dyn ContentRegistry>,
    title_role: String,
    description_role: String,
}

impl BindingResolver {
    pub fn new(
        registry: Arc<dyn ContentRegistry>,
        title_role: impl Into<String>,
        description_role: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            title_role: title_role.into(),
            description_role: description_role.into(),
        }
    }

    pub fn registry(&self) -> &Arc<dyn ContentRegistry> {
        &self.registry
    }

    pub fn title_role(&self) -> &str {
        &self.title_role
    }

    /// Feed-capable content types: code → description.
    pub fn available_content_types(&self) -> BTreeMap<String, String> {
        self.registry
            .content_types()
            .into_iter()
            .filter(|ty| self.title_attribute_of(ty).is_ok())
            .map(|ty| (ty.code, ty.description))
            .collect()
    }

    /// Name of the attribute carrying the feed-title role.
    pub fn feed_title_attribute(&self, code: &str) -> Result<String> {
        let ty = self
            .registry
            .content_type(code)
            .ok_or_else(|| Error::binding(code, BindingIssue::UnknownType))?;
        self.title_attribute_of(&ty)
            .map(str::to_string)
            .map_err(|issue| Error::binding(code, issue))
    }

    /// First attribute carrying the feed-description role, if any.
    pub fn feed_description_attribute(&self, code: &str) -> Option<String> {
        self.registry.content_type(code).and_then(|ty| {
            ty.attributes_with_role(&self.description_role)
                .next()
                .map(|a| a.name.clone())
        })
    }

    fn title_attribute_of<'a>(&self, ty: &'a ContentType) -> Result<&'a str, BindingIssue> {
        let mut candidates = ty.attributes_with_role(&self.title_role);
        match (candidates.next(), candidates.next()) {
            (Some(attr), None) => Ok(attr.name.as_str()),
            (None, _) => Err(BindingIssue::MissingTitle {
                role: self.title_role.clone(),
            }),
            (Some(_), Some(_)) => Err(BindingIssue::AmbiguousTitle {
                role: self.title_role.clone(),
                attributes: ty
                    .attributes_with_role(&self.title_role)
                    .map(|a| a.name.clone())
                    .collect(),
            }),
        }
    }
}

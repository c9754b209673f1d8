//! Field-level validation errors.

use super::Channel;
use std::{collections::BTreeMap, fmt};

/// Field keys reported by validation.
///
/// These are part of the admin contract and must stay stable.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const FEED_TYPE: &str = "feedType";
    pub const CONTENT_TYPE: &str = "contentType";
    pub const FILTERS: &str = "filters";
}

/// Collected field violations, one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Field keys in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert to Result (returns Err if there are errors).
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid channel: ")?;
        for (i, (field, message)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "[{field}] {message}")?;
        }
        Ok(())
    }
}

/// Check the fields every stored channel needs, independently of the registry.
pub(crate) fn check_required(channel: &Channel, errors: &mut FieldErrors) {
    if channel.title.trim().is_empty() {
        errors.add(fields::TITLE, "title is required");
    }
    if channel.description.trim().is_empty() {
        errors.add(fields::DESCRIPTION, "description is required");
    }
    if channel.content_type.trim().is_empty() {
        errors.add(fields::CONTENT_TYPE, "content type is required");
    }
    if channel.feed_type.trim().is_empty() {
        errors.add(fields::FEED_TYPE, "feed type is required");
    }
}

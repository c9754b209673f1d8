//! Dotted paths into `syndic.toml`, used to point diagnostics at a key.

use owo_colors::{OwoColorize, Stream};
use std::fmt;

/// `section.key`, e.g. `feed.item_link`.
///
/// Sections list their keys in a `FIELDS` constant so messages never carry
/// hand-typed paths:
///
/// ```ignore
/// diag.error(FeedConfig::FIELDS.item_link, "must contain `{id}`");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Table name (`feed` for `feed.item_link`); empty for top-level keys.
    pub fn section(self) -> &'static str {
        self.0.split_once('.').map_or("", |(section, _)| section)
    }

    /// Key inside the table (`item_link` for `feed.item_link`).
    pub fn key(self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(_, key)| key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0.if_supports_color(Stream::Stderr, |p| p.bright_blue()))
    }
}

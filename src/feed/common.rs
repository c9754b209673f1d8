//! Format-independent feed input shared by every writer.

use crate::{content::ContentItem, utils::date::DateTimeUtc};
use std::borrow::Cow;

/// Everything a writer needs, already filtered and ordered.
#[derive(Debug, Clone, Default)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    /// Site URL (`<link>` of the channel).
    pub link: String,
    /// Public URL of this feed (Atom id, RDF `rdf:about`).
    pub self_link: String,
    pub language: String,
    pub generator: String,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    /// Most recent entry date, if any entry is dated.
    pub fn updated(&self) -> Option<DateTimeUtc> {
        self.entries.iter().filter_map(|e| e.updated).max()
    }
}

/// A single feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: String,
    /// Empty when the item lacks a title value.
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub updated: Option<DateTimeUtc>,
}

/// Attribute names bound to entry fields for one content type.
#[derive(Debug, Clone)]
pub struct EntryBinding {
    pub title: String,
    pub description: Option<String>,
}

impl FeedEntry {
    /// Build an entry from a content item. Never fails: missing values
    /// become an empty title, no description, or no date.
    pub fn from_item(item: &ContentItem, binding: &EntryBinding, link: String) -> Self {
        Self {
            id: xml_text(&item.id).into_owned(),
            title: xml_text(item.attribute(&binding.title).unwrap_or_default()).into_owned(),
            link: xml_text(&link).into_owned(),
            description: binding
                .description
                .as_deref()
                .and_then(|attr| item.attribute(attr))
                .map(xml_text)
                .filter(|d| !d.trim().is_empty())
                .map(Cow::into_owned),
            updated: item.last_modified.as_deref().and_then(DateTimeUtc::parse),
        }
    }
}

/// Drop characters XML 1.0 cannot carry, even escaped: C0 controls other
/// than tab, newline and carriage return, and U+FFFE / U+FFFF.
pub fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

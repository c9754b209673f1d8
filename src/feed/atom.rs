//! Atom 1.0 feed generation.
//!
//! Atom requires `updated` on the feed and on every entry: the feed uses its
//! most recent entry date, undated entries fall back to the feed's.

use super::{FeedDocument, FeedEntry, FeedWriter};
use crate::{
    error::Result,
    utils::{date::DateTimeUtc, mime},
};
use atom_syndication::{
    CategoryBuilder, Entry, EntryBuilder, FeedBuilder, FixedDateTime, GeneratorBuilder, Link,
    LinkBuilder, Text,
};

const EPOCH: &str = "1970-01-01T00:00:00Z";

pub struct AtomWriter;

impl FeedWriter for AtomWriter {
    fn content_type(&self) -> &'static str {
        mime::types::ATOM
    }

    fn write(&self, feed: &FeedDocument) -> Result<String> {
        let updated = to_fixed(feed.updated());

        let entries: Vec<Entry> = feed
            .entries
            .iter()
            .map(|entry| entry_to_atom(entry, updated))
            .collect();

        let self_link: Link = LinkBuilder::default()
            .href(feed.self_link.clone())
            .rel("self".to_string())
            .mime_type(Some("application/atom+xml".to_string()))
            .build();

        let alternate_link: Link = LinkBuilder::default()
            .href(feed.link.clone())
            .rel("alternate".to_string())
            .build();

        let categories = feed
            .category
            .iter()
            .map(|term| CategoryBuilder::default().term(term.clone()).build())
            .collect::<Vec<_>>();

        let atom = FeedBuilder::default()
            .title(Text::plain(feed.title.clone()))
            .id(feed.self_link.clone())
            .updated(updated)
            .links(vec![self_link, alternate_link])
            .subtitle(Some(Text::plain(feed.description.clone())))
            .categories(categories)
            .generator(Some(
                GeneratorBuilder::default()
                    .value(feed.generator.clone())
                    .build(),
            ))
            .lang(Some(feed.language.clone()))
            .entries(entries)
            .build();

        Ok(atom.to_string())
    }
}

fn to_fixed(date: Option<DateTimeUtc>) -> FixedDateTime {
    date.map_or_else(|| EPOCH.to_string(), DateTimeUtc::to_rfc3339)
        .parse()
        .unwrap_or_default()
}

fn entry_to_atom(entry: &FeedEntry, feed_updated: FixedDateTime) -> Entry {
    let updated = entry.updated.map_or(feed_updated, |d| to_fixed(Some(d)));

    let link: Link = LinkBuilder::default()
        .href(entry.link.clone())
        .rel("alternate".to_string())
        .build();

    EntryBuilder::default()
        .title(Text::plain(entry.title.clone()))
        .id(entry.link.clone())
        .updated(updated)
        .links(vec![link])
        .summary(entry.description.clone().map(Text::plain))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixtures;

    #[test]
    fn test_entry_to_atom() {
        let doc = fixtures::document();
        let entry = entry_to_atom(&doc.entries[0], to_fixed(None));
        assert_eq!(entry.title().as_str(), "Rust & Feeds");
        assert_eq!(entry.id(), "https://example.com/content/ART1");
        assert!(entry.updated().to_rfc3339().starts_with("2024-06-15T14:30:45"));
        assert_eq!(entry.summary().map(|s| s.as_str()), Some("First <b>post</b>"));
    }

    #[test]
    fn test_undated_entry_uses_feed_updated() {
        let doc = fixtures::document();
        let feed_updated = to_fixed(doc.updated());
        let entry = entry_to_atom(&doc.entries[1], feed_updated);
        assert_eq!(*entry.updated(), feed_updated);
        assert!(entry.summary().is_none());
    }

    #[test]
    fn test_empty_feed_updated_is_epoch() {
        assert!(to_fixed(None).to_rfc3339().starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_write_feed() {
        let xml = AtomWriter.write(&fixtures::document()).unwrap();
        assert!(xml.contains("http://www.w3.org/2005/Atom"));
        assert!(xml.contains("<id>https://example.com/feed/1</id>"));
        assert!(xml.contains(r#"<category term="cat1"/>"#));
        assert_eq!(xml.matches("<entry>").count(), 2);
    }
}

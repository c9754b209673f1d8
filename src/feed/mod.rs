//! Feed rendering (RSS 0.9x, RSS 1.0, RSS 2.0, Atom 1.0).
//!
//! Every dialect implements [`FeedWriter`] over the same [`FeedDocument`]
//! input; [`FeedType`] selects the writer:
//!
//! | Token      | Writer                                  | Content type          |
//! |------------|-----------------------------------------|-----------------------|
//! | `rss_0.90` | RDF (Netscape 0.9 namespace)            | `application/rdf+xml` |
//! | `rss_0.91` | `<rss version="0.91">`                  | `application/rss+xml` |
//! | `rss_0.92` | `<rss version="0.92">`, + `category`    | `application/rss+xml` |
//! | `rss_0.93` | `<rss version="0.93">`, item `pubDate`  | `application/rss+xml` |
//! | `rss_0.94` | `<rss version="0.94">`, + `generator`   | `application/rss+xml` |
//! | `rss_1.0`  | RDF (purl.org RSS 1.0 + Dublin Core)    | `application/rdf+xml` |
//! | `rss_2.0`  | `rss` crate, validated                  | `application/rss+xml` |
//! | `atom_1.0` | `atom_syndication` crate                | `application/atom+xml`|
//!
//! Tokens are persisted with channels and must stay stable.

pub mod atom;
mod common;
mod legacy;
mod rdf;
pub mod rss;
mod xml;

pub use common::{EntryBinding, FeedDocument, FeedEntry, xml_text};

use crate::{
    error::{Error, Result},
    utils::minify_xml,
};
use std::{fmt, str::FromStr};

/// A serialization strategy for one feed dialect.
pub trait FeedWriter: Sync {
    /// HTTP content type of the output.
    fn content_type(&self) -> &'static str;

    /// Serialize a document. Must not drop or fail on individual entries.
    fn write(&self, feed: &FeedDocument) -> Result<String>;
}

/// The recognized feed dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedType {
    Rss090,
    Rss091,
    Rss092,
    Rss093,
    Rss094,
    Rss10,
    Rss20,
    Atom10,
}

static RSS_090: rdf::RdfWriter = rdf::RdfWriter::V090;
static RSS_091: legacy::LegacyRssWriter = legacy::LegacyRssWriter::new("0.91");
static RSS_092: legacy::LegacyRssWriter = legacy::LegacyRssWriter::new("0.92");
static RSS_093: legacy::LegacyRssWriter = legacy::LegacyRssWriter::new("0.93");
static RSS_094: legacy::LegacyRssWriter = legacy::LegacyRssWriter::new("0.94");
static RSS_10: rdf::RdfWriter = rdf::RdfWriter::V10;

impl FeedType {
    pub const ALL: [Self; 8] = [
        Self::Rss090,
        Self::Rss091,
        Self::Rss092,
        Self::Rss093,
        Self::Rss094,
        Self::Rss10,
        Self::Rss20,
        Self::Atom10,
    ];

    /// Persisted token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Rss090 => "rss_0.90",
            Self::Rss091 => "rss_0.91",
            Self::Rss092 => "rss_0.92",
            Self::Rss093 => "rss_0.93",
            Self::Rss094 => "rss_0.94",
            Self::Rss10 => "rss_1.0",
            Self::Rss20 => "rss_2.0",
            Self::Atom10 => "atom_1.0",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rss090 => "RSS 0.90",
            Self::Rss091 => "RSS 0.91",
            Self::Rss092 => "RSS 0.92",
            Self::Rss093 => "RSS 0.93",
            Self::Rss094 => "RSS 0.94",
            Self::Rss10 => "RSS 1.0",
            Self::Rss20 => "RSS 2.0",
            Self::Atom10 => "Atom 1.0",
        }
    }

    /// Parse a persisted token; unknown tokens are `UnsupportedFormat`.
    pub fn parse(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.token() == token)
            .ok_or_else(|| Error::UnsupportedFormat(token.to_string()))
    }

    pub fn writer(self) -> &'static dyn FeedWriter {
        match self {
            Self::Rss090 => &RSS_090,
            Self::Rss091 => &RSS_091,
            Self::Rss092 => &RSS_092,
            Self::Rss093 => &RSS_093,
            Self::Rss094 => &RSS_094,
            Self::Rss10 => &RSS_10,
            Self::Rss20 => &rss::Rss2Writer,
            Self::Atom10 => &atom::AtomWriter,
        }
    }

    #[inline]
    pub fn content_type(self) -> &'static str {
        self.writer().content_type()
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FeedType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Serialize `feed` in the given dialect.
pub fn render(feed_type: FeedType, feed: &FeedDocument, minify: bool) -> Result<Vec<u8>> {
    let xml = feed_type.writer().write(feed)?;
    Ok(minify_xml(xml.as_bytes(), minify).into_owned())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_stable_and_unique() {
        let tokens: Vec<_> = FeedType::ALL.iter().map(|t| t.token()).collect();
        assert_eq!(
            tokens,
            [
                "rss_0.90", "rss_0.91", "rss_0.92", "rss_0.93", "rss_0.94", "rss_1.0", "rss_2.0",
                "atom_1.0"
            ]
        );
        for feed_type in FeedType::ALL {
            assert_eq!(FeedType::parse(feed_type.token()).unwrap(), feed_type);
        }
    }

    #[test]
    fn test_unknown_token_is_unsupported() {
        for token in ["rss_3.0", "RSS_2.0", "", "atom"] {
            let err = FeedType::parse(token).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFormat(ref t) if t == token));
        }
    }

    #[test]
    fn test_every_format_renders() {
        let doc = fixtures::document();
        for feed_type in FeedType::ALL {
            let bytes = render(feed_type, &doc, false)
                .unwrap_or_else(|e| panic!("{feed_type} failed: {e}"));
            let xml = String::from_utf8(bytes).unwrap();
            assert!(xml.starts_with("<?xml"), "{feed_type}: {xml}");
            assert!(xml.contains("test rss title"), "{feed_type}");
            assert!(xml.contains("Rust &amp; Feeds"), "{feed_type}");
            assert!(xml.contains("https://example.com/content/ART2"), "{feed_type}");
        }
    }

    #[test]
    fn test_content_types() {
        assert_eq!(FeedType::Rss20.content_type(), crate::utils::mime::types::RSS);
        assert_eq!(FeedType::Rss092.content_type(), crate::utils::mime::types::RSS);
        assert_eq!(FeedType::Rss10.content_type(), crate::utils::mime::types::RDF);
        assert_eq!(FeedType::Rss090.content_type(), crate::utils::mime::types::RDF);
        assert_eq!(FeedType::Atom10.content_type(), crate::utils::mime::types::ATOM);
    }

    #[test]
    fn test_render_minified() {
        let bytes = render(FeedType::Rss091, &fixtures::document(), true).unwrap();
        assert!(!bytes.contains(&b'\n'));
    }
}

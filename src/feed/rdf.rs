//! RDF-based dialects: RSS 0.90 and RSS 1.0.
//!
//! RSS 1.0 channels list their items in an `rdf:Seq` and describe each one
//! with `rdf:about`. Dublin Core carries what the core vocabulary lacks
//! (language, subject, dates).

use super::{FeedDocument, FeedWriter, xml::XmlOut};
use crate::{
    error::Result,
    utils::{date::DateTimeUtc, mime},
};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RSS_090_NS: &str = "http://my.netscape.com/rdf/simple/0.9/";
const RSS_10_NS: &str = "http://purl.org/rss/1.0/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

pub enum RdfWriter {
    V090,
    V10,
}

impl RdfWriter {
    /// RSS 0.90: channel title, link and description; items carry title and link.
    fn write_090(feed: &FeedDocument) -> Result<String> {
        let mut out = XmlOut::new()?;
        out.start("rdf:RDF", &[("xmlns:rdf", RDF_NS), ("xmlns", RSS_090_NS)])?;

        out.start("channel", &[])?;
        out.text_element("title", &feed.title)?;
        out.text_element("link", &feed.link)?;
        out.text_element("description", &feed.description)?;
        out.end("channel")?;

        for entry in &feed.entries {
            out.start("item", &[])?;
            out.text_element("title", &entry.title)?;
            out.text_element("link", &entry.link)?;
            out.end("item")?;
        }

        out.end("rdf:RDF")?;
        out.finish()
    }

    fn write_10(feed: &FeedDocument) -> Result<String> {
        let mut out = XmlOut::new()?;
        out.start(
            "rdf:RDF",
            &[
                ("xmlns:rdf", RDF_NS),
                ("xmlns", RSS_10_NS),
                ("xmlns:dc", DC_NS),
            ],
        )?;

        out.start("channel", &[("rdf:about", feed.self_link.as_str())])?;
        out.text_element("title", &feed.title)?;
        out.text_element("link", &feed.link)?;
        out.text_element("description", &feed.description)?;
        out.opt_element("dc:subject", feed.category.as_deref())?;
        out.text_element("dc:language", &feed.language)?;
        let updated = feed.updated().map(DateTimeUtc::to_rfc3339);
        out.opt_element("dc:date", updated.as_deref())?;

        out.start("items", &[])?;
        out.start("rdf:Seq", &[])?;
        for entry in &feed.entries {
            out.empty("rdf:li", &[("rdf:resource", entry.link.as_str())])?;
        }
        out.end("rdf:Seq")?;
        out.end("items")?;
        out.end("channel")?;

        for entry in &feed.entries {
            out.start("item", &[("rdf:about", entry.link.as_str())])?;
            out.text_element("title", &entry.title)?;
            out.text_element("link", &entry.link)?;
            out.opt_element("description", entry.description.as_deref())?;
            let date = entry.updated.map(DateTimeUtc::to_rfc3339);
            out.opt_element("dc:date", date.as_deref())?;
            out.end("item")?;
        }

        out.end("rdf:RDF")?;
        out.finish()
    }
}

impl FeedWriter for RdfWriter {
    fn content_type(&self) -> &'static str {
        mime::types::RDF
    }

    fn write(&self, feed: &FeedDocument) -> Result<String> {
        match self {
            Self::V090 => Self::write_090(feed),
            Self::V10 => Self::write_10(feed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixtures;

    #[test]
    fn test_rss_090_layout() {
        let xml = RdfWriter::V090.write(&fixtures::document()).unwrap();
        assert!(xml.contains(RSS_090_NS));
        assert!(xml.contains("<title>test rss title</title>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        // 0.90 items have no description
        assert!(!xml.contains("First &lt;b&gt;"));
    }

    #[test]
    fn test_rss_10_layout() {
        let xml = RdfWriter::V10.write(&fixtures::document()).unwrap();
        assert!(xml.contains(RSS_10_NS));
        assert!(xml.contains(r#"<channel rdf:about="https://example.com/feed/1">"#));
        assert!(xml.contains(r#"<rdf:li rdf:resource="https://example.com/content/ART1"/>"#));
        assert!(xml.contains(r#"<item rdf:about="https://example.com/content/ART2">"#));
        assert!(xml.contains("<dc:subject>cat1</dc:subject>"));
        assert!(xml.contains("<dc:date>2024-06-15T14:30:45Z</dc:date>"));
        assert_eq!(xml.matches("<rdf:li ").count(), 2);
    }

    #[test]
    fn test_rss_10_empty_feed() {
        let mut doc = fixtures::document();
        doc.entries.clear();
        let xml = RdfWriter::V10.write(&doc).unwrap();
        assert!(!xml.contains("<item rdf:about"));
        assert!(!xml.contains("<dc:date>"));
        assert!(xml.contains("<rdf:Seq>"));
    }
}

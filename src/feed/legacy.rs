//! Hand-written RSS 0.91 to 0.94 writers.
//!
//! These dialects share the `<rss><channel>` layout of RSS 2.0 but predate
//! most of its elements:
//!
//! - 0.91: channel `language`, `lastBuildDate`; item title, link, description
//! - 0.92: adds channel `category`
//! - 0.93: adds item `pubDate`
//! - 0.94: adds channel `generator`

use super::{FeedDocument, FeedEntry, FeedWriter, xml::XmlOut};
use crate::{
    error::Result,
    utils::{date::DateTimeUtc, mime},
};

pub struct LegacyRssWriter {
    version: &'static str,
}

impl LegacyRssWriter {
    pub const fn new(version: &'static str) -> Self {
        Self { version }
    }

    fn has_pub_date(&self) -> bool {
        matches!(self.version, "0.93" | "0.94")
    }

    fn has_category(&self) -> bool {
        self.version != "0.91"
    }

    fn has_generator(&self) -> bool {
        self.version == "0.94"
    }

    fn write_item(&self, out: &mut XmlOut, entry: &FeedEntry) -> Result<()> {
        out.start("item", &[])?;
        out.text_element("title", &entry.title)?;
        out.text_element("link", &entry.link)?;
        out.opt_element("description", entry.description.as_deref())?;
        if self.has_pub_date() {
            let pub_date = entry.updated.map(DateTimeUtc::to_rfc2822);
            out.opt_element("pubDate", pub_date.as_deref())?;
        }
        out.end("item")
    }
}

impl FeedWriter for LegacyRssWriter {
    fn content_type(&self) -> &'static str {
        mime::types::RSS
    }

    fn write(&self, feed: &FeedDocument) -> Result<String> {
        let mut out = XmlOut::new()?;
        out.start("rss", &[("version", self.version)])?;
        out.start("channel", &[])?;

        out.text_element("title", &feed.title)?;
        out.text_element("link", &feed.link)?;
        out.text_element("description", &feed.description)?;
        out.text_element("language", &feed.language)?;
        if self.has_category() {
            out.opt_element("category", feed.category.as_deref())?;
        }
        if self.has_generator() {
            out.text_element("generator", &feed.generator)?;
        }
        let last_build = feed.updated().map(DateTimeUtc::to_rfc2822);
        out.opt_element("lastBuildDate", last_build.as_deref())?;

        for entry in &feed.entries {
            self.write_item(&mut out, entry)?;
        }

        out.end("channel")?;
        out.end("rss")?;
        out.finish()
    }
}

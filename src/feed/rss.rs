//! RSS 2.0 feed generation.
//!
//! Built with the `rss` crate and validated before serialization.

use super::{FeedDocument, FeedEntry, FeedWriter};
use crate::{
    error::{Error, Result},
    utils::{date::DateTimeUtc, mime},
};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

pub struct Rss2Writer;

impl FeedWriter for Rss2Writer {
    fn content_type(&self) -> &'static str {
        mime::types::RSS
    }

    fn write(&self, feed: &FeedDocument) -> Result<String> {
        let items: Vec<_> = feed.entries.iter().map(entry_to_rss_item).collect();

        let categories = feed
            .category
            .iter()
            .map(|name| CategoryBuilder::default().name(name.clone()).build())
            .collect::<Vec<_>>();

        let channel = ChannelBuilder::default()
            .title(&feed.title)
            .link(&feed.link)
            .description(&feed.description)
            .language(Some(feed.language.clone()))
            .generator(Some(feed.generator.clone()))
            .last_build_date(feed.updated().map(DateTimeUtc::to_rfc2822))
            .categories(categories)
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| Error::serialize(format!("RSS validation failed: {e}")))?;
        Ok(channel.to_string())
    }
}

fn entry_to_rss_item(entry: &FeedEntry) -> rss::Item {
    ItemBuilder::default()
        .title(Some(entry.title.clone()))
        .link(Some(entry.link.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.link.clone())
                .build(),
        ))
        .description(entry.description.clone())
        .pub_date(entry.updated.map(DateTimeUtc::to_rfc2822))
        .build()
}

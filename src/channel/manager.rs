//! Channel lifecycle and the feed render pipeline.
//!
//! The manager is the only entry point for admin actions and public feed
//! requests. It validates drafts against the content registry before they
//! reach the store, and turns a stored channel into feed bytes:
//!
//! ```text
//! lookup → feed type → binding → published items → filter → order → truncate → write
//! ```

use super::{Channel, ChannelId, ChannelStatus, ChannelStore, FieldErrors, fields};
use crate::{
    content::BindingResolver,
    debug,
    error::{Error, Result},
    feed::{self, EntryBinding, FeedDocument, FeedEntry, FeedType, xml_text},
    filter::{self, Filter},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::{cmp::Ordering, collections::BTreeMap};

/// Bytes left as-is in a substituted link segment (RFC 3986 unreserved).
const LINK_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Settings that shape rendered feeds.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Site URL without trailing slash.
    pub base_url: String,
    pub language: String,
    pub generator: String,
    /// URL path under which feeds are served (`/feed`).
    pub path_prefix: String,
    /// Entry link template with `{base_url}`, `{id}` and `{type}` placeholders.
    pub item_link: String,
    /// 0 = unlimited.
    pub max_items: usize,
    pub minify: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5280".into(),
            language: "en".into(),
            generator: "syndic".into(),
            path_prefix: "/feed".into(),
            item_link: "{base_url}/content/{id}".into(),
            max_items: 50,
            minify: false,
        }
    }
}

/// A serialized feed ready to be served.
#[derive(Debug, Clone)]
pub struct RenderedFeed {
    pub feed_type: FeedType,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub struct ChannelManager {
    store: ChannelStore,
    binding: BindingResolver,
    settings: FeedSettings,
}

impl ChannelManager {
    pub fn new(store: ChannelStore, binding: BindingResolver, settings: FeedSettings) -> Self {
        Self {
            store,
            binding,
            settings,
        }
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    // =========================================================================
    // Admin actions
    // =========================================================================

    /// Validate and persist a new channel. Any id on the draft is ignored.
    pub fn create_channel(&self, draft: Channel) -> Result<ChannelId> {
        let mut errors = FieldErrors::new();
        super::validate::check_required(&draft, &mut errors);
        self.check_feed_type(&draft, &mut errors);
        if !draft.content_type.trim().is_empty() {
            self.check_content_type(&draft.content_type, &mut errors);
        }
        self.check_filters(&draft.content_type, &draft.filters, &mut errors);
        errors.into_result()?;

        let id = self.store.add_channel(draft)?;
        debug!("channel"; "created channel {id}");
        Ok(id)
    }

    /// Validate and replace an existing channel. The content type is fixed
    /// at creation.
    pub fn update_channel(&self, channel: Channel) -> Result<()> {
        self.store.modify(channel.id, |current| {
            let mut errors = FieldErrors::new();
            super::validate::check_required(&channel, &mut errors);
            self.check_feed_type(&channel, &mut errors);
            if channel.content_type != current.content_type {
                errors.add(
                    fields::CONTENT_TYPE,
                    format!(
                        "content type cannot change (channel is bound to `{}`)",
                        current.content_type
                    ),
                );
            }
            self.check_filters(&current.content_type, &channel.filters, &mut errors);
            errors.into_result()?;

            *current = channel;
            Ok(())
        })
    }

    pub fn delete_channel(&self, id: ChannelId) -> Result<Channel> {
        self.store.delete_channel(id)
    }

    pub fn get_channel(&self, id: ChannelId) -> Result<Channel> {
        self.store.get_channel(id)
    }

    pub fn get_channels(&self, status: ChannelStatus) -> Vec<Channel> {
        self.store.get_channels(status)
    }

    pub fn set_active(&self, id: ChannelId, active: bool) -> Result<Channel> {
        self.store.modify(id, |channel| {
            channel.active = active;
            Ok(channel.clone())
        })
    }

    /// Content types that can back a new channel: code → description.
    pub fn available_content_types(&self) -> BTreeMap<String, String> {
        self.binding.available_content_types()
    }

    /// Feed types offered once a content type is picked.
    pub fn select_content_type(&self, code: &str) -> Result<Vec<FeedType>> {
        let mut errors = FieldErrors::new();
        if code.trim().is_empty() {
            errors.add(fields::CONTENT_TYPE, "content type is required");
        } else {
            self.check_content_type(code, &mut errors);
        }
        errors.into_result()?;
        Ok(FeedType::ALL.to_vec())
    }

    /// Append a filter after checking its attribute exists on the channel's
    /// content type.
    pub fn add_filter(&self, id: ChannelId, filter: Filter) -> Result<Channel> {
        self.store.modify(id, |channel| {
            let mut errors = FieldErrors::new();
            self.check_filters(
                &channel.content_type,
                std::slice::from_ref(&filter),
                &mut errors,
            );
            errors.into_result()?;

            channel.filters.push(filter);
            Ok(channel.clone())
        })
    }

    /// Remove the filter at `index`, returning it.
    pub fn remove_filter(&self, id: ChannelId, index: usize) -> Result<Filter> {
        self.store.modify(id, |channel| {
            if index >= channel.filters.len() {
                return Err(Error::Validation(FieldErrors::single(
                    fields::FILTERS,
                    format!(
                        "no filter at index {index} (channel has {})",
                        channel.filters.len()
                    ),
                )));
            }
            Ok(channel.filters.remove(index))
        })
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Public URL of a channel's feed.
    pub fn channel_link(&self, id: ChannelId) -> String {
        format!(
            "{}{}/{id}",
            self.settings.base_url, self.settings.path_prefix
        )
    }

    /// Render a channel's feed. Inactive channels render too.
    pub fn render_feed(&self, id: ChannelId) -> Result<RenderedFeed> {
        let channel = self.store.get_channel(id)?;
        let feed_type = FeedType::parse(&channel.feed_type)?;
        let document = self.build_document(&channel)?;
        let body = feed::render(feed_type, &document, self.settings.minify)?;

        debug!(
            "channel";
            "rendered channel {id} as {feed_type} ({} entries, {} bytes)",
            document.entries.len(),
            body.len()
        );
        Ok(RenderedFeed {
            feed_type,
            content_type: feed_type.content_type(),
            body,
        })
    }

    fn build_document(&self, channel: &Channel) -> Result<FeedDocument> {
        let binding = EntryBinding {
            title: self.binding.feed_title_attribute(&channel.content_type)?,
            description: self.binding.feed_description_attribute(&channel.content_type),
        };

        let mut items: Vec<_> = self
            .binding
            .registry()
            .published_items(&channel.content_type)
            .into_iter()
            .filter(|item| filter::matches(&channel.filters, item))
            .map(|item| {
                let link = self.item_link(&item.id, &item.content_type);
                FeedEntry::from_item(&item, &binding, link)
            })
            .collect();

        items.sort_by(newest_first);
        if self.settings.max_items > 0 {
            items.truncate(self.settings.max_items);
        }

        Ok(FeedDocument {
            title: xml_text(&channel.title).into_owned(),
            description: xml_text(&channel.description).into_owned(),
            category: channel.category.as_deref().map(|c| xml_text(c).into_owned()),
            link: self.settings.base_url.clone(),
            self_link: self.channel_link(channel.id),
            language: self.settings.language.clone(),
            generator: self.settings.generator.clone(),
            entries: items,
        })
    }

    /// `{type}` and `{id}` are percent-encoded so an id cannot turn into a
    /// query or fragment.
    fn item_link(&self, id: &str, content_type: &str) -> String {
        let segment = |value: &str| utf8_percent_encode(value, LINK_SEGMENT).to_string();
        self.settings
            .item_link
            .replace("{base_url}", &self.settings.base_url)
            .replace("{type}", &segment(content_type))
            .replace("{id}", &segment(id))
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn check_feed_type(&self, channel: &Channel, errors: &mut FieldErrors) {
        if !channel.feed_type.trim().is_empty() && FeedType::parse(&channel.feed_type).is_err() {
            errors.add(
                fields::FEED_TYPE,
                format!("unsupported feed type `{}`", channel.feed_type),
            );
        }
    }

    fn check_content_type(&self, code: &str, errors: &mut FieldErrors) {
        if let Err(err) = self.binding.feed_title_attribute(code) {
            errors.add(fields::CONTENT_TYPE, err.to_string());
        }
    }

    fn check_filters(&self, code: &str, filters: &[Filter], errors: &mut FieldErrors) {
        if filters.is_empty() {
            return;
        }
        let Some(ty) = self.binding.registry().content_type(code) else {
            // reported through contentType
            return;
        };
        if let Some(filter) = filters.iter().find(|f| ty.attribute(&f.attribute).is_none()) {
            errors.add(
                fields::FILTERS,
                format!(
                    "content type `{code}` has no attribute `{}`",
                    filter.attribute
                ),
            );
        }
    }
}

/// Dated entries first, newest first; ties and undated entries by id.
fn newest_first(a: &FeedEntry, b: &FeedEntry) -> Ordering {
    let by_date = match (a.updated, b.updated) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.id.cmp(&b.id))
}

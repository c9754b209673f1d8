//! Channel administration commands.
//!
//! Command output (ids, tables, JSON, feeds) goes to stdout; progress and
//! diagnostics go through the logger on stderr.

use super::args::{ChannelArgs, FilterAction};
use crate::{
    channel::{Channel, ChannelId, ChannelManager, ChannelStatus},
    error::Error,
    feed::FeedType,
    filter::Filter,
    log,
};
use anyhow::{Context, Result, anyhow};
use owo_colors::{OwoColorize, Stream};
use std::{fmt::Write as _, fs, io::Write, path::Path};

// ============================================================================
// content types
// ============================================================================

/// `syndic types`
pub fn list_types(manager: &ChannelManager) -> Result<()> {
    let types = manager.available_content_types();
    if types.is_empty() {
        log!("channel"; "no content type can back a feed");
        return Ok(());
    }
    let width = types.keys().map(String::len).max().unwrap_or_default();
    for (code, description) in &types {
        println!("{code:<width$}  {description}");
    }
    Ok(())
}

/// `syndic feed-types <CODE>`
pub fn list_feed_types(manager: &ChannelManager, content_type: &str) -> Result<()> {
    let feed_types = manager.select_content_type(content_type).map_err(report)?;
    for feed_type in feed_types {
        println!("{:<9}  {}", feed_type.token(), feed_type.label());
    }
    Ok(())
}

// ============================================================================
// channel lifecycle
// ============================================================================

/// `syndic add`
pub fn add(
    manager: &ChannelManager,
    args: &ChannelArgs,
    content_type: &str,
    feed_type: &str,
    filters: &[Filter],
) -> Result<()> {
    let draft = new_channel(args, content_type, feed_type, filters);
    let id = manager.create_channel(draft).map_err(report)?;
    log!("channel"; "created channel {id}: {}", manager.channel_link(id));
    println!("{id}");
    Ok(())
}

/// `syndic update`
pub fn update(
    manager: &ChannelManager,
    id: ChannelId,
    args: &ChannelArgs,
    feed_type: Option<&str>,
    no_category: bool,
) -> Result<()> {
    let mut channel = manager.get_channel(id)?;
    apply_update(&mut channel, args, feed_type, no_category);
    manager.update_channel(channel).map_err(report)?;
    log!("channel"; "updated channel {id}");
    Ok(())
}

/// `syndic filter <ID> add|remove`
pub fn filter(manager: &ChannelManager, id: ChannelId, action: &FilterAction) -> Result<()> {
    match action {
        FilterAction::Add { filter } => {
            let channel = manager.add_filter(id, filter.clone()).map_err(report)?;
            log!(
                "channel";
                "channel {id}: added filter #{} `{filter}`",
                channel.filters.len() - 1
            );
        }
        FilterAction::Remove { index } => {
            let removed = manager.remove_filter(id, *index).map_err(report)?;
            log!("channel"; "channel {id}: removed filter `{removed}`");
        }
    }
    Ok(())
}

/// `syndic list`
pub fn list(manager: &ChannelManager, status: ChannelStatus, json: bool) -> Result<()> {
    let channels = manager.get_channels(status);
    if json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
    } else if channels.is_empty() {
        log!("channel"; "no {} channels", status.as_str().to_ascii_lowercase());
    } else {
        print!("{}", format_table(&channels));
    }
    Ok(())
}

/// `syndic show`
pub fn show(manager: &ChannelManager, id: ChannelId, json: bool) -> Result<()> {
    let channel = manager.get_channel(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&channel)?);
    } else {
        print!("{}", format_channel(&channel, &manager.channel_link(id)));
    }
    Ok(())
}

/// `syndic activate` / `syndic deactivate`
pub fn set_active(manager: &ChannelManager, id: ChannelId, active: bool) -> Result<()> {
    let channel = manager.set_active(id, active)?;
    let state = if channel.active { "active" } else { "inactive" };
    log!("channel"; "channel {id} ({}) is {state}", channel.title);
    Ok(())
}

/// `syndic delete`
pub fn delete(manager: &ChannelManager, id: ChannelId) -> Result<()> {
    let channel = manager.delete_channel(id)?;
    log!("channel"; "deleted channel {id} ({})", channel.title);
    Ok(())
}

/// `syndic render`
pub fn render(manager: &ChannelManager, id: ChannelId, output: Option<&Path>) -> Result<()> {
    let feed = manager.render_feed(id)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &feed.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("channel"; "wrote {} feed to {}", feed.feed_type, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&feed.body)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

// ============================================================================
// helpers
// ============================================================================

fn new_channel(
    args: &ChannelArgs,
    content_type: &str,
    feed_type: &str,
    filters: &[Filter],
) -> Channel {
    Channel {
        title: args.title.clone().unwrap_or_default(),
        description: args.description.clone().unwrap_or_default(),
        category: args.category.clone().filter(|c| !c.trim().is_empty()),
        content_type: content_type.to_string(),
        feed_type: feed_type.to_string(),
        active: args.active.unwrap_or(false),
        filters: filters.to_vec(),
        ..Channel::default()
    }
}

/// Overwrite only the fields given on the command line.
fn apply_update(
    channel: &mut Channel,
    args: &ChannelArgs,
    feed_type: Option<&str>,
    no_category: bool,
) {
    if let Some(title) = &args.title {
        channel.title.clone_from(title);
    }
    if let Some(description) = &args.description {
        channel.description.clone_from(description);
    }
    if no_category {
        channel.category = None;
    } else if let Some(category) = &args.category {
        channel.category = Some(category.clone()).filter(|c| !c.trim().is_empty());
    }
    if let Some(active) = args.active {
        channel.active = active;
    }
    if let Some(feed_type) = feed_type {
        channel.feed_type = feed_type.to_string();
    }
}

/// Print each invalid field on its own line and keep a short summary as the
/// returned error.
fn report(err: Error) -> anyhow::Error {
    match err {
        Error::Validation(errors) => {
            for (field, message) in errors.iter() {
                log!(
                    "error";
                    "{}: {message}",
                    field.if_supports_color(Stream::Stderr, |f| f.bold())
                );
            }
            anyhow!(
                "channel rejected: {} invalid field{}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            )
        }
        other => other.into(),
    }
}

fn format_table(channels: &[Channel]) -> String {
    let title_width = channels
        .iter()
        .map(|c| c.title.chars().count())
        .max()
        .unwrap_or_default()
        .max("TITLE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<6}  {:<8}  {:<10}  {:<title_width$}  FILTERS",
        "ID", "ACTIVE", "TYPE", "FEED", "TITLE"
    );
    for channel in channels {
        let _ = writeln!(
            out,
            "{:>4}  {:<6}  {:<8}  {:<10}  {:<title_width$}  {}",
            channel.id,
            if channel.active { "yes" } else { "no" },
            channel.content_type,
            channel.feed_type,
            channel.title,
            channel.filters.len()
        );
    }
    out
}

fn format_channel(channel: &Channel, link: &str) -> String {
    let feed = FeedType::parse(&channel.feed_type)
        .map_or_else(|_| format!("{} (unsupported)", channel.feed_type), |t| {
            format!("{} ({})", t.token(), t.label())
        });

    let mut out = String::new();
    let _ = writeln!(out, "id:           {}", channel.id);
    let _ = writeln!(out, "title:        {}", channel.title);
    let _ = writeln!(out, "description:  {}", channel.description);
    if let Some(category) = &channel.category {
        let _ = writeln!(out, "category:     {category}");
    }
    let _ = writeln!(out, "content type: {}", channel.content_type);
    let _ = writeln!(out, "feed type:    {feed}");
    let _ = writeln!(out, "active:       {}", channel.active);
    let _ = writeln!(out, "link:         {link}");
    if !channel.filters.is_empty() {
        let _ = writeln!(out, "filters:");
        for (i, filter) in channel.filters.iter().enumerate() {
            let _ = writeln!(out, "  [{i}] {filter}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOp;

    fn args(title: Option<&str>, category: Option<&str>, active: Option<bool>) -> ChannelArgs {
        ChannelArgs {
            title: title.map(Into::into),
            description: None,
            category: category.map(Into::into),
            active,
        }
    }

    fn stored() -> Channel {
        Channel {
            id: 3,
            category: Some("tech".into()),
            filters: vec![Filter::new("Sezione", FilterOp::Equals("tech".into()))],
            ..Channel::new("ART", "rss_2.0", "News", "Latest")
        }
    }

    #[test]
    fn test_new_channel_defaults() {
        let channel = new_channel(&args(Some("News"), Some("  "), None), "ART", "atom_1.0", &[]);
        assert_eq!(channel.title, "News");
        assert_eq!(channel.description, "");
        assert_eq!(channel.category, None);
        assert!(!channel.active);
        assert_eq!(channel.feed_type, "atom_1.0");
    }

    #[test]
    fn test_apply_update_keeps_omitted_fields() {
        let mut channel = stored();
        apply_update(&mut channel, &args(Some("Renamed"), None, Some(true)), None, false);

        assert_eq!(channel.title, "Renamed");
        assert_eq!(channel.description, "Latest");
        assert_eq!(channel.category.as_deref(), Some("tech"));
        assert_eq!(channel.feed_type, "rss_2.0");
        assert!(channel.active);
        assert_eq!(channel.filters.len(), 1);
    }

    #[test]
    fn test_apply_update_clears_category() {
        let mut channel = stored();
        apply_update(&mut channel, &args(None, None, None), Some("rss_0.91"), true);
        assert_eq!(channel.category, None);
        assert_eq!(channel.feed_type, "rss_0.91");
    }

    #[test]
    fn test_report_validation() {
        let mut errors = crate::channel::FieldErrors::new();
        errors.add("title", "title is required");
        errors.add("feedType", "feed type is required");
        let err = report(Error::Validation(errors));
        assert_eq!(err.to_string(), "channel rejected: 2 invalid fields");

        let err = report(Error::NotFound(9));
        assert_eq!(err.to_string(), "channel 9 not found");
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&[stored()]);
        let mut lines = table.lines();
        assert!(lines.next().unwrap().starts_with("  ID  ACTIVE"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("   3  no"));
        assert!(row.contains("rss_2.0"));
        assert!(row.trim_end().ends_with('1'));
    }

    #[test]
    fn test_format_channel() {
        let text = format_channel(&stored(), "https://example.com/feed/3");
        assert!(text.contains("feed type:    rss_2.0 (RSS 2.0)"));
        assert!(text.contains("category:     tech"));
        assert!(text.contains("link:         https://example.com/feed/3"));
        assert!(text.contains("  [0] Sezione=tech"));

        let mut broken = stored();
        broken.feed_type = "rss_3.0".into();
        assert!(format_channel(&broken, "").contains("rss_3.0 (unsupported)"));
    }
}

//! Request URL → feed route.

use crate::channel::ChannelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Feed(ChannelId),
    NotFound,
}

/// Resolve a request URL against the feed path prefix.
///
/// `{prefix}/{id}` (optionally with a trailing slash or a query string)
/// maps to a feed; anything else is not found. An empty prefix serves
/// feeds from the root.
pub fn route(url: &str, prefix: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();

    let Some(rest) = path.strip_prefix(prefix) else {
        return Route::NotFound;
    };
    let Some(rest) = rest.strip_prefix('/') else {
        return Route::NotFound;
    };
    let id = rest.strip_suffix('/').unwrap_or(rest);

    // `u32::from_str` accepts a leading `+`
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Route::NotFound;
    }
    id.parse().map_or(Route::NotFound, Route::Feed)
}

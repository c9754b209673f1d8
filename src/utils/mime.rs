//! MIME types served with rendered feeds.

pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";

    // Web feeds
    pub const RSS: &str = "application/rss+xml; charset=utf-8";
    pub const RDF: &str = "application/rdf+xml; charset=utf-8";
    pub const ATOM: &str = "application/atom+xml; charset=utf-8";
}

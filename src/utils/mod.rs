//! Shared helpers: dates, MIME types, XML post-processing.

pub mod date;
pub mod mime;

use std::borrow::Cow;

const CDATA_OPEN: &[u8] = b"<![CDATA[";
const CDATA_CLOSE: &[u8] = b"]]>";

/// Drop whitespace-only runs between tags when `enabled`.
///
/// Text nodes are kept byte for byte, including CDATA sections (the `rss`
/// crate writes descriptions as CDATA, which may hold markup).
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(content);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut rest = content;
    while let Some(&byte) = rest.first() {
        if rest.starts_with(CDATA_OPEN) {
            let end = find(rest, CDATA_CLOSE).map_or(rest.len(), |at| at + CDATA_CLOSE.len());
            out.extend_from_slice(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        out.push(byte);
        rest = &rest[1..];

        if byte == b'>' {
            let blank = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
            if rest.get(blank).is_none_or(|&next| next == b'<') {
                rest = &rest[blank..];
            }
        }
    }
    Cow::Owned(out)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_between_tags() {
        let xml = b"<?xml version=\"1.0\"?>\n<rss>\n  <channel>Hello</channel>\n</rss>\n";
        assert_eq!(
            &*minify_xml(xml, true),
            b"<?xml version=\"1.0\"?><rss><channel>Hello</channel></rss>"
        );
    }

    #[test]
    fn test_minify_keeps_text() {
        let xml = b"<title>  Rust &amp; Feeds  </title>\n<p>a\n  b</p>";
        assert_eq!(
            &*minify_xml(xml, true),
            b"<title>  Rust &amp; Feeds  </title><p>a\n  b</p>"
        );
    }

    #[test]
    fn test_minify_keeps_cdata() {
        let xml = b"<description><![CDATA[<b>x</b> <i>y</i>]]></description>\n";
        assert_eq!(
            &*minify_xml(xml, true),
            b"<description><![CDATA[<b>x</b> <i>y</i>]]></description>"
        );
    }

    #[test]
    fn test_minify_disabled() {
        let xml = b"<root>\n  <item/>\n</root>";
        assert!(matches!(minify_xml(xml, false), Cow::Borrowed(b) if b == xml));
    }
}

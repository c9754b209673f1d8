//! HTTP responses for feed requests.

use super::route::{Route, route};
use crate::{
    channel::ChannelManager,
    debug,
    error::Error,
    log,
    utils::mime::types::PLAIN,
};
use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// A response, decided before anything is written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Answer to a HEAD request: headers only.
    pub head: bool,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            head: false,
        }
    }

    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: message.as_bytes().to_vec(),
            head: false,
        }
    }

    fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }
}

/// Decide the response for one request.
///
/// Only GET and HEAD are served. Unknown channels are 404; any other
/// render failure (unsupported feed type, broken binding, serializer
/// error) is logged and answered with 500.
pub fn dispatch(manager: &ChannelManager, method: &Method, url: &str) -> Reply {
    let head = match method {
        Method::Get => false,
        Method::Head => true,
        _ => return Reply::text(405, "405 Method Not Allowed"),
    };

    let reply = match route(url, &manager.settings().path_prefix) {
        Route::NotFound => Reply::not_found(),
        Route::Feed(id) => match manager.render_feed(id) {
            Ok(feed) => {
                debug!("serve"; "{url} → {} ({} bytes)", feed.feed_type, feed.body.len());
                Reply::ok(feed.content_type, feed.body)
            }
            Err(Error::NotFound(_)) => Reply::not_found(),
            Err(err) => {
                log!("error"; "channel {id}: {err}");
                Reply::text(500, "500 Internal Server Error")
            }
        },
    };

    Reply { head, ..reply }
}

/// Handle a single HTTP request.
pub fn respond(request: Request, manager: &ChannelManager) -> Result<()> {
    if crate::core::is_shutdown() {
        return send_reply(request, Reply::text(503, "503 Service Unavailable"));
    }
    let reply = dispatch(manager, request.method(), request.url());
    send_reply(request, reply)
}

fn send_reply(request: Request, reply: Reply) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", reply.content_type)?];
    if reply.status == 405 {
        headers.push(make_header("Allow", "GET, HEAD")?);
    }

    let status = StatusCode(reply.status);
    if reply.head {
        let length = reply.body.len();
        let response = Response::new(status, headers, std::io::empty(), Some(length), None);
        request.respond(response)?;
    } else {
        let mut response = Response::from_data(reply.body).with_status_code(status);
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
    }
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}

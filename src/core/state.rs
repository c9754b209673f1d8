//! Ctrl+C handling.
//!
//! Admin commands are short and hold no open resources, so Ctrl+C simply
//! exits. Once `serve` registers its server, Ctrl+C instead raises the
//! shutdown flag and unblocks `incoming_requests()` so the request loop
//! returns normally.

use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
};
use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Install the process-wide handler. Call once, first thing in `main`.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(on_interrupt)
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))
}

fn on_interrupt() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    match SERVER.get() {
        Some(server) => {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }
        None => std::process::exit(130),
    }
}

/// Hand the bound server to the Ctrl+C handler. Only the first call counts.
pub fn register_server(server: Arc<Server>) {
    if SERVER.set(server).is_err() {
        crate::debug!("serve"; "a server is already registered for shutdown");
    }
}

/// Requests accepted after Ctrl+C get a 503 instead of a feed.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

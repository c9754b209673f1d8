//! Public feed server.
//!
//! Serves `GET {path_prefix}/{id}` with the channel's rendered feed. Every
//! request renders from the current store and registry, so admin changes
//! are visible immediately.

mod lifecycle;
mod response;
mod route;

use crate::{channel::ChannelManager, config::AppConfig, log};
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::Server;

/// Bind the server and run the request loop until Ctrl+C.
pub fn serve(config: &AppConfig, manager: Arc<ChannelManager>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    let channels = manager.store().len();
    log!("serve"; "http://{}{}/{{id}} ({} channels)", addr, manager.settings().path_prefix, channels);

    run_request_loop(&server, &manager, config.serve.workers)?;
    log!("serve"; "stopped");
    Ok(())
}

fn run_request_loop(server: &Server, manager: &Arc<ChannelManager>, workers: usize) -> Result<()> {
    // Rendering runs on the pool so a slow registry never blocks accept
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("syndic-http-{i}"))
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let manager = Arc::clone(manager);
        pool.spawn(move || {
            if let Err(e) = response::respond(request, &manager) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

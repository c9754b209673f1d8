//! Syndic - channel manager and syndication feed server.

#![allow(dead_code)]

mod channel;
mod cli;
mod config;
mod content;
mod core;
mod error;
mod feed;
mod filter;
mod logger;
mod utils;

use anyhow::Result;
use channel::{ChannelManager, ChannelStore};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;
use content::{BindingResolver, ContentRegistry, StaticRegistry};
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AppConfig::load(&cli)?;
    let manager = build_manager(&config)?;

    match &cli.command {
        Commands::Types => cli::channel::list_types(&manager),
        Commands::FeedTypes { content_type } => {
            cli::channel::list_feed_types(&manager, content_type)
        }
        Commands::Add {
            args,
            content_type,
            feed_type,
            filters,
        } => cli::channel::add(&manager, args, content_type, feed_type, filters),
        Commands::Update {
            id,
            args,
            feed_type,
            no_category,
        } => cli::channel::update(&manager, *id, args, feed_type.as_deref(), *no_category),
        Commands::Filter { id, action } => cli::channel::filter(&manager, *id, action),
        Commands::List { status, json } => cli::channel::list(&manager, *status, *json),
        Commands::Show { id, json } => cli::channel::show(&manager, *id, *json),
        Commands::Activate { id } => cli::channel::set_active(&manager, *id, true),
        Commands::Deactivate { id } => cli::channel::set_active(&manager, *id, false),
        Commands::Delete { id } => cli::channel::delete(&manager, *id),
        Commands::Render { id, output } => cli::channel::render(&manager, *id, output.as_deref()),
        Commands::Serve { .. } => cli::serve::serve(&config, Arc::new(manager)),
    }
}

/// Open the channel store and content registry named by the config.
fn build_manager(config: &AppConfig) -> Result<ChannelManager> {
    let registry_path = config.registry_path();
    let registry = if registry_path.is_file() {
        StaticRegistry::from_path(&registry_path)?
    } else {
        warn!(
            "content registry {} not found, no content type is available",
            registry_path.display()
        );
        StaticRegistry::new()
    };
    debug!("config"; "{} content items in registry", registry.item_count());

    let registry: Arc<dyn ContentRegistry> = Arc::new(registry);
    let binding = BindingResolver::new(
        registry,
        &config.registry.title_role,
        &config.registry.description_role,
    );

    let store = ChannelStore::open(&config.channels_path())?;
    debug!("store"; "{} channels in {}", store.len(), config.channels_path().display());

    Ok(ChannelManager::new(store, binding, config.feed_settings()))
}

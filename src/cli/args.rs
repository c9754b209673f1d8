//! Command-line interface definitions.

use crate::{
    channel::{ChannelId, ChannelStatus},
    filter::Filter,
};
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Syndication channel manager and feed server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: syndic.toml)
    #[arg(short = 'C', long, global = true, default_value = "syndic.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List content types that can back a channel
    #[command(visible_alias = "t")]
    Types,

    /// List feed types available for a content type
    FeedTypes {
        /// Content type code (e.g. ART)
        content_type: String,
    },

    /// Create a channel
    #[command(visible_alias = "a")]
    Add {
        #[command(flatten)]
        args: ChannelArgs,

        /// Content type code (e.g. ART)
        #[arg(short = 't', long = "type")]
        content_type: String,

        /// Feed type token (e.g. rss_2.0, atom_1.0)
        #[arg(short, long)]
        feed_type: String,

        /// Filter in text form (`attr=value`, `attr~text`, `attr:1..9`, `attr?`), repeatable
        #[arg(long = "filter")]
        filters: Vec<Filter>,
    },

    /// Update a channel; omitted fields keep their value
    #[command(visible_alias = "u")]
    Update {
        id: ChannelId,

        #[command(flatten)]
        args: ChannelArgs,

        /// Feed type token
        #[arg(short, long)]
        feed_type: Option<String>,

        /// Remove the category
        #[arg(long, conflicts_with = "category")]
        no_category: bool,
    },

    /// Add or remove channel filters
    Filter {
        id: ChannelId,

        #[command(subcommand)]
        action: FilterAction,
    },

    /// List channels
    #[command(visible_alias = "ls")]
    List {
        /// ACTIVE, NOT_ACTIVE or ALL
        #[arg(short, long, default_value = "ALL")]
        status: ChannelStatus,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one channel
    Show {
        id: ChannelId,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Activate a channel
    Activate { id: ChannelId },

    /// Deactivate a channel (its feed is still served)
    Deactivate { id: ChannelId },

    /// Delete a channel
    #[command(visible_alias = "rm")]
    Delete { id: ChannelId },

    /// Render a channel's feed to stdout or a file
    #[command(visible_alias = "r")]
    Render {
        id: ChannelId,

        /// Write the feed to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Serve channel feeds over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Channel fields shared by `add` and `update`.
#[derive(clap::Args, Debug, Clone)]
pub struct ChannelArgs {
    /// Channel title
    #[arg(long)]
    pub title: Option<String>,

    /// Channel description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Free-text category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Activate (or deactivate with `--active=false`)
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub active: Option<bool>,
}

/// `filter` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FilterAction {
    /// Append a filter
    Add {
        /// Filter in text form
        filter: Filter,
    },

    /// Remove the filter at a position (as shown by `show`)
    #[command(visible_alias = "rm")]
    Remove { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOp;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("syndic").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_add_command() {
        let cli = parse(&[
            "add",
            "--type",
            "ART",
            "--feed-type",
            "rss_2.0",
            "--title",
            "News",
            "-d",
            "Latest",
            "--filter",
            "Sezione=tech",
            "--active",
        ]);
        let Commands::Add {
            args,
            content_type,
            feed_type,
            filters,
        } = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!(content_type, "ART");
        assert_eq!(feed_type, "rss_2.0");
        assert_eq!(args.title.as_deref(), Some("News"));
        assert_eq!(args.active, Some(true));
        assert_eq!(
            filters,
            vec![Filter::new("Sezione", FilterOp::Equals("tech".into()))]
        );
    }

    #[test]
    fn test_list_status() {
        let cli = parse(&["list", "--status", "not_active"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                status: ChannelStatus::NotActive,
                json: false
            }
        ));

        let cli = parse(&["ls"]);
        assert!(matches!(cli.command, Commands::List { status: ChannelStatus::All, .. }));
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["serve", "-p", "8080", "-C", "conf/syndic.toml", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("conf/syndic.toml"));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));
    }

    #[test]
    fn test_filter_remove() {
        let cli = parse(&["filter", "3", "rm", "0"]);
        assert!(matches!(
            cli.command,
            Commands::Filter {
                id: 3,
                action: FilterAction::Remove { index: 0 }
            }
        ));
    }

    #[test]
    fn test_update_category_conflict() {
        let result = Cli::try_parse_from([
            "syndic",
            "update",
            "1",
            "--category",
            "x",
            "--no-category",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_activation_commands() {
        assert!(matches!(parse(&["activate", "2"]).command, Commands::Activate { id: 2 }));
        assert!(matches!(parse(&["deactivate", "2"]).command, Commands::Deactivate { id: 2 }));
    }

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(Cli::try_parse_from(["syndic", "filter", "1", "add", "=oops"]).is_err());
    }
}

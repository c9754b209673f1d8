//! Command-line interface module.

mod args;
pub mod channel;
pub mod serve;

pub use args::{ChannelArgs, Cli, Commands, FilterAction};

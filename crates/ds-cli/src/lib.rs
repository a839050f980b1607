//! Daily summary CLI library.
//!
//! This crate provides the CLI interface for the daily summary.

mod cli;
pub mod commands;
mod config;
pub mod output;

pub use cli::{Cli, Commands, GenerateArgs};
pub use config::Config;

//! CLI module
//!
//! Command-line interface for invoking catalog operations.
//!
//! # Commands
//!
//! - `list` - List the operations of the catalog
//! - `describe` - Show one operation's parameters and pagination
//! - `validate` - Load and validate the catalog
//! - `invoke` - Call an operation, following continuation tokens

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{InvokeArgs, Runner};

//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the imgbed binary.

mod commands;
mod list;
mod manage;
mod upload;

pub use commands::{Cli, Commands};
pub use list::handle_list;
pub use manage::{handle_delete, handle_download, handle_rename, handle_resolve};
pub use upload::handle_upload;

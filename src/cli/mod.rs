//! Command-line interface for tunesync.
//!
//! This module provides CLI commands for previewing, executing, and
//! bidirectionally syncing playlists between platforms.

mod commands;

pub use commands::{Cli, Commands, run_command};

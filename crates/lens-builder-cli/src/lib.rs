/*
[INPUT]:  Public API exports for lens-builder-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod cli;
pub mod commands;
pub mod config;

// Re-export main types for convenience
pub use cli::{Cli, Command, StorageKind};
pub use commands::{CommandContext, exit_status_for};
pub use config::{AppConfig, Settings};

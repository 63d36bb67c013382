/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed command tree for the lens-builder binary
[POS]:    CLI layer - argument definitions
[UPDATE]: When changing CLI flags or subcommands
*/

pub mod init;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lens_builder_adapter::Environment;

#[derive(Parser, Debug)]
#[command(name = "lens-builder", version, about = "Lens builder app management")]
pub struct Cli {
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
    /// Overrides the settings' environment
    #[arg(long = "environment", value_name = "ENV", global = true)]
    pub environment: Option<Environment>,
    /// YAML or TOML settings file
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate as builder and print the session
    Login,
    /// Upload metadata and create an app
    CreateApp {
        #[arg(long = "config", value_name = "PATH")]
        config: PathBuf,
        /// Validate inputs without any network call
        #[arg(long = "dry-run")]
        dry_run: bool,
        #[arg(long, value_enum, default_value_t = StorageKind::Grove)]
        storage: StorageKind,
        /// Wait for indexing, then fetch the created app
        #[arg(long)]
        wait: bool,
    },
    /// Upload metadata and point an existing app at it
    SetAppMetadata {
        #[arg(long, value_name = "ADDRESS")]
        app: String,
        #[arg(long = "config", value_name = "PATH")]
        config: PathBuf,
        #[arg(long = "dry-run")]
        dry_run: bool,
        #[arg(long, value_enum, default_value_t = StorageKind::Grove)]
        storage: StorageKind,
        #[arg(long)]
        wait: bool,
    },
    /// Upload an app's metadata document and print its URI
    UploadMetadata {
        #[arg(long = "config", value_name = "PATH")]
        config: PathBuf,
        #[arg(long, value_enum, default_value_t = StorageKind::Grove)]
        storage: StorageKind,
    },
    /// Upload an image and print its URI
    UploadFile {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = StorageKind::Grove)]
        storage: StorageKind,
    },
    /// Show the indexing status of a transaction
    TxStatus {
        hash: String,
        /// Poll until finished or failed
        #[arg(long)]
        wait: bool,
    },
    /// Fetch the app created by a transaction
    FetchApp { hash: String },
    /// Write an app definition interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = "app.yaml")]
        output: PathBuf,
    },
}

/// Where metadata and logos are stored
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Grove,
    DataUri,
}

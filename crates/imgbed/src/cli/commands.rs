//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use imgbed::SortMode;
use std::path::PathBuf;

/// imgbed - Use a GitHub repository as an image host
#[derive(Parser, Debug)]
#[command(name = "imgbed")]
#[command(about = "Use a GitHub repository as an image host", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load configuration from this file only
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List images under the configured root path
    List {
        /// Page of the listing to show (one revealed batch per page)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Show every image instead of one page
        #[arg(long)]
        all: bool,

        /// Sort order: name-asc, name-desc, date-asc, date-desc
        #[arg(long)]
        sort: Option<SortMode>,

        /// Only show images whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Upload local files under the configured root path
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Uploads in flight at once (0 for unbounded)
        #[arg(long)]
        max_concurrent: Option<usize>,
    },

    /// Rename an image within its directory
    Rename {
        /// Image URL or repository path
        image: String,

        /// New file name
        new_name: String,
    },

    /// Delete an image
    Delete {
        /// Image URL or repository path
        image: String,
    },

    /// Download an image
    Download {
        /// Image URL or repository path
        image: String,

        /// Destination file (defaults to the image name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the repository path and display URL for an image URL
    Resolve {
        /// Raw, custom-domain or repository-relative URL
        url: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
    /// Markdown image snippets
    Markdown,
}

//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Request-scoped HTML document assembler with a page cache
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root (default: directory of the config file)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file name (default: vellum.toml)
    #[arg(short = 'C', long, global = true, default_value = "vellum.toml")]
    pub config: PathBuf,

    /// Serve cached pages and hide diagnostics
    #[arg(long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub production: Option<bool>,

    /// Append the diagnostics overlay (ignored in production)
    #[arg(short, long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub debug: Option<bool>,

    /// Minify the html content
    #[arg(short, long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render one request to stdout using the `[page]` setup
    Render {
        /// Request target, e.g. `/about?clear_cache=clear_cache`
        url: String,

        /// File holding the page body (default: mapped from `[paths].content`)
        #[arg(short, long)]
        body: Option<PathBuf>,

        /// HTTP method shown in diagnostics
        #[arg(long, default_value = "GET")]
        method: String,

        /// Route name shown in diagnostics
        #[arg(long)]
        route: Option<String>,
    },

    /// Serve content pages through the assembler
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Remove cached pages
    Purge {
        /// Request target whose page should be dropped
        url: Option<String>,

        /// Drop every cached page
        #[arg(short, long, conflicts_with = "url")]
        all: bool,
    },

    /// Inspect or edit the transient store
    Transient {
        #[command(subcommand)]
        action: TransientAction,
    },

    /// Write a minified copy of a stylesheet or script
    Compress {
        /// Path relative to `[paths].styles` or `[paths].scripts`
        path: PathBuf,
    },
}

/// `vellum transient` actions
#[derive(Subcommand, Debug, Clone)]
pub enum TransientAction {
    /// Print a value as JSON
    Get { name: String },

    /// Store a value; JSON is parsed, anything else is stored as a string
    Set {
        name: String,
        value: String,

        /// Time to live in seconds
        #[arg(short, long, default_value_t = crate::cache::DAY_IN_SECONDS)]
        ttl: u64,
    },

    /// Remove a value
    Delete { name: String },
}

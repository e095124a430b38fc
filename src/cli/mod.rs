//! CLI module for Redsight.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Redsight - Reddit search, sentiment and trend analysis
///
/// Runs the analysis tools from the command line, or serves them to AI
/// assistants over MCP and to other systems over HTTP.
#[derive(Parser, Debug)]
#[command(name = "redsight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Search Reddit posts or subreddits
    Search {
        /// Search query
        query: String,

        /// What to search for (post, subreddit)
        #[arg(short = 't', long = "type", default_value = "post")]
        search_type: String,

        /// Restrict post search to a subreddit
        #[arg(short, long)]
        subreddit: Option<String>,

        /// Time window (hour, day, week, month, year, all)
        #[arg(long = "time", default_value = "month")]
        time_filter: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Analyze sentiment, keywords and topics in a post's comments
    Analyze {
        /// Reddit post URL
        post_url: String,

        /// Comment sort (top, best, new, controversial, old, qa)
        #[arg(short, long, default_value = "top")]
        sort: String,

        /// Maximum comments to analyze
        #[arg(short, long, default_value = "100")]
        limit: u32,
    },

    /// Compare trending topics across subreddits
    Trends {
        /// Subreddits to analyze (default: all)
        subreddits: Vec<String>,

        /// Period for top posts (hour, day, week, month, year)
        #[arg(short, long, default_value = "day")]
        period: String,

        /// Posts per subreddit
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Fetch a web page as text or raw HTML
    Fetch {
        /// Page URL
        url: String,

        /// Return raw HTML instead of extracted text
        #[arg(long)]
        raw: bool,

        /// User-Agent override
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration with secrets masked
    Show,

    /// Show configuration file path
    Path,
}

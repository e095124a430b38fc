//! Redsight - Reddit search, sentiment and trend analysis
//!
//! Exposes Reddit analytics as tools over the Model Context Protocol, a small
//! HTTP API and the command line.
//!
//! # Overview
//!
//! Redsight allows you to:
//! - Search Reddit posts and subreddits
//! - Analyze the sentiment, keywords and topics of a post's comments
//! - Compare trending keywords and activity across subreddits
//! - Fetch web pages as readable text
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `reddit` - Reddit API client and the `RedditSource` abstraction
//! - `analysis` - Sentiment, keyword, topic and trend analytics
//! - `web` - Web page fetching and text extraction
//! - `service` - The tool layer shared by every front end
//! - `mcp` - MCP server over stdio
//! - `cli` - Command line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use redsight::analysis::{TextAnalyzer, TextRecord};
//!
//! let analyzer = TextAnalyzer::default();
//! let comments = vec![
//!     TextRecord::new("c1", "This release is great"),
//!     TextRecord::new("c2", "The compiler errors are terrible"),
//! ];
//! let analysis = analyzer.analyze_comments(&comments);
//! println!("{:?}", analysis.overall_sentiment.sentiment_label);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod reddit;
pub mod service;
pub mod web;

pub use error::{RedsightError, Result};

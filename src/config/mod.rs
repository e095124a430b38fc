//! Configuration module for Redsight.
//!
//! Handles loading settings from TOML and overlaying Reddit credentials from the environment.

mod settings;

pub use settings::{
    AnalysisSettings, Credentials, FetchSettings, GeneralSettings, RedditSettings, Settings,
    TrendSettings, DEFAULT_USER_AGENT,
};

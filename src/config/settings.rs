//! Configuration settings for Redsight.

use crate::error::{RedsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default user agent sent to Reddit when none is configured.
pub const DEFAULT_USER_AGENT: &str = "rust:redsight:v0.1.0 (by /u/your_username)";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub reddit: RedditSettings,
    pub analysis: AnalysisSettings,
    pub trends: TrendSettings,
    pub fetch: FetchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Reddit API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditSettings {
    /// OAuth application client id.
    pub client_id: Option<String>,
    /// OAuth application client secret.
    pub client_secret: Option<String>,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Base URL for authenticated API calls.
    pub api_base: String,
    /// Token endpoint for the client-credentials grant.
    pub auth_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_base: "https://oauth.reddit.com".to_string(),
            auth_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Resolved Reddit credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditSettings {
    /// Resolve credentials, failing when either id or secret is absent or empty.
    pub fn credentials(&self) -> Result<Credentials> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        match (non_empty(&self.client_id), non_empty(&self.client_secret)) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials {
                client_id,
                client_secret,
                user_agent: self.user_agent.clone(),
            }),
            _ => Err(RedsightError::MissingCredentials),
        }
    }

    /// Whether both credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }
}

/// Comment analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of keywords reported in keyword rankings.
    pub top_keywords: usize,
    /// Number of top keywords used as topic candidates.
    pub topic_keywords: usize,
    /// Sample texts reported per topic.
    pub sample_texts: usize,
    /// Comments echoed back in a post analysis.
    pub returned_comments: usize,
    /// Characters kept from comment and selftext previews.
    pub text_preview_chars: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_keywords: 20,
            topic_keywords: 10,
            sample_texts: 3,
            returned_comments: 20,
            text_preview_chars: 300,
        }
    }
}

/// Cross-subreddit trend analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Posts fetched per subreddit when the caller gives no limit.
    pub default_limit: u32,
    /// Pause between subreddit fetches, in milliseconds.
    pub request_delay_ms: u64,
    /// Number of top-scoring posts reported.
    pub trending_posts: usize,
    /// Keywords reported per subreddit.
    pub subreddit_keywords: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            default_limit: 50,
            request_delay_ms: 100,
            trending_posts: 10,
            subreddit_keywords: 10,
        }
    }
}

/// Web page fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum characters of text or HTML returned.
    pub max_chars: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_chars: 5000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Overlay Reddit credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay Reddit credentials using the given variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(id) = lookup("REDDIT_CLIENT_ID") {
            self.reddit.client_id = Some(id);
        }
        if let Some(secret) = lookup("REDDIT_CLIENT_SECRET") {
            self.reddit.client_secret = Some(secret);
        }
        if let Some(agent) = lookup("REDDIT_USER_AGENT") {
            self.reddit.user_agent = agent;
        }
    }

    /// Serialize to TOML with secrets masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut copy = self.clone();
        if copy.reddit.client_secret.is_some() {
            copy.reddit.client_secret = Some("********".to_string());
        }
        toml::to_string_pretty(&copy).map_err(|e| RedsightError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("redsight")
            .join("config.toml")
    }
}

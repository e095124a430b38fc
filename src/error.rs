//! Error types for Redsight.

use thiserror::Error;

/// Library-level error type for Redsight operations.
#[derive(Error, Debug)]
pub enum RedsightError {
    #[error(
        "Reddit API credentials are not configured. \
         Set REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET in the environment or config file."
    )]
    MissingCredentials,

    #[error("Invalid {name} '{value}'. Use one of: {allowed}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RedsightError {
    /// Build an [`RedsightError::InvalidParameter`] from the allowed value set.
    pub fn invalid_parameter(name: &'static str, value: &str, allowed: &[&str]) -> Self {
        RedsightError::InvalidParameter {
            name,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }

    /// Stable machine-readable error kind, emitted in tool error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            RedsightError::MissingCredentials => "missing_credentials",
            RedsightError::InvalidParameter { .. } => "invalid_parameter",
            RedsightError::UpstreamFetch(_) | RedsightError::Http(_) => "upstream_fetch",
            RedsightError::InvalidInput(_) => "invalid_input",
            RedsightError::UnknownTool(_) => "unknown_tool",
            RedsightError::Config(_) | RedsightError::TomlParse(_) => "config",
            RedsightError::Io(_) | RedsightError::Json(_) => "internal",
        }
    }
}

/// Result type alias for Redsight operations.
pub type Result<T> = std::result::Result<T, RedsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = RedsightError::invalid_parameter("time filter", "decade", &["day", "week"]);
        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(
            err.to_string(),
            "Invalid time filter 'decade'. Use one of: day, week"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(RedsightError::MissingCredentials.kind(), "missing_credentials");
        assert_eq!(RedsightError::UpstreamFetch("429".into()).kind(), "upstream_fetch");
        assert_eq!(RedsightError::UnknownTool("x".into()).kind(), "unknown_tool");
    }
}

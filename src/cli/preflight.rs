//! Pre-flight checks before network operations.
//!
//! Validates that required configuration is available before starting
//! spinners and requests that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{RedsightError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Reddit search requires API credentials.
    Search,
    /// Post analysis requires API credentials.
    Analyze,
    /// Trend analysis requires API credentials.
    Trends,
    /// Plain page fetches need nothing.
    Fetch,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Search | Operation::Analyze | Operation::Trends => {
            check_credentials(settings)?;
        }
        Operation::Fetch => {}
    }
    Ok(())
}

fn check_credentials(settings: &Settings) -> Result<()> {
    settings.reddit.credentials().map(|_| ())
}

/// Human-readable hint for a failed pre-flight check.
pub fn hint(err: &RedsightError) -> Option<&'static str> {
    match err {
        RedsightError::MissingCredentials => Some(
            "Create a script app at https://www.reddit.com/prefs/apps and export REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_has_no_requirements() {
        assert!(check(Operation::Fetch, &Settings::default()).is_ok());
    }

    #[test]
    fn test_reddit_operations_need_credentials() {
        let mut settings = Settings::default();
        let err = check(Operation::Trends, &settings).unwrap_err();
        assert_eq!(err.kind(), "missing_credentials");
        assert!(hint(&err).is_some());

        settings.reddit.client_id = Some("id".into());
        settings.reddit.client_secret = Some("secret".into());
        assert!(check(Operation::Search, &settings).is_ok());
        assert!(check(Operation::Analyze, &settings).is_ok());
    }
}

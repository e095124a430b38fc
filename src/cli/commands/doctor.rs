//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{Settings, DEFAULT_USER_AGENT};
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Redsight Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Reddit API").bold());
    let reddit_checks = vec![
        check_secret("REDDIT_CLIENT_ID", settings.reddit.client_id.as_deref()),
        check_secret("REDDIT_CLIENT_SECRET", settings.reddit.client_secret.as_deref()),
        check_user_agent(&settings.reddit.user_agent),
    ];
    for check in &reddit_checks {
        check.print();
    }
    checks.extend(reddit_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let path = config_path.cloned().unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Reddit tools will fail until they are fixed.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Redsight is ready to use.");
    }

    Ok(())
}

/// Check that a credential is set, showing it masked.
fn check_secret(name: &str, value: Option<&str>) -> CheckResult {
    let hint = format!("Set with: export {}='...' (from https://www.reddit.com/prefs/apps)", name);
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => CheckResult::ok(name, &format!("configured ({})", mask(v))),
        Some(_) => CheckResult::error(name, "empty", &hint),
        None => CheckResult::error(name, "not set", &hint),
    }
}

/// Reddit asks for `<platform>:<app id>:<version> (by /u/<username>)`.
fn check_user_agent(user_agent: &str) -> CheckResult {
    let name = "User agent";
    if user_agent == DEFAULT_USER_AGENT || user_agent.contains("your_username") {
        CheckResult::warning(
            name,
            "using the default placeholder",
            "Set REDDIT_USER_AGENT to e.g. 'linux:myapp:v1.0 (by /u/yourname)'",
        )
    } else if !user_agent.contains("/u/") {
        CheckResult::warning(
            name,
            user_agent,
            "Reddit expects '<platform>:<app id>:<version> (by /u/<username>)'",
        )
    } else {
        CheckResult::ok(name, user_agent)
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            &format!("{} not found, using defaults", path.display()),
            "Credentials can also come from the environment",
        )
    }
}

/// Keep the first and last few characters of a secret.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_secret() {
        let result = check_secret("REDDIT_CLIENT_ID", Some("abcdefghijkl"));
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("abcd...kl"));
        assert!(!result.message.contains("efgh"));

        assert_eq!(check_secret("X", Some("  ")).status, CheckStatus::Error);
        assert_eq!(check_secret("X", None).status, CheckStatus::Error);
    }

    #[test]
    fn test_check_user_agent() {
        assert_eq!(check_user_agent(DEFAULT_USER_AGENT).status, CheckStatus::Warning);
        assert_eq!(check_user_agent("curl/8.0").status, CheckStatus::Warning);
        assert_eq!(
            check_user_agent("linux:redsight:v0.1.0 (by /u/ferris)").status,
            CheckStatus::Ok
        );
    }

    #[test]
    fn test_mask_short_values() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("0123456789"), "0123...89");
    }

    #[test]
    fn test_config_file_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);
        std::fs::write(&path, "").unwrap();
        assert_eq!(check_config_file(&path).status, CheckStatus::Ok);
    }
}

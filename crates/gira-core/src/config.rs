//! Configuration handling for gira
//!
//! The configuration is read once at startup and passed by reference to every
//! component that needs it. Values come from a `.gira.toml` file and are then
//! overridden by `GIRA_*` environment variables.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GiraError;

/// Environment variable holding the issue key pattern
pub const ENV_ISSUE_PATTERN: &str = "GIRA_JIRA_ISSUE_PATTERN";
/// Environment variable holding the tracker base URL
pub const ENV_TRACKER_URL: &str = "GIRA_JIRA_URL";
/// Environment variable holding the tracker username
pub const ENV_TRACKER_USER: &str = "GIRA_JIRA_USER";
/// Environment variable holding the tracker API token
pub const ENV_TRACKER_TOKEN: &str = "GIRA_JIRA_TOKEN";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = ".gira.toml";

/// gira configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Pattern used to find an issue key in a branch name
    #[serde(default)]
    pub jira_issue_pattern: String,

    /// Tracker base URL (e.g. https://example.atlassian.net)
    #[serde(default)]
    pub jira_url: String,

    /// Tracker username
    #[serde(default)]
    pub jira_user: String,

    /// Tracker API token
    #[serde(default)]
    pub jira_token: String,

    /// Refuse to delete the checked-out branch
    #[serde(default = "default_protect_head")]
    pub protect_head: bool,

    /// Per-request tracker timeout in seconds (0 disables the timeout)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of concurrent tracker lookups
    #[serde(default = "default_lookup_workers")]
    pub lookup_workers: usize,
}

fn default_protect_head() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_lookup_workers() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_issue_pattern: String::new(),
            jira_url: String::new(),
            jira_user: String::new(),
            jira_token: String::new(),
            protect_head: default_protect_head(),
            request_timeout_secs: default_request_timeout_secs(),
            lookup_workers: default_lookup_workers(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.jira_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("jira_issue_pattern", &self.jira_issue_pattern)
            .field("jira_url", &self.jira_url)
            .field("jira_user", &self.jira_user)
            .field("jira_token", &token)
            .field("protect_head", &self.protect_head)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("lookup_workers", &self.lookup_workers)
            .finish()
    }
}

impl Config {
    /// True when URL, user, and token are all present
    pub fn tracker_capable(&self) -> bool {
        !self.jira_url.is_empty() && !self.jira_user.is_empty() && !self.jira_token.is_empty()
    }

    /// Parse a configuration file body
    pub fn from_toml_str(content: &str) -> Result<Self, GiraError> {
        toml::from_str(content).map_err(|e| GiraError::Config(e.to_string()))
    }

    /// Load the configuration for a run started in `working_dir`
    ///
    /// Reads the first configuration file found by [`config_search_paths`],
    /// then applies environment overrides from the process environment.
    pub fn load(working_dir: &Path) -> Result<Self, GiraError> {
        let mut config = match find_config_file(working_dir) {
            Some(path) => {
                tracing::debug!("reading configuration from {}", path.display());
                let content = fs::read_to_string(&path)?;
                Self::from_toml_str(&content).map_err(|e| {
                    GiraError::Config(format!("{}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override fields with non-empty values returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = [
            (ENV_ISSUE_PATTERN, &mut self.jira_issue_pattern),
            (ENV_TRACKER_URL, &mut self.jira_url),
            (ENV_TRACKER_USER, &mut self.jira_user),
            (ENV_TRACKER_TOKEN, &mut self.jira_token),
        ];

        for (name, field) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }
}

/// Candidate configuration files, most specific first
pub fn config_search_paths(working_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![working_dir.join(CONFIG_FILE_NAME)];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("gira").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join(CONFIG_FILE_NAME));
    }

    paths
}

fn find_config_file(working_dir: &Path) -> Option<PathBuf> {
    config_search_paths(working_dir)
        .into_iter()
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(url: &str, user: &str, token: &str) -> Config {
        Config {
            jira_url: url.to_string(),
            jira_user: user.to_string(),
            jira_token: token.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_tracker_capable_requires_all_three_fields() {
        for mask in 0..8u8 {
            let url = if mask & 1 != 0 { "https://jira.example" } else { "" };
            let user = if mask & 2 != 0 { "anonymous" } else { "" };
            let token = if mask & 4 != 0 { "abc" } else { "" };

            let expected = mask == 7;
            assert_eq!(
                config(url, user, token).tracker_capable(),
                expected,
                "url={:?} user={:?} token={:?}",
                url,
                user,
                token
            );
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.protect_head);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.lookup_workers, 1);
        assert!(!config.tracker_capable());
    }

    #[test]
    fn test_from_toml_str_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
jira_issue_pattern = "JIRA-\\d+"
jira_url = "https://jira.example"
lookup_workers = 4
"#,
        )
        .unwrap();
        assert_eq!(config.jira_issue_pattern, r"JIRA-\d+");
        assert_eq!(config.jira_url, "https://jira.example");
        assert_eq!(config.jira_user, "");
        assert_eq!(config.lookup_workers, 4);
        assert!(config.protect_head);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_types() {
        let err = Config::from_toml_str("lookup_workers = \"many\"").unwrap_err();
        assert!(matches!(err, GiraError::Config(_)));
    }

    #[test]
    fn test_env_overrides_non_empty_values_only() {
        let mut config = config("https://file.example", "file-user", "file-token");
        let env: HashMap<&str, &str> = [
            (ENV_TRACKER_URL, "https://env.example"),
            (ENV_TRACKER_USER, ""),
            (ENV_ISSUE_PATTERN, "ABC-\\d+"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.jira_url, "https://env.example");
        assert_eq!(config.jira_user, "file-user");
        assert_eq!(config.jira_token, "file-token");
        assert_eq!(config.jira_issue_pattern, "ABC-\\d+");
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config("u", "user", "secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_search_paths_start_with_working_dir() {
        let paths = config_search_paths(Path::new("/work/repo"));
        assert_eq!(paths[0], Path::new("/work/repo/.gira.toml"));
    }
}

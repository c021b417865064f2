//! Issue tracker access
//!
//! [`StatusClient`] is what the reconciler talks to. It is either disabled
//! (no tracker configured, every lookup returns nothing) or wraps an
//! [`IssueTracker`] that was authenticated once at startup.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::config::Config;
use crate::error::GiraError;

/// Issue fetched from the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status_name: String,
}

/// A tracker that can look up a single issue by key
pub trait IssueTracker: Send + Sync {
    fn get_issue(&self, key: &str) -> Result<Issue, GiraError>;
}

/// Status lookups for one run
pub enum StatusClient {
    /// Tracker not configured; lookups are no-ops
    Disabled,
    /// Authenticated tracker
    Enabled(Box<dyn IssueTracker>),
}

impl fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusClient::Disabled => write!(f, "StatusClient::Disabled"),
            StatusClient::Enabled(_) => write!(f, "StatusClient::Enabled(..)"),
        }
    }
}

impl StatusClient {
    /// Build the client for this run, authenticating if the tracker is configured
    ///
    /// A configuration that is not tracker-capable is not an error: the
    /// returned client is disabled.
    pub fn connect(config: &Config) -> Result<Self, GiraError> {
        if !config.tracker_capable() {
            tracing::debug!("tracker not configured, issue lookups disabled");
            return Ok(StatusClient::Disabled);
        }

        let timeout = match config.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let tracker = JiraTracker::authenticate(
            &config.jira_url,
            &config.jira_user,
            &config.jira_token,
            timeout,
        )?;

        Ok(StatusClient::Enabled(Box::new(tracker)))
    }

    /// Wrap an already authenticated tracker
    pub fn with_tracker(tracker: impl IssueTracker + 'static) -> Self {
        StatusClient::Enabled(Box::new(tracker))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, StatusClient::Enabled(_))
    }

    /// Fetch one issue; `Ok(None)` when lookups are disabled
    pub fn fetch(&self, key: &str) -> Result<Option<Issue>, GiraError> {
        match self {
            StatusClient::Disabled => Ok(None),
            StatusClient::Enabled(tracker) => tracker.get_issue(key).map(Some),
        }
    }
}

/// Jira REST (v2) client using basic authentication
pub struct JiraTracker {
    base_url: Url,
    user: String,
    token: String,
    client: Client,
}

impl fmt::Debug for JiraTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraTracker")
            .field("base_url", &self.base_url.as_str())
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: Option<StatusField>,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "errorMessages")]
    error_messages: Vec<String>,
}

impl JiraTracker {
    /// Create the client and verify the credentials against `/myself`
    pub fn authenticate(
        base_url: &str,
        user: &str,
        token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GiraError> {
        let tracker = Self::new(base_url, user, token, timeout)?;
        let url = tracker.endpoint(&["rest", "api", "2", "myself"])?;

        tracing::debug!("authenticating against {}", tracker.base_url);
        let response = tracker
            .client
            .get(url)
            .basic_auth(&tracker.user, Some(&tracker.token))
            .send()
            .map_err(|e| GiraError::TrackerAuth {
                reason: format!("could not reach {}: {}", tracker.base_url, e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GiraError::TrackerAuth {
                reason: format!("credentials for {} were rejected (HTTP {})", user, status),
            });
        }
        if !status.is_success() {
            return Err(GiraError::TrackerAuth {
                reason: format!("HTTP {}: {}", status, error_message(response)),
            });
        }

        Ok(tracker)
    }

    fn new(
        base_url: &str,
        user: &str,
        token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GiraError> {
        let base_url = Url::parse(base_url).map_err(|e| GiraError::TrackerAuth {
            reason: format!("invalid tracker URL `{}`: {}", base_url, e),
        })?;

        let client = Client::builder()
            .user_agent(concat!("gira/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GiraError::TrackerAuth {
                reason: format!("failed to initialize HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url,
            user: user.to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GiraError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GiraError::TrackerAuth {
                reason: format!("tracker URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn issue_url(&self, key: &str) -> Result<Url, GiraError> {
        let mut url = self.endpoint(&["rest", "api", "2", "issue", key])?;
        url.set_query(Some("fields=summary,status"));
        Ok(url)
    }
}

impl IssueTracker for JiraTracker {
    fn get_issue(&self, key: &str) -> Result<Issue, GiraError> {
        let lookup_error = |reason: String| GiraError::IssueLookup {
            key: key.to_string(),
            reason,
        };

        let url = self.issue_url(key).map_err(|e| lookup_error(e.to_string()))?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.token))
            .send()
            .map_err(|e| lookup_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(lookup_error(format!(
                "HTTP {}: {}",
                status,
                error_message(response)
            )));
        }

        let body: IssueResponse = response
            .json()
            .map_err(|e| lookup_error(format!("unexpected response: {}", e)))?;

        Ok(Issue {
            key: body.key,
            summary: body.fields.summary,
            status_name: body.fields.status.map(|s| s.name).unwrap_or_default(),
        })
    }
}

fn error_message(response: Response) -> String {
    let body = response.text().unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) if !parsed.error_messages.is_empty() => parsed.error_messages.join("; "),
        _ => truncate_for_error(&body),
    }
}

fn truncate_for_error(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_string()
    } else {
        format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTracker;

    impl IssueTracker for FixedTracker {
        fn get_issue(&self, key: &str) -> Result<Issue, GiraError> {
            Ok(Issue {
                key: key.to_string(),
                summary: "Fix the thing".to_string(),
                status_name: "In Review".to_string(),
            })
        }
    }

    #[test]
    fn test_disabled_client_returns_nothing() {
        let client = StatusClient::connect(&Config::default()).unwrap();
        assert!(!client.is_enabled());
        assert_eq!(client.fetch("JIRA-1").unwrap(), None);
    }

    #[test]
    fn test_partial_config_disables_lookups() {
        let config = Config {
            jira_url: "https://jira.example".to_string(),
            jira_user: "someone".to_string(),
            ..Config::default()
        };
        let client = StatusClient::connect(&config).unwrap();
        assert!(!client.is_enabled());
    }

    #[test]
    fn test_enabled_client_delegates() {
        let client = StatusClient::with_tracker(FixedTracker);
        let issue = client.fetch("JIRA-9").unwrap().unwrap();
        assert_eq!(issue.key, "JIRA-9");
        assert_eq!(issue.status_name, "In Review");
    }

    #[test]
    fn test_issue_url() {
        let tracker = JiraTracker::new("https://jira.example/", "u", "t", None).unwrap();
        assert_eq!(
            tracker.issue_url("JIRA-12").unwrap().as_str(),
            "https://jira.example/rest/api/2/issue/JIRA-12?fields=summary,status"
        );

        let tracker = JiraTracker::new("https://example.com/jira", "u", "t", None).unwrap();
        assert_eq!(
            tracker.issue_url("A-1").unwrap().as_str(),
            "https://example.com/jira/rest/api/2/issue/A-1?fields=summary,status"
        );
    }

    #[test]
    fn test_invalid_url_fails_authentication() {
        let err = JiraTracker::authenticate("not a url", "u", "t", None).unwrap_err();
        assert!(matches!(err, GiraError::TrackerAuth { .. }));
    }

    #[test]
    fn test_unreachable_tracker_fails_authentication() {
        let err = JiraTracker::authenticate(
            "http://127.0.0.1:9",
            "u",
            "t",
            Some(Duration::from_secs(2)),
        )
        .unwrap_err();
        assert!(matches!(err, GiraError::TrackerAuth { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_debug_redacts_token() {
        let tracker = JiraTracker::new("https://jira.example", "u", "hunter2", None).unwrap();
        assert!(!format!("{:?}", tracker).contains("hunter2"));
    }

    #[test]
    fn test_truncate_for_error() {
        assert_eq!(truncate_for_error("short"), "short");
        let long = "x".repeat(250);
        let truncated = truncate_for_error(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}

//! Issue key extraction from branch names

use regex::Regex;

use crate::error::GiraError;

/// Issue key pattern compiled once per run
///
/// An empty pattern is valid and never matches, so users without a tracker
/// are unaffected.
#[derive(Debug, Clone)]
pub struct IssuePattern {
    regex: Option<Regex>,
}

impl IssuePattern {
    /// Compile the configured pattern, failing on invalid syntax
    pub fn compile(pattern: &str) -> Result<Self, GiraError> {
        if pattern.is_empty() {
            return Ok(Self::disabled());
        }

        let regex = Regex::new(pattern).map_err(|e| GiraError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { regex: Some(regex) })
    }

    /// A pattern that never yields a key
    pub fn disabled() -> Self {
        Self { regex: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.regex.is_some()
    }

    /// Return the first substring of `name` matching the pattern
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.regex
            .as_ref()?
            .find(name)
            .map(|m| m.as_str())
            .filter(|key| !key.is_empty())
    }
}

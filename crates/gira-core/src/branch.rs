//! Branch view model shared by the reconciler, selector, and committer

use std::collections::HashSet;

use serde::Serialize;

/// Prefix of every local branch reference
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Label shown for a branch with no correlated issue
///
/// Parenthesized so it never reads like a tracker status name.
pub const NO_ISSUE_LABEL: &str = "(no issue)";

/// One local branch under consideration for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    reference_name: String,
    /// Issue key extracted from the display name, if the pattern matched
    pub issue_key: Option<String>,
    /// Status label fetched from the tracker
    pub issue_status: Option<String>,
    /// Marked for deletion by the selector
    pub selected: bool,
    /// Never deletable in this run (e.g. the checked-out branch)
    pub protected: bool,
}

impl Branch {
    /// Create a branch from a fully-qualified reference name
    pub fn new(reference_name: impl Into<String>) -> Self {
        Self {
            reference_name: reference_name.into(),
            issue_key: None,
            issue_status: None,
            selected: false,
            protected: false,
        }
    }

    /// Build one branch per local reference, in listing order
    ///
    /// Remote-tracking and other non-local references are dropped, as are
    /// repeated names.
    pub fn from_references<I, S>(references: I) -> Vec<Branch>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut branches: Vec<Branch> = Vec::new();
        for reference in references {
            let reference = reference.into();
            if !is_local_reference(&reference) || !seen.insert(reference.clone()) {
                continue;
            }
            branches.push(Branch::new(reference));
        }
        branches
    }

    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    /// Reference name without the local-branch prefix
    pub fn display_name(&self) -> &str {
        display_name(&self.reference_name)
    }

    /// Status label, treating an empty string the same as no status
    pub fn status(&self) -> Option<&str> {
        self.issue_status.as_deref().filter(|s| !s.is_empty())
    }
}

/// Strip exactly the `refs/heads/` prefix from a reference name
pub fn display_name(reference_name: &str) -> &str {
    reference_name
        .strip_prefix(LOCAL_BRANCH_PREFIX)
        .unwrap_or(reference_name)
}

/// Whether a reference name points at a local branch
pub fn is_local_reference(reference_name: &str) -> bool {
    reference_name.len() > LOCAL_BRANCH_PREFIX.len()
        && reference_name.starts_with(LOCAL_BRANCH_PREFIX)
}

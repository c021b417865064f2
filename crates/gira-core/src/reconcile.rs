//! Reconciliation of local branches with tracker state
//!
//! Enriches each branch in place with its issue key and status, and groups
//! the result by status for the plain-text report.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::branch::{Branch, NO_ISSUE_LABEL};
use crate::extractor::IssuePattern;
use crate::tracker::{Issue, StatusClient};

/// Counts describing one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Branches whose status was fetched
    pub resolved: usize,
    /// Branches whose lookup failed
    pub failed: usize,
    /// Branches with no key, or with lookups disabled
    pub skipped: usize,
}

/// Extract keys and fetch statuses for every branch
///
/// Branches are processed in listing order. A failed lookup is logged and
/// leaves that branch without a status; it never affects other branches.
/// With `workers > 1` lookups run concurrently, but the call only returns
/// once every lookup has resolved.
pub fn reconcile(
    branches: &mut [Branch],
    pattern: &IssuePattern,
    client: &StatusClient,
    workers: usize,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let mut pending: Vec<(usize, String)> = Vec::new();
    for (index, branch) in branches.iter_mut().enumerate() {
        branch.issue_key = pattern.extract(branch.display_name()).map(str::to_string);
        match (&branch.issue_key, client.is_enabled()) {
            (Some(key), true) => pending.push((index, key.clone())),
            _ => summary.skipped += 1,
        }
    }

    let results = if workers > 1 && pending.len() > 1 {
        fetch_concurrent(&pending, client, workers)
    } else {
        pending
            .iter()
            .map(|(_, key)| fetch_logged(client, key))
            .collect()
    };

    for ((index, _), result) in pending.iter().zip(results) {
        match result {
            Some(issue) => {
                branches[*index].issue_status = Some(issue.status_name).filter(|s| !s.is_empty());
                summary.resolved += 1;
            }
            None => summary.failed += 1,
        }
    }

    summary
}

fn fetch_logged(client: &StatusClient, key: &str) -> Option<Issue> {
    tracing::debug!("looking up issue {}", key);
    match client.fetch(key) {
        Ok(issue) => issue,
        Err(e) => {
            tracing::debug!("{}", e);
            None
        }
    }
}

/// Run lookups on a pool of `workers` threads, keeping result order
fn fetch_concurrent(
    pending: &[(usize, String)],
    client: &StatusClient,
    workers: usize,
) -> Vec<Option<Issue>> {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!("lookup pool unavailable, looking up sequentially: {}", e);
            return pending
                .iter()
                .map(|(_, key)| fetch_logged(client, key))
                .collect();
        }
    };

    pool.install(|| {
        pending
            .par_iter()
            .map(|(_, key)| fetch_logged(client, key))
            .collect()
    })
}

/// Mark the checked-out branch as protected from deletion
pub fn protect_head(branches: &mut [Branch], head: Option<&str>) {
    let Some(head) = head else {
        return;
    };
    for branch in branches.iter_mut() {
        if branch.reference_name() == head {
            branch.protected = true;
            branch.selected = false;
        }
    }
}

/// Report bucket key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    /// Branches whose tracker status is exactly this label
    Status(String),
    /// Branches with no correlated issue or status
    NoIssue,
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBucket::Status(status) => write!(f, "{}", status),
            StatusBucket::NoIssue => write!(f, "{}", NO_ISSUE_LABEL),
        }
    }
}

/// Branches sharing one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusGroup {
    pub bucket: StatusBucket,
    /// Display names, in listing order
    pub branches: Vec<String>,
}

/// Group branches by exact status, buckets in first-appearance order
pub fn group_by_status(branches: &[Branch]) -> Vec<StatusGroup> {
    let mut groups: Vec<StatusGroup> = Vec::new();

    for branch in branches {
        let bucket = match branch.status() {
            Some(status) => StatusBucket::Status(status.to_string()),
            None => StatusBucket::NoIssue,
        };

        let name = branch.display_name().to_string();
        match groups.iter_mut().find(|g| g.bucket == bucket) {
            Some(group) => group.branches.push(name),
            None => groups.push(StatusGroup {
                bucket,
                branches: vec![name],
            }),
        }
    }

    groups
}

//! Entry points used by the CLI
//!
//! Phases run strictly in order: list, reconcile, select, delete. Each phase
//! finishes before the next starts, and nothing is mutated before selection
//! has completed without an abort.

use serde::Serialize;

use crate::branch::Branch;
use crate::committer::{self, DeletionReport};
use crate::config::Config;
use crate::error::GiraError;
use crate::extractor::IssuePattern;
use crate::reconcile::{self, ReconcileSummary, StatusGroup};
use crate::repository::BranchStore;
use crate::selector::{self, SelectionFrontend};
use crate::tracker::StatusClient;

/// Reconciled view model, ready for selection
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub branches: Vec<Branch>,
    pub summary: ReconcileSummary,
}

/// Final state of an interactive cleanup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub cancelled: bool,
    pub report: DeletionReport,
    pub summary: ReconcileSummary,
}

/// Status-grouped view returned by [`run_report`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub groups: Vec<StatusGroup>,
    pub summary: ReconcileSummary,
}

/// Compile the pattern and authenticate, surfacing startup errors
pub fn connect(config: &Config) -> Result<(IssuePattern, StatusClient), GiraError> {
    let pattern = IssuePattern::compile(&config.jira_issue_pattern)?;
    let client = StatusClient::connect(config)?;
    Ok((pattern, client))
}

/// List local branches and enrich them with tracker state
pub fn reconcile_repository(
    config: &Config,
    store: &dyn BranchStore,
    pattern: &IssuePattern,
    client: &StatusClient,
) -> Result<Reconciled, GiraError> {
    let mut branches = Branch::from_references(store.list_local_branch_references()?);
    tracing::debug!("found {} local branches", branches.len());

    let summary = reconcile::reconcile(&mut branches, pattern, client, config.lookup_workers);

    if config.protect_head {
        let head = store.head_reference()?;
        reconcile::protect_head(&mut branches, head.as_deref());
    }

    Ok(Reconciled { branches, summary })
}

/// Let the user pick branches, then delete them unless they aborted
pub fn select_and_commit(
    mut reconciled: Reconciled,
    store: &dyn BranchStore,
    frontend: &mut dyn SelectionFrontend,
) -> Result<CleanupOutcome, GiraError> {
    let cancelled = selector::run(&mut reconciled.branches, frontend)?;
    let targets = selector::selected_references(&reconciled.branches, cancelled);

    let report = if cancelled {
        tracing::info!("selection aborted, no branches deleted");
        DeletionReport::default()
    } else {
        committer::commit(store, &targets)?
    };

    Ok(CleanupOutcome {
        cancelled,
        report,
        summary: reconciled.summary,
    })
}

/// Full interactive run: reconcile, select, delete
pub fn run_cleanup(
    config: &Config,
    store: &dyn BranchStore,
    frontend: &mut dyn SelectionFrontend,
) -> Result<CleanupOutcome, GiraError> {
    let (pattern, client) = connect(config)?;
    run_cleanup_with(config, store, &pattern, &client, frontend)
}

/// [`run_cleanup`] with an already connected tracker
pub fn run_cleanup_with(
    config: &Config,
    store: &dyn BranchStore,
    pattern: &IssuePattern,
    client: &StatusClient,
    frontend: &mut dyn SelectionFrontend,
) -> Result<CleanupOutcome, GiraError> {
    let reconciled = reconcile_repository(config, store, pattern, client)?;
    select_and_commit(reconciled, store, frontend)
}

/// Non-interactive report: branches grouped by status, nothing mutated
pub fn run_report(config: &Config, store: &dyn BranchStore) -> Result<StatusReport, GiraError> {
    let (pattern, client) = connect(config)?;
    let reconciled = reconcile_repository(config, store, &pattern, &client)?;
    Ok(StatusReport {
        groups: reconcile::group_by_status(&reconciled.branches),
        summary: reconciled.summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_invalid_pattern_before_tracker() {
        let config = Config {
            jira_issue_pattern: "JIRA-(".to_string(),
            jira_url: "http://127.0.0.1:9".to_string(),
            jira_user: "u".to_string(),
            jira_token: "t".to_string(),
            ..Config::default()
        };
        let err = connect(&config).unwrap_err();
        assert!(matches!(err, GiraError::InvalidPattern { .. }));
    }

    #[test]
    fn test_connect_without_tracker() {
        let (pattern, client) = connect(&Config::default()).unwrap();
        assert!(!pattern.is_enabled());
        assert!(!client.is_enabled());
    }
}

//! gira-core: branch/issue reconciliation, selection, and deletion
//!
//! This crate holds everything except terminal I/O. The `gira` binary
//! supplies a crossterm frontend for [`selector::SelectionFrontend`].

/// Core error types for gira operations
pub mod error;

/// Configuration handling
pub mod config;

/// Branch view model
pub mod branch;

/// Issue key extraction
pub mod extractor;

/// Issue tracker client
pub mod tracker;

/// Reconciliation and status grouping
pub mod reconcile;

/// Interactive selection state machine
pub mod selector;

/// Deletion of selected branches
pub mod committer;

/// Branch store seam and git CLI implementation
pub mod repository;

/// Entry points combining the phases
pub mod pipeline;

// Re-exports for convenience
pub use branch::{Branch, LOCAL_BRANCH_PREFIX, display_name};
pub use committer::DeletionReport;
pub use config::Config;
pub use error::GiraError;
pub use extractor::IssuePattern;
pub use pipeline::{CleanupOutcome, Reconciled, StatusReport, run_cleanup, run_report};
pub use reconcile::{ReconcileSummary, StatusBucket, StatusGroup, group_by_status};
pub use repository::{BranchStore, GitCliStore};
pub use selector::{
    RowView, ScriptedInput, Selection, SelectionFrontend, SelectionOutcome, SelectorEvent,
    StatusTone,
};
pub use tracker::{Issue, IssueTracker, JiraTracker, StatusClient};

//! JSON output formatting

use serde::Serialize;

use gira_core::{DeletionReport, GiraError, ReconcileSummary, StatusGroup};

const SCHEMA_VERSION: &str = "1";

/// JSON response envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonResponse<T> {
    /// Schema version for forward compatibility
    pub schema_version: String,
    /// Command that generated this response
    pub command: String,
    /// Status: "ok", "cancelled", or "error"
    pub status: String,
    /// Command-specific payload
    pub data: T,
    /// Errors and warnings
    pub issues: Vec<JsonIssue>,
}

impl<T> JsonResponse<T> {
    fn with_status(command: &str, status: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: status.to_string(),
            data,
            issues,
        }
    }

    /// Create a successful response
    pub fn ok(command: &str, data: T) -> Self {
        Self::with_status(command, "ok", data, vec![])
    }

    /// Create a response for a selection the user aborted
    pub fn cancelled(command: &str, data: T) -> Self {
        Self::with_status(command, "cancelled", data, vec![])
    }

    /// Create an error response
    pub fn error(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self::with_status(command, "error", data, issues)
    }
}

impl<T: Serialize> JsonResponse<T> {
    /// Print the response to stdout
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: failed to serialize response: {}", e),
        }
    }
}

/// Issue object structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonIssue {
    /// Error code (e.g., "E001")
    pub code: String,
    /// Severity level
    pub severity: String,
    /// Human-readable message
    pub message: String,
    /// Branch the issue concerns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl From<&GiraError> for JsonIssue {
    fn from(err: &GiraError) -> Self {
        let branch = match err {
            GiraError::BranchRemoval { branch, .. } => Some(branch.clone()),
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            severity: "error".to_string(),
            message: err.to_string(),
            branch,
        }
    }
}

/// Data payload for report command
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportData {
    /// Branches grouped by issue status
    pub groups: Vec<StatusGroup>,
    /// Lookup counts
    pub summary: ReconcileSummary,
}

/// Data payload for delete command
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteData {
    /// Whether the user aborted the selection
    pub cancelled: bool,
    /// Removed branches
    pub report: DeletionReport,
    /// Lookup counts
    pub summary: ReconcileSummary,
}

impl DeleteData {
    /// Payload for a failed run, keeping removals that already happened
    pub fn from_error(err: &GiraError) -> Self {
        let deleted = match err {
            GiraError::BranchRemoval { deleted, .. } => deleted.clone(),
            _ => Vec::new(),
        };
        Self {
            report: DeletionReport { deleted },
            ..Self::default()
        }
    }
}

/// Report a failed command and return its exit code
pub fn report_error<T: Serialize>(command: &str, data: T, err: &GiraError, json_output: bool) -> i32 {
    if json_output {
        JsonResponse::error(command, data, vec![JsonIssue::from(err)]).print();
    } else {
        eprintln!("error: {}", err);
    }
    err.exit_code()
}

//! Error types for gira operations

use thiserror::Error;

/// Core error type for gira operations
#[derive(Error, Debug)]
pub enum GiraError {
    // === Startup errors (E001-E006) ===
    /// E001: Current directory is not inside a git repository
    #[error("E001: not a git repository (or git is not installed)")]
    NotAGitRepository,

    /// E002: Working directory could not be resolved
    #[error("E002: could not resolve the working directory: {0}")]
    WorkingDirectory(String),

    /// E003: Issue key pattern does not compile
    #[error("E003: invalid issue key pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// E004: Configuration error
    #[error("E004: configuration error: {0}")]
    Config(String),

    /// E005: Tracker rejected credentials or could not be reached at startup
    #[error("E005: tracker authentication failed: {reason}")]
    TrackerAuth { reason: String },

    /// E006: Git command failed
    #[error("E006: git command failed: {0}")]
    Git(String),

    // === Per-item errors (E010) ===
    /// E010: A single issue lookup failed
    #[error("E010: could not fetch issue {key}: {reason}")]
    IssueLookup { key: String, reason: String },

    // === Mutation errors (E020) ===
    /// E020: Removing a branch reference failed
    ///
    /// `deleted` lists the references removed earlier in the same batch;
    /// they stay removed.
    #[error("E020: could not delete branch {branch}: {reason}")]
    BranchRemoval {
        branch: String,
        reason: String,
        deleted: Vec<String>,
    },

    // === Terminal errors (E030-E031) ===
    /// E030: Terminal I/O failed
    #[error("E030: terminal error: {0}")]
    Terminal(String),

    /// E031: Interactive selection needs a terminal
    #[error("E031: interactive selection requires a terminal (try `gira report`)")]
    NonTty,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GiraError {
    /// Get the error code (e.g., "E001", "E020")
    pub fn code(&self) -> &'static str {
        match self {
            GiraError::NotAGitRepository => "E001",
            GiraError::WorkingDirectory(_) => "E002",
            GiraError::InvalidPattern { .. } => "E003",
            GiraError::Config(_) => "E004",
            GiraError::TrackerAuth { .. } => "E005",
            GiraError::Git(_) => "E006",
            GiraError::IssueLookup { .. } => "E010",
            GiraError::BranchRemoval { .. } => "E020",
            GiraError::Terminal(_) => "E030",
            GiraError::NonTty => "E031",
            GiraError::Io(_) => "E002", // Reuse for file errors
        }
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            GiraError::NotAGitRepository | GiraError::WorkingDirectory(_) | GiraError::Io(_) => 2,

            GiraError::InvalidPattern { .. } | GiraError::Config(_) => 4, // Configuration error

            GiraError::TrackerAuth { .. } => 5,

            GiraError::Git(_) | GiraError::IssueLookup { .. } | GiraError::BranchRemoval { .. } => 1,

            GiraError::Terminal(_) | GiraError::NonTty => 3,
        }
    }
}

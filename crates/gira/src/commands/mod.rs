//! CLI command implementations

pub mod delete;
pub mod report;

pub use delete::run_delete;
pub use report::run_report;

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use gira_core::{Config, GiraError, GitCliStore};

use crate::cli::LookupArgs;
use crate::colors::COLORS;

/// Resolve the working directory, then load configuration and open the repository
fn load_context(lookup: &LookupArgs) -> Result<(Config, GitCliStore), GiraError> {
    let working_dir =
        std::env::current_dir().map_err(|e| GiraError::WorkingDirectory(e.to_string()))?;

    let mut config = Config::load(&working_dir)?;
    if let Some(pattern) = &lookup.pattern {
        config.jira_issue_pattern = pattern.clone();
    }
    if let Some(workers) = lookup.workers {
        config.lookup_workers = workers.max(1);
    }
    tracing::debug!("{:?}", config);

    let store = GitCliStore::open(&working_dir)?;
    tracing::debug!("repository root: {}", store.repo_root().display());

    Ok((config, store))
}

/// Spinner on stderr while issues are looked up; hidden when quiet
fn start_spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg} [{elapsed}]")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Warn about failed lookups on stderr, once the spinner is gone
///
/// Each failure is logged at debug level; `--verbose` shows them.
fn warn_failed_lookups(failed: usize, quiet: bool) {
    if failed == 0 || quiet {
        return;
    }
    let noun = if failed == 1 { "lookup" } else { "lookups" };
    let message = format!(
        "warning: {} issue {} failed, status left empty (use --verbose for details)",
        failed, noun
    );
    if std::io::stderr().is_terminal() {
        eprintln!("{}", message.style(COLORS.warning));
    } else {
        eprintln!("{}", message);
    }
}

//! Implementation of the `gira delete` command

use owo_colors::OwoColorize;

use gira_core::pipeline::{self, CleanupOutcome};
use gira_core::{GiraError, display_name};

use crate::cli::LookupArgs;
use crate::colors::COLORS;
use crate::output::{DeleteData, JsonResponse, report_error};
use crate::terminal::{self, TerminalFrontend};

/// Run the delete command
///
/// Exit codes: 0 on success, 1 when the selection was aborted or a
/// deletion failed, and the error's own code for startup failures.
pub fn run_delete(
    lookup: LookupArgs,
    allow_head: bool,
    json_output: bool,
    quiet: bool,
) -> Result<i32, String> {
    match delete(&lookup, allow_head, quiet) {
        Ok(outcome) => Ok(print_outcome(outcome, json_output, quiet)),
        Err(e) => {
            let data = DeleteData::from_error(&e);
            // Removals before a failed one are not rolled back
            if !json_output && !quiet {
                print_deleted(&data.report.deleted);
            }
            Ok(report_error("delete", data, &e, json_output))
        }
    }
}

fn delete(lookup: &LookupArgs, allow_head: bool, quiet: bool) -> Result<CleanupOutcome, GiraError> {
    let (mut config, store) = super::load_context(lookup)?;
    if allow_head {
        config.protect_head = false;
    }

    // Fail before any network traffic when there is nobody to ask
    if !terminal::is_interactive() {
        return Err(GiraError::NonTty);
    }

    let (pattern, client) = pipeline::connect(&config)?;

    let spinner = super::start_spinner("Looking up issues", quiet || !client.is_enabled());
    let reconciled = pipeline::reconcile_repository(&config, &store, &pattern, &client);
    spinner.finish_and_clear();
    let reconciled = reconciled?;

    super::warn_failed_lookups(reconciled.summary.failed, quiet);

    if reconciled.branches.is_empty() {
        return Ok(CleanupOutcome {
            cancelled: false,
            report: Default::default(),
            summary: reconciled.summary,
        });
    }

    // Terminal is restored before anything is printed
    let mut frontend = TerminalFrontend::enter()?;
    let outcome = pipeline::select_and_commit(reconciled, &store, &mut frontend);
    drop(frontend);
    outcome
}

fn print_deleted(references: &[String]) {
    for reference in references {
        println!("{} {}", "Deleted".style(COLORS.success), display_name(reference));
    }
}

fn print_outcome(outcome: CleanupOutcome, json_output: bool, quiet: bool) -> i32 {
    let exit_code = if outcome.cancelled { 1 } else { 0 };

    if json_output {
        let data = DeleteData {
            cancelled: outcome.cancelled,
            report: outcome.report,
            summary: outcome.summary,
        };
        if data.cancelled {
            JsonResponse::cancelled("delete", data).print();
        } else {
            JsonResponse::ok("delete", data).print();
        }
        return exit_code;
    }

    if quiet {
        return exit_code;
    }

    if outcome.cancelled {
        println!("Cancelled, no branches deleted");
    } else if outcome.report.deleted.is_empty() {
        println!("No branches deleted");
    } else {
        print_deleted(&outcome.report.deleted);
    }

    exit_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use gira_core::{DeletionReport, ReconcileSummary};

    fn outcome(cancelled: bool) -> CleanupOutcome {
        CleanupOutcome {
            cancelled,
            report: DeletionReport {
                deleted: vec!["refs/heads/JIRA-1".to_string()],
            },
            summary: ReconcileSummary::default(),
        }
    }

    #[test]
    fn test_cancelled_exits_one() {
        assert_eq!(print_outcome(outcome(true), false, true), 1);
        assert_eq!(print_outcome(outcome(true), true, false), 1);
    }

    #[test]
    fn test_committed_exits_zero() {
        assert_eq!(print_outcome(outcome(false), false, true), 0);
        assert_eq!(print_outcome(outcome(false), true, false), 0);
    }
}

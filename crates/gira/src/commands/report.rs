//! Implementation of the `gira report` command

use std::io::IsTerminal;

use owo_colors::OwoColorize;

use gira_core::{GiraError, StatusBucket, StatusGroup, StatusReport, StatusTone};

use crate::cli::LookupArgs;
use crate::colors::COLORS;
use crate::output::{JsonResponse, ReportData, report_error};

/// Run the report command
pub fn run_report(lookup: LookupArgs, json_output: bool, quiet: bool) -> Result<i32, String> {
    let StatusReport { groups, summary } = match report(&lookup, quiet) {
        Ok(report) => report,
        Err(e) => return Ok(report_error("report", ReportData::default(), &e, json_output)),
    };

    if json_output {
        JsonResponse::ok("report", ReportData { groups, summary }).print();
        return Ok(0);
    }

    super::warn_failed_lookups(summary.failed, quiet);
    if !quiet {
        if groups.is_empty() {
            println!("No local branches");
        } else {
            print!("{}", render_groups(&groups, std::io::stdout().is_terminal()));
        }
    }

    Ok(0)
}

fn report(lookup: &LookupArgs, quiet: bool) -> Result<StatusReport, GiraError> {
    let (config, store) = super::load_context(lookup)?;

    let spinner = super::start_spinner("Looking up issues", quiet || !config.tracker_capable());
    let report = gira_core::run_report(&config, &store);
    spinner.finish_and_clear();

    report
}

/// One heading per bucket, underlined, followed by its branches
fn render_groups(groups: &[StatusGroup], styled: bool) -> String {
    let mut out = String::new();

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let heading = group.bucket.to_string();
        let underline = "-".repeat(heading.chars().count());
        if styled {
            let style = match &group.bucket {
                StatusBucket::Status(status) => COLORS.for_tone(StatusTone::of(Some(status))),
                StatusBucket::NoIssue => COLORS.muted,
            };
            out.push_str(&format!("{}\n", heading.style(style).bold()));
        } else {
            out.push_str(&format!("{}\n", heading));
        }
        out.push_str(&underline);
        out.push('\n');

        for branch in &group.branches {
            out.push_str(&format!("  {}\n", branch));
        }
    }

    out
}

//! CLI argument parsing with clap derive

use clap::{Args, Parser, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// gira - clean up local branches by the state of their Jira issues
#[derive(Parser)]
#[command(name = "gira")]
#[command(version = VERSION)]
#[command(about = "Clean up local git branches by the state of their Jira issues")]
#[command(long_about = "gira lists the local branches of the current repository, looks up the Jira issue each branch name refers to, and lets you pick branches to delete.\n\nConfiguration is read from .gira.toml (current directory, then the user config directory) and GIRA_JIRA_* environment variables:\n  GIRA_JIRA_ISSUE_PATTERN  Regex locating the issue key in a branch name\n  GIRA_JIRA_URL            Jira base URL\n  GIRA_JIRA_USER           Jira username\n  GIRA_JIRA_TOKEN          Jira API token\n\nWithout URL, user, and token, branches are listed without issue status.")]
pub struct Cli {
    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select local branches to delete (default)
    ///
    /// Opens an interactive list of branches with their issue status.
    #[command(long_about = "Select local branches to delete.\n\nKeys:\n  up/down, k/j  Move\n  home/end      First/last branch\n  enter, space  Select or deselect a branch\n  esc           Quit and delete the selected branches\n  ctrl-c        Quit immediately, delete nothing\n\nThe checked-out branch is shown but cannot be selected unless --allow-head is given.")]
    Delete {
        #[command(flatten)]
        lookup: LookupArgs,

        /// Allow selecting the checked-out branch
        #[arg(long)]
        allow_head: bool,
    },

    /// Print branches grouped by issue status
    ///
    /// Non-interactive; never deletes anything.
    Report {
        #[command(flatten)]
        lookup: LookupArgs,
    },
}

/// Options shared by commands that look up issues
#[derive(Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// Issue key pattern, overriding configuration
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Number of concurrent issue lookups
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,
}

/// Get the command args for use in the application
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["gira"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_delete_flags() {
        let cli = Cli::try_parse_from([
            "gira",
            "delete",
            "--pattern",
            r"ABC-\d+",
            "--workers",
            "4",
            "--allow-head",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Delete { lookup, allow_head }) => {
                assert_eq!(lookup.pattern.as_deref(), Some(r"ABC-\d+"));
                assert_eq!(lookup.workers, Some(4));
                assert!(allow_head);
            }
            _ => panic!("expected delete command"),
        }
    }

    #[test]
    fn test_report_accepts_global_json() {
        let cli = Cli::try_parse_from(["gira", "report", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Report { .. })));
    }
}

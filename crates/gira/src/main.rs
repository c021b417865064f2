//! gira CLI - clean up local branches by the state of their Jira issues

mod cli;
mod colors;
mod commands;
mod logging;
mod output;
mod terminal;

use std::process::ExitCode;

use cli::Commands;

fn main() -> ExitCode {
    let cli = cli::parse();

    logging::init(cli.verbose);

    let result = match cli.command {
        Some(Commands::Delete { lookup, allow_head }) => {
            commands::run_delete(lookup, allow_head, cli.json, cli.quiet)
        }
        Some(Commands::Report { lookup }) => commands::run_report(lookup, cli.json, cli.quiet),
        // Bare `gira` deletes
        None => commands::run_delete(cli::LookupArgs::default(), false, cli.json, cli.quiet),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

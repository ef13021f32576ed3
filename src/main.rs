use clap::Parser;
use git_issue::cli::commands::{self, Workspace, WorkspaceOptions};
use git_issue::cli::{Cli, Commands};
use git_issue::config;
use git_issue::logging::init_logging;
use git_issue::{IssueError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, None) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = run(&cli);

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

fn run(cli: &Cli) -> git_issue::Result<()> {
    match &cli.command {
        Commands::Version => return commands::version::execute(cli.json),
        Commands::Completions(args) => return commands::completions::execute(args),
        _ => {}
    }

    let ws = Workspace::open(&build_workspace_options(cli))?;
    match &cli.command {
        Commands::Create(args) => commands::create::execute(args, &ws),
        Commands::List(args) => commands::list::execute(args, &ws),
        Commands::Show(args) => commands::show::execute(args, &ws),
        Commands::Edit(args) => commands::edit::execute(args, &ws),
        Commands::Close(args) => commands::close::execute(args, &ws),
        Commands::Reopen(args) => commands::reopen::execute(args, &ws),
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &IssueError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_workspace_options(cli: &Cli) -> WorkspaceOptions {
    WorkspaceOptions {
        directory: cli.directory.clone(),
        json: cli.json,
        quiet: cli.quiet,
        no_pager: cli.no_pager,
        overrides: config::CliOverrides {
            notes_ref: cli.notes_ref.clone(),
            no_color: Some(cli.no_color),
        },
    }
}

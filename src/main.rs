//! TickTrack CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use tt::cli::commands::{self, App};
use tt::cli::{Cli, Commands, render};
use tt::config::Settings;
use tt::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout (the shell is always human)
    let json = !matches!(cli.command, Commands::Shell)
        && (cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout()));

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                render::error(&e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    match &cli.command {
        Commands::Version => return commands::version::execute(cli.no_latency, json),
        Commands::Completions { shell } => return commands::completions::execute(shell),
        _ => {}
    }

    let settings = Settings::resolve(cli.home.as_deref(), cli.no_latency, cli.ephemeral)?;
    let mut app = App::open(settings);

    match &cli.command {
        // Session
        Commands::Login(args) => commands::auth::execute_login(&mut app, args, json),
        Commands::Logout => commands::auth::execute_logout(&mut app, json),
        Commands::Whoami => commands::auth::execute_whoami(&app, json),

        // Timesheets
        Commands::List => commands::timesheet::execute_list(&app, json),
        Commands::Show { week } => commands::timesheet::execute_show(&app, week, json),
        Commands::Create { week } => {
            commands::timesheet::execute_create(&app, week.as_deref(), json)
        }

        // Navigation
        Commands::Open { path } => commands::open::execute(&app, path, json),
        Commands::Shell => commands::shell::execute(&mut app),

        Commands::Version | Commands::Completions { .. } => Ok(()),
    }
}

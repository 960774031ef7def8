//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod render;

/// TickTrack - weekly timesheets from the terminal
#[derive(Parser, Debug)]
#[command(name = "tt", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.ticktrack)
    #[arg(long, global = true, env = "TT_HOME")]
    pub home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip the simulated backend latency
    #[arg(
        long,
        global = true,
        env = "TT_NO_LATENCY",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_latency: bool,

    /// Keep the session token in memory only (nothing written to disk)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in
    Login(LoginArgs),

    /// Sign out and forget the stored token
    Logout,

    /// Show who is signed in
    Whoami,

    /// Show the weekly timesheets (dashboard)
    List,

    /// Show one week's timesheet
    Show {
        /// Week number, starting at 1
        week: String,
    },

    /// Add a new, empty week
    Create {
        /// Week number (default: the week after the latest one)
        week: Option<String>,
    },

    /// Navigate to an application path, e.g. /dashboard or /timesheet/3
    Open {
        path: String,
    },

    /// Interactive session for editing timesheets
    Shell,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,

    /// Stay signed in across terminals and restarts
    #[arg(long, short)]
    pub remember: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Interactive shell commands
// ============================================================================

/// One line typed into `tt shell`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true, name = "tt-shell")]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Sign in
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,

    /// Show the dashboard
    #[command(alias = "ls")]
    List,

    /// Open a week for editing
    Open {
        /// Week number
        week: String,
    },

    /// Create the next week and open it
    New,

    /// Add an empty task row to a day (mon, tuesday, 3, fri-5, ...)
    Add {
        day: String,
    },

    /// Set a row's description
    Desc {
        row: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Set a row's hours
    Hours {
        row: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Finish editing a row
    Done {
        row: String,
    },

    /// Toggle edit mode on a row
    Edit {
        row: String,
    },

    /// Delete a row
    #[command(alias = "del")]
    Rm {
        row: String,
    },

    /// Save the open week
    Save,

    /// Reprint the open week
    Show,

    /// Close the open week and return to the dashboard
    Back,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

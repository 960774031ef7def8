//! Interactive shell: sign in, open a week, edit rows, save.
//!
//! The backend lives for as long as the shell does, so saved weeks and
//! created weeks are visible to later commands in the same shell.

use std::io::{self, BufRead, IsTerminal, Write};

use clap::Parser;
use colored::Colorize;
use tokio::runtime::Runtime;
use tracing::debug;

use super::{App, runtime};
use crate::api::TimesheetApi;
use crate::cli::{ShellCommand, ShellLine, render};
use crate::editor::TimesheetEditor;
use crate::error::{Error, Result};
use crate::model::Week;
use crate::session::{Route, TokenScope};
use crate::validate::{normalize_day, parse_row};

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State that outlives a single shell line.
#[derive(Default)]
pub struct ShellSession {
    editor: Option<TimesheetEditor>,
}

impl ShellSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The week currently open, if any.
    #[must_use]
    pub const fn editor(&self) -> Option<&TimesheetEditor> {
        self.editor.as_ref()
    }

    fn editor_mut(&mut self) -> Result<&mut TimesheetEditor> {
        self.editor.as_mut().ok_or_else(|| {
            Error::InvalidArgument("no week is open; use `open <week>` first".to_string())
        })
    }

    /// Run one parsed command.
    ///
    /// # Errors
    ///
    /// Returns whatever the command fails with; the shell reports it and
    /// keeps going.
    pub fn dispatch(&mut self, app: &mut App, rt: &Runtime, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Login(args) => {
                let scope = TokenScope::from_remember(args.remember);
                let user = rt.block_on(app.gate.authenticate(
                    &app.api,
                    &args.email,
                    &args.password,
                    scope,
                ))?;
                println!("{} Signed in as {}", "✓".green(), user.name.bold());
            }
            ShellCommand::Logout => {
                rt.block_on(app.gate.end_session(&app.api))?;
                self.editor = None;
                println!("Signed out");
            }
            ShellCommand::Whoami => match app.gate.user() {
                Some(user) => println!("{} <{}>", user.name.bold(), user.email),
                None => println!("Not signed in"),
            },
            ShellCommand::List => {
                app.guard(Route::Dashboard)?;
                let list = rt.block_on(app.api.list_timesheets())?;
                render::dashboard(app.gate.user(), &list.timesheets);
            }
            ShellCommand::Open { week } => {
                let week: Week = week.parse()?;
                self.load(app, rt, week)?;
                self.show()?;
            }
            ShellCommand::New => {
                app.guard(Route::Dashboard)?;
                let week = rt.block_on(app.api.next_week())?;
                let created = rt.block_on(app.api.create_timesheet(week))?;
                println!("{} Created week {}", "✓".green(), created.timesheet.week);
                self.load(app, rt, week)?;
                self.show()?;
            }
            ShellCommand::Add { day } => {
                let editor = self.editor_mut()?;
                let days: Vec<_> = editor.days.iter().map(|slot| slot.day.clone()).collect();
                let key = normalize_day(&day, &days)?;
                let row = editor.add_task(&key)?;
                println!(
                    "Added row {} on {key}; fill it with `desc {0} <text>` and `hours {0} <n>`",
                    row + 1
                );
            }
            ShellCommand::Desc { row, text } => {
                let row = parse_row(&row)?;
                self.editor_mut()?.set_description(row, &text.join(" "))?;
            }
            ShellCommand::Hours { row, value } => {
                let row = parse_row(&row)?;
                self.editor_mut()?.set_hours(row, &value)?;
            }
            ShellCommand::Done { row } => {
                let row = parse_row(&row)?;
                self.editor_mut()?.save_row(row)?;
                println!("Task saved");
            }
            ShellCommand::Edit { row } => {
                let n = parse_row(&row)?;
                let editing = self.editor_mut()?.toggle_edit(n)?;
                if editing {
                    println!("Editing row {row}");
                } else {
                    println!("Row {row} closed");
                }
            }
            ShellCommand::Rm { row } => {
                let row = parse_row(&row)?;
                self.editor_mut()?.delete(row)?;
                println!("Task deleted");
            }
            ShellCommand::Save => {
                let (week, tasks) = {
                    let editor = self.editor_mut()?;
                    (editor.week(), editor.to_week_tasks())
                };
                app.guard(Route::Timesheet(week))?;
                let saved = rt.block_on(app.api.save_tasks(week, tasks))?;
                println!("{} {}", "✓".green(), saved.message);
                self.load(app, rt, week)?;
                self.show()?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Back => {
                self.editor = None;
                app.guard(Route::Dashboard)?;
                let list = rt.block_on(app.api.list_timesheets())?;
                render::dashboard(app.gate.user(), &list.timesheets);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, app: &App, rt: &Runtime, week: Week) -> Result<()> {
        app.guard(Route::Timesheet(week))?;
        let detail = rt.block_on(app.api.get_timesheet(week))?;
        debug!(week = week.get(), "Opened week");
        self.editor = Some(TimesheetEditor::new(detail.timesheet, detail.tasks));
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        render::week_page(self.editor_mut()?);
        Ok(())
    }
}

/// Split a line into words. Single or double quotes group words.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::InvalidArgument("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if the runtime cannot start or stdin fails.
pub fn execute(app: &mut App) -> Result<()> {
    let rt = runtime()?;
    let interactive = io::stdin().is_terminal();
    let mut session = ShellSession::new();

    if interactive {
        println!("{} Type `help` for commands, `quit` to leave.", "TickTrack shell.".bold());
        if !app.gate.is_authenticated() {
            println!("{}", "Not signed in: login <email> <password>".dimmed());
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        if interactive {
            print!("tt> ");
            io::stdout().flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let words = match tokenize(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                render::error(&e);
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        match session.dispatch(app, &rt, parsed.command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => render::error(&e),
        }
    }

    Ok(())
}

//! Path navigation: `tt open /timesheet/3`.

use colored::Colorize;
use serde::Serialize;

use super::{App, timesheet};
use crate::error::Result;
use crate::session::Route;

#[derive(Serialize)]
struct PageOutput<'a> {
    route: &'a Route,
    authenticated: bool,
}

/// Navigate to a path and render whatever page the session gate allows.
///
/// # Errors
///
/// Returns `RouteNotFound` for unknown paths, `NotAuthenticated` for
/// protected pages while signed out, or the error of the rendered page.
pub fn execute(app: &App, path: &str, json: bool) -> Result<()> {
    let requested = Route::parse(path);
    let target = app.guard(requested.clone())?;
    if target != requested && !json {
        eprintln!("{}", format!("Redirected to {target}").dimmed());
    }

    match target {
        Route::Dashboard => timesheet::execute_list(app, json),
        Route::Timesheet(week) => timesheet::show_week(app, week, json),
        Route::Landing | Route::Login => {
            if json {
                let output = PageOutput {
                    route: &target,
                    authenticated: app.gate.is_authenticated(),
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if target == Route::Login {
                println!("Sign in with: tt login <email> <password> [--remember]");
            } else {
                println!("{}", "TickTrack".bold());
                println!("Weekly timesheets. Sign in with `tt login`, then `tt list`.");
            }
            Ok(())
        }
        Route::NotFound(path) => Err(crate::error::Error::RouteNotFound { path }),
    }
}

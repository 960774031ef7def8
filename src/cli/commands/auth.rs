//! Sign-in commands: login, logout, whoami.

use colored::Colorize;
use serde::Serialize;

use super::{App, runtime};
use crate::cli::LoginArgs;
use crate::error::Result;
use crate::model::UserProfile;
use crate::session::{Route, SessionState, TokenScope};

#[derive(Serialize)]
struct LoginOutput<'a> {
    user: &'a UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<TokenScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,
}

#[derive(Serialize)]
struct LogoutOutput {
    signed_out: bool,
}

/// Sign in and store the token in the requested scope.
///
/// # Errors
///
/// Returns `RequiredField` for blank input, `InvalidCredentials` on a
/// mismatch, or the transport/token store error.
pub fn execute_login(app: &mut App, args: &LoginArgs, json: bool) -> Result<()> {
    // The login page is not shown to a signed-in user.
    let target = app.guard(Route::Login)?;
    if let (Route::Dashboard, Some(user)) = (&target, app.gate.user()) {
        if json {
            let output = LoginOutput {
                user,
                scope: None,
                redirect: Some(target.path()),
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("Already signed in as {} <{}>", user.name.bold(), user.email);
            println!("  {}", "Run `tt logout` first to switch accounts".dimmed());
        }
        return Ok(());
    }

    let scope = TokenScope::from_remember(args.remember);
    let rt = runtime()?;
    let user = rt.block_on(app.gate.authenticate(&app.api, &args.email, &args.password, scope))?;

    if json {
        let output = LoginOutput {
            user: &user,
            scope: Some(scope),
            redirect: None,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{} Signed in as {} <{}>",
            "✓".green(),
            user.name.bold(),
            user.email
        );
        if scope == TokenScope::Session {
            println!("  {}", "Session lasts for this terminal only (use --remember to stay signed in)".dimmed());
        }
    }
    Ok(())
}

/// Sign out. Succeeds even when nobody is signed in.
///
/// # Errors
///
/// Returns an error if the stored token cannot be removed.
pub fn execute_logout(app: &mut App, json: bool) -> Result<()> {
    let was_signed_in = app.gate.is_authenticated();
    let rt = runtime()?;
    rt.block_on(app.gate.end_session(&app.api))?;

    if json {
        println!("{}", serde_json::to_string(&LogoutOutput { signed_out: true })?);
    } else if was_signed_in {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

/// Show the restored session.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute_whoami(app: &App, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(app.gate.state())?);
        return Ok(());
    }

    match app.gate.state() {
        SessionState::Authenticated(user) => println!("{} <{}>", user.name.bold(), user.email),
        SessionState::Authenticating | SessionState::Anonymous => println!("Not signed in"),
    }
    Ok(())
}

//! Shared helpers for command handlers.

use std::future::Future;
use std::io::{IsTerminal, Read};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use wifimon_core::{ApiError, CoreError};

use super::Ctx;
use crate::error::CliError;

/// Fail early with `NotLoggedIn` when no token is stored for the profile.
pub fn require_login(ctx: &Ctx<'_>) -> Result<(), CliError> {
    if ctx.client.has_token()? {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn {
            profile: ctx.profile.clone(),
        })
    }
}

/// Run a request behind a spinner on interactive stderr.
pub async fn with_spinner<T, F>(ctx: &Ctx<'_>, message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let bar = (!ctx.global.quiet && std::io::stderr().is_terminal()).then(|| {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });
    let out = fut.await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    out
}

/// Turn a 404 into a `NotFound` naming the resource; pass everything else on.
pub fn found<T>(
    result: Result<T, ApiError>,
    resource_type: &str,
    identifier: i64,
) -> Result<T, CliError> {
    result.map_err(|e| {
        if e.is_not_found() {
            CliError::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.to_string(),
                list_command: format!("{resource_type}s list"),
            }
        } else {
            CoreError::from(e).into()
        }
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use the given email or prompt for one.
pub fn email_or_prompt(email: Option<String>) -> Result<String, CliError> {
    let email = match email {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let email = email.trim().to_owned();
    if email.is_empty() {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "email cannot be empty".into(),
        });
    }
    Ok(email)
}

/// Password from stdin (first line) or an interactive prompt.
pub fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let password = if from_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf.lines().next().unwrap_or_default().to_owned()
    } else {
        rpassword::prompt_password("Password: ").map_err(prompt_err)?
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

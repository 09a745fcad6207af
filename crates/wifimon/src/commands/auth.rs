//! Session command handlers: login, register, logout, whoami.

use wifimon_core::User;
use wifimon_core::present::fmt_timestamp;

use super::{Ctx, util};
use crate::cli::CredentialArgs;
use crate::error::CliError;
use crate::output;

fn user_detail(u: &User) -> String {
    [
        format!("ID:      {}", u.id),
        format!("Email:   {}", u.email),
        format!("Created: {}", fmt_timestamp(u.created_at.as_ref())),
    ]
    .join("\n")
}

pub async fn login(ctx: &Ctx<'_>, args: CredentialArgs) -> Result<(), CliError> {
    let email = util::email_or_prompt(args.email)?;
    let password = util::read_password(args.password_stdin)?;

    util::with_spinner(ctx, "Logging in", ctx.client.login(&email, &password)).await?;
    output::notice(
        &format!("✓ Logged in as {email} (profile '{}')", ctx.profile),
        ctx.global.quiet,
    );
    Ok(())
}

pub async fn register(ctx: &Ctx<'_>, args: CredentialArgs) -> Result<(), CliError> {
    let email = util::email_or_prompt(args.email)?;
    let password = util::read_password(args.password_stdin)?;

    let user = util::with_spinner(
        ctx,
        "Creating account",
        ctx.client.register(&email, &password),
    )
    .await?;
    let out = output::render_single(&ctx.global.output, &user, user_detail, |u| {
        u.id.to_string()
    });
    output::print_output(&out, ctx.global.quiet);
    output::notice("✓ Account created. Run: wifimon login", ctx.global.quiet);
    Ok(())
}

pub fn logout(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let had_token = ctx.client.has_token()?;
    ctx.client.logout()?;
    if had_token {
        output::notice(
            &format!("✓ Logged out of profile '{}'", ctx.profile),
            ctx.global.quiet,
        );
    } else {
        output::notice("Not logged in; nothing to do", ctx.global.quiet);
    }
    Ok(())
}

pub async fn whoami(ctx: &Ctx<'_>) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let user = util::with_spinner(ctx, "Checking session", ctx.client.me()).await?;
    let out = output::render_single(&ctx.global.output, &user, user_detail, |u| {
        u.email.clone()
    });
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

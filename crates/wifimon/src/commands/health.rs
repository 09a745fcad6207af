//! Backend health check.

use super::{Ctx, util};
use crate::error::CliError;
use crate::output;

pub async fn handle(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let health = util::with_spinner(ctx, "Checking backend", ctx.client.health()).await?;
    let url = ctx.client.base_url().to_string();
    let out = output::render_single(
        &ctx.global.output,
        &health,
        |h| format!("API:    {url}\nStatus: {}", h.status),
        |h| h.status.clone(),
    );
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

//! Agent command handlers.

use tabled::Tabled;
use wifimon_core::present::{activity_label, fmt_timestamp};
use wifimon_core::{Agent, AgentsView, RegisteredAgent};

use super::{Ctx, util};
use crate::cli::{AgentsArgs, AgentsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last sync")]
    last_sync: String,
}

impl AgentRow {
    fn new(a: &Agent, color: bool) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            status: output::status_label(activity_label(a.is_active), a.is_active, color),
            last_sync: fmt_timestamp(a.last_sync.as_ref()),
        }
    }
}

fn registered_detail(r: &RegisteredAgent) -> String {
    [
        format!("ID:      {}", r.agent.id),
        format!("Name:    {}", r.agent.name),
        format!("API key: {}", r.api_key),
        String::new(),
        "Save this key now; it will not be shown again.".to_owned(),
    ]
    .join("\n")
}

pub async fn handle(ctx: &Ctx<'_>, args: AgentsArgs) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let global = ctx.global;

    match args.command {
        AgentsCommand::List => {
            let agents =
                util::with_spinner(ctx, "Loading agents", ctx.client.list_agents()).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &agents,
                |a| AgentRow::new(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgentsCommand::Register { name } => {
            // Same form validation as the dashboard.
            let mut view = AgentsView::new();
            view.form.name = name;
            let registered =
                util::with_spinner(ctx, "Registering agent", view.register(&ctx.client)).await?;
            let out = output::render_single(&global.output, &registered, registered_detail, |r| {
                r.api_key.clone()
            });
            // The key is the whole point of this command; print it even with --quiet.
            output::print_output(&out, false);
            Ok(())
        }
    }
}

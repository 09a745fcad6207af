//! Alert command handlers.

use tabled::Tabled;
use wifimon_core::present::fmt_timestamp;
use wifimon_core::{Alert, AlertDraft, AlertHistoryEntry, AlertStatus, CoreError};

use super::{Ctx, util};
use crate::cli::{AlertsArgs, AlertsCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Threshold")]
    threshold: f64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Device")]
    device: String,
}

impl AlertRow {
    fn new(a: &Alert, color: bool) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            threshold: a.threshold,
            status: output::status_label(
                &a.status.to_string(),
                a.status == AlertStatus::Active,
                color,
            ),
            device: a.device_id.map_or_else(|| "all".into(), |d| d.to_string()),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Alert")]
    alert_id: i64,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Value")]
    value: f64,
    #[tabled(rename = "Triggered")]
    triggered: String,
    #[tabled(rename = "Resolved")]
    resolved: String,
}

impl From<&AlertHistoryEntry> for HistoryRow {
    fn from(e: &AlertHistoryEntry) -> Self {
        Self {
            id: e.id,
            alert_id: e.alert_id,
            device: e.device_id.map_or_else(|| "-".into(), |d| d.to_string()),
            value: e.value_at_trigger,
            triggered: fmt_timestamp(e.triggered_at.as_ref()),
            resolved: e
                .resolved_at
                .as_ref()
                .map_or_else(|| "open".into(), |t| fmt_timestamp(Some(t))),
        }
    }
}

fn detail(a: &Alert) -> String {
    [
        format!("ID:          {}", a.id),
        format!("Title:       {}", a.title),
        format!("Description: {}", a.description.as_deref().unwrap_or("-")),
        format!("Threshold:   {}", a.threshold),
        format!("Status:      {}", a.status),
        format!(
            "Device:      {}",
            a.device_id.map_or_else(|| "all".into(), |d| d.to_string())
        ),
        format!("Created:     {}", fmt_timestamp(a.created_at.as_ref())),
    ]
    .join("\n")
}

/// The backend rejects alert types shorter than three characters.
fn check_title(title: &str) -> Result<(), CliError> {
    if title.trim().chars().count() >= 3 {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "title".into(),
            reason: "must be at least 3 characters".into(),
        })
    }
}

fn parse_status(raw: &str) -> Result<AlertStatus, CliError> {
    let status = AlertStatus::from(raw);
    if status.enabled_flag().is_some() {
        Ok(status)
    } else {
        Err(CliError::Validation {
            field: "status".into(),
            reason: format!("unknown status '{raw}'; use active or resolved"),
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Ctx<'_>, args: AlertsArgs) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let global = ctx.global;
    let color = output::should_color(&global.color);

    match args.command {
        AlertsCommand::List => {
            let alerts =
                util::with_spinner(ctx, "Loading alerts", ctx.client.list_alerts()).await?;
            let out = output::render_list(
                &global.output,
                &alerts,
                |a| AlertRow::new(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Get { id } => {
            let alert = util::found(ctx.client.get_alert(id).await, "alert", id)?;
            let out = output::render_single(&global.output, &alert, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Create {
            title,
            threshold,
            description,
            device,
        } => {
            check_title(&title)?;
            let draft = AlertDraft {
                title: Some(title),
                threshold: Some(threshold),
                description,
                device_id: device,
                ..AlertDraft::default()
            };
            let alert = ctx.client.create_alert(&draft).await?;
            let out = output::render_single(&global.output, &alert, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Update {
            id,
            title,
            threshold,
            description,
            status,
            device,
            enabled,
        } => {
            if let Some(ref title) = title {
                check_title(title)?;
            }
            let draft = AlertDraft {
                title,
                threshold,
                description,
                status: status.as_deref().map(parse_status).transpose()?,
                device_id: device,
                is_enabled: enabled,
            };
            if draft == AlertDraft::default() {
                return Err(CoreError::ValidationFailed {
                    message: "nothing to update; pass at least one field".into(),
                }
                .into());
            }
            let alert = util::found(ctx.client.update_alert(id, &draft).await, "alert", id)?;
            let out = output::render_single(&global.output, &alert, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::History { hours } => {
            let entries = util::with_spinner(
                ctx,
                "Loading alert history",
                ctx.client.alert_history(hours.max(1)),
            )
            .await?;
            let out = output::render_list(
                &global.output,
                &entries,
                |e| HistoryRow::from(e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

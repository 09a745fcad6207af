//! Overview: the four stat cards plus the most recent alerts.

use serde::Serialize;
use tabled::Tabled;
use wifimon_core::{Alert, CoreError, OverviewFetch, OverviewView};

use super::{Ctx, util};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Card {
    title: &'static str,
    value: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    cards: Vec<Card>,
    recent_alerts: &'a [Alert],
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Metric")]
    title: &'static str,
    #[tabled(rename = "Value")]
    value: usize,
}

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
}

fn detail(report: &Report<'_>) -> String {
    let cards: Vec<CardRow> = report
        .cards
        .iter()
        .map(|c| CardRow {
            title: c.title,
            value: c.value,
        })
        .collect();
    let mut out = output::render_table(&cards);
    if report.recent_alerts.is_empty() {
        out.push_str("\n\nNo alerts");
    } else {
        let alerts: Vec<AlertRow> = report
            .recent_alerts
            .iter()
            .map(|a| AlertRow {
                id: a.id,
                title: a.title.clone(),
                threshold: a.threshold,
                status: a.status.to_string(),
            })
            .collect();
        out.push_str("\n\nRecent alerts\n");
        out.push_str(&output::render_table(&alerts));
    }
    out
}

pub async fn handle(ctx: &Ctx<'_>) -> Result<(), CliError> {
    util::require_login(ctx)?;

    let fetch = util::with_spinner(ctx, "Loading overview", OverviewFetch::run(&ctx.client)).await;

    // Partial results are still worth showing, a lost session is not.
    let session_lost = [
        fetch.devices.as_ref().err(),
        fetch.agents.as_ref().err(),
        fetch.alerts.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    .any(CoreError::requires_login);
    if session_lost {
        return Err(CoreError::SessionExpired.into());
    }

    let mut view = OverviewView::new();
    view.begin_load();
    view.apply(fetch);

    let report = Report {
        cards: view
            .cards()
            .iter()
            .map(|c| Card {
                title: c.title(),
                value: c.value,
            })
            .collect(),
        recent_alerts: view.recent_alerts(),
    };
    let out = output::render_single(&ctx.global.output, &report, detail, |r| {
        r.cards
            .iter()
            .map(|c| format!("{}={}", c.title, c.value))
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

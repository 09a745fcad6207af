//! Overview screen: stat cards, device table and the latest alerts.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use wifimon_core::present::{DeviceIcon, StatCard, activity_label};
use wifimon_core::{AlertStatus, ApiClient, CoreError, OverviewFetch, OverviewView, format_cap};

use crate::action::{Action, Loaded, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets;

pub struct OverviewScreen {
    client: ApiClient,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    view: OverviewView,
    throbber_state: ThrobberState,
}

impl OverviewScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            action_tx: None,
            focused: false,
            view: OverviewView::new(),
            throbber_state: ThrobberState::default(),
        }
    }

    fn refresh(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.view.begin_load();
        let client = self.client.clone();
        tokio::spawn(async move {
            let fetch = OverviewFetch::run(&client).await;
            let _ = tx.send(Action::Loaded(Loaded::Overview(fetch)));
        });
    }

    fn render_card(frame: &mut Frame, area: Rect, card: StatCard) {
        let color = theme::card_accent(card);
        let block = widgets::panel(Line::from(format!(" {} ", card.title())), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                card.value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            inner,
        );
    }

    fn render_devices(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Device", "MAC", "IP", "Status", "Cap"]).style(theme::table_header());
        let rows = self.view.devices().iter().map(|d| {
            Row::new(vec![
                Cell::from(format!("{} {}", DeviceIcon::for_device(d).glyph(), d.display_name())),
                Cell::from(Span::styled(d.mac_address.clone(), theme::mac())),
                Cell::from(d.ip_address.clone().unwrap_or_else(|| "-".into())),
                Cell::from(Span::styled(
                    activity_label(d.is_active),
                    theme::status(d.is_active),
                )),
                Cell::from(format_cap(d.data_cap)),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(2),
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(9),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .block(widgets::panel(Line::from(" Devices "), self.focused));
        frame.render_widget(table, area);
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.view.recent_alerts().is_empty() {
            vec![Line::from(Span::styled("  No alerts", theme::key_hint()))]
        } else {
            self.view
                .recent_alerts()
                .iter()
                .map(|a| {
                    let active = a.status == AlertStatus::Active;
                    Line::from(vec![
                        Span::styled(
                            if active { " ● " } else { " ○ " },
                            theme::alert_status(&a.status),
                        ),
                        Span::styled(a.title.clone(), theme::table_row()),
                        Span::styled(format!("  {} MB/s", a.threshold), theme::key_hint()),
                    ])
                })
                .collect()
        };
        frame.render_widget(
            Paragraph::new(lines).block(widgets::panel(Line::from(" Recent Alerts "), false)),
            area,
        );
    }
}

/// One toast for however many parts of the overview failed.
fn overview_failures(fetch: &OverviewFetch) -> Option<Action> {
    fn failed<T>(name: &'static str, r: &Result<T, CoreError>) -> Option<&'static str> {
        r.as_ref().err().filter(|e| !e.requires_login()).map(|_| name)
    }
    let parts: Vec<&str> = [
        failed("devices", &fetch.devices),
        failed("agents", &fetch.agents),
        failed("alerts", &fetch.alerts),
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.is_empty() {
        return None;
    }
    Some(Action::Notify(Notification::warning(format!(
        "Could not load {}",
        parts.join(", ")
    ))))
}

impl Component for OverviewScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => self.refresh(),
            Action::Tick if self.view.is_loading() => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn receive(&mut self, loaded: Loaded) -> Result<Option<Action>> {
        let Loaded::Overview(fetch) = loaded else {
            return Ok(None);
        };
        let notice = overview_failures(&fetch);
        self.view.apply(fetch);
        Ok(notice)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(5),
        ])
        .split(area);

        if self.view.is_loading() {
            widgets::render_loading(frame, layout[0], "Loading overview...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(" Overview", theme::title_style())),
                layout[0],
            );
        }

        let card_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(layout[1]);
        for (card, card_area) in self.view.cards().into_iter().zip(card_areas.iter()) {
            Self::render_card(frame, *card_area, card);
        }

        let body =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(layout[2]);
        self.render_devices(frame, body[0]);
        self.render_alerts(frame, body[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "overview"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::screens::test_client;

    fn fetch(agents: Result<Vec<wifimon_core::Agent>, CoreError>) -> OverviewFetch {
        OverviewFetch {
            devices: Ok(vec![
                serde_json::from_value(json!({ "id": 1, "mac_address": "aa", "is_active": true }))
                    .unwrap(),
            ]),
            agents,
            alerts: Ok(vec![]),
        }
    }

    #[test]
    fn failed_part_is_announced_and_others_still_count() {
        let mut screen = OverviewScreen::new(test_client());
        let notice = screen
            .receive(Loaded::Overview(fetch(Err(CoreError::Internal("boom".into())))))
            .unwrap();

        match notice {
            Some(Action::Notify(n)) => assert_eq!(n.message, "Could not load agents"),
            other => panic!("expected a toast, got {other:?}"),
        }
        let values: Vec<usize> = screen.view.cards().iter().map(|c| c.value).collect();
        assert_eq!(values, vec![1, 1, 0, 0]);
    }

    #[test]
    fn expired_session_is_left_to_the_app() {
        let mut screen = OverviewScreen::new(test_client());
        let notice = screen
            .receive(Loaded::Overview(fetch(Err(CoreError::SessionExpired))))
            .unwrap();
        assert!(notice.is_none());
    }
}

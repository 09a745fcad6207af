//! Alerts screen: configured threshold rules with a detail panel.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState, Wrap};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use wifimon_core::present::fmt_timestamp;
use wifimon_core::{Alert, AlertStatus, AlertsView, ApiClient, CoreError};

use crate::action::{Action, Loaded, failure_notice};
use crate::component::Component;
use crate::theme;
use crate::widgets;

pub struct AlertsScreen {
    client: ApiClient,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    view: AlertsView,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl AlertsScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            action_tx: None,
            focused: false,
            view: AlertsView::new(),
            table_state: TableState::default(),
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
            let result = client.list_alerts().await.map_err(CoreError::from);
            let _ = tx.send(Action::Loaded(Loaded::Alerts(result)));
        });
    }

    fn selected(&self) -> Option<&Alert> {
        self.view.alerts().get(self.table_state.selected()?)
    }

    fn scroll(&mut self, down: bool) {
        let len = self.view.alerts().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            current.saturating_add(1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header =
            Row::new(["Title", "Threshold", "Status", "Device"]).style(theme::table_header());
        let rows = self.view.alerts().iter().map(|a| {
            Row::new(vec![
                Cell::from(a.title.clone()),
                Cell::from(format!("{} MB/s", a.threshold)),
                Cell::from(Span::styled(a.status.to_string(), theme::alert_status(&a.status))),
                Cell::from(a.device_id.map_or_else(|| "all".to_owned(), |id| format!("#{id}"))),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(widgets::panel(
            Line::from(format!(
                " Alerts · {} active · {} resolved ",
                self.view.count_with(&AlertStatus::Active),
                self.view.count_with(&AlertStatus::Resolved)
            )),
            self.focused,
        ));
        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(Line::from(" Details "), false);
        let Some(alert) = self.selected() else {
            frame.render_widget(
                Paragraph::new(Span::styled("No alerts configured", theme::key_hint()))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        };

        let label = |text: &'static str| Span::styled(text, theme::label());
        let enabled = match alert.is_enabled {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        let lines = vec![
            Line::from(Span::styled(alert.title.clone(), theme::title_style())),
            Line::from(""),
            Line::from(vec![
                label("  Threshold  "),
                Span::raw(format!("{} MB/s", alert.threshold)),
            ]),
            Line::from(vec![
                label("  Status     "),
                Span::styled(alert.status.to_string(), theme::alert_status(&alert.status)),
            ]),
            Line::from(vec![label("  Enabled    "), Span::raw(enabled)]),
            Line::from(vec![
                label("  Created    "),
                Span::raw(fmt_timestamp(alert.created_at.as_ref())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                alert.description.clone().unwrap_or_default(),
                theme::table_row(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
    }
}

impl Component for AlertsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll(true),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(false),
            _ => {}
        }
        Ok(None)
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
        let Loaded::Alerts(result) = loaded else {
            return Ok(None);
        };
        let notice = failure_notice("alerts", &result);
        self.view.finish_load(result);
        let len = self.view.alerts().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
        Ok(notice)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).split(area);

        if self.view.is_loading() {
            widgets::render_loading(frame, layout[0], "Loading alerts...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(widgets::key_hints(&[("j/k", "select"), ("r", "refresh")])),
                layout[0],
            );
        }

        let body = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(layout[1]);
        self.render_table(frame, body[0]);
        self.render_detail(frame, body[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "alerts"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::screens::test_client;

    fn alert(id: i64, status: &str) -> Alert {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("alert-{id}"),
            "threshold": 5.0,
            "status": status
        }))
        .unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn load_selects_the_first_alert_and_scroll_stops_at_the_end() {
        let mut screen = AlertsScreen::new(test_client());
        screen
            .receive(Loaded::Alerts(Ok(vec![alert(1, "active"), alert(2, "resolved")])))
            .unwrap();
        assert_eq!(screen.selected().unwrap().id, 1);

        screen.handle_key_event(press(KeyCode::Char('j'))).unwrap();
        screen.handle_key_event(press(KeyCode::Char('j'))).unwrap();
        assert_eq!(screen.selected().unwrap().id, 2);
        assert_eq!(screen.view.count_with(&AlertStatus::Active), 1);
    }

    #[test]
    fn failed_reload_keeps_the_list() {
        let mut screen = AlertsScreen::new(test_client());
        screen.receive(Loaded::Alerts(Ok(vec![alert(1, "active")]))).unwrap();

        let notice = screen
            .receive(Loaded::Alerts(Err(CoreError::Timeout { timeout_secs: 30 })))
            .unwrap();

        assert!(notice.is_some());
        assert_eq!(screen.view.alerts().len(), 1);
    }
}

//! Agents screen: agent table and the register form.
//!
//! A new agent's API key is returned exactly once, so it is shown in a
//! popup that stays up until dismissed.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use wifimon_core::present::{activity_label, fmt_timestamp};
use wifimon_core::{AgentsView, ApiClient, CoreError};

use crate::action::{Action, Loaded, Notification, failure_notice};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, TextField};

pub struct AgentsScreen {
    client: ApiClient,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    view: AgentsView,
    table_state: TableState,
    name_field: TextField,
    form_error: Option<String>,
    submitting: bool,
    throbber_state: ThrobberState,
}

impl AgentsScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            action_tx: None,
            focused: false,
            view: AgentsView::new(),
            table_state: TableState::default(),
            name_field: TextField::new("Agent name"),
            form_error: None,
            submitting: false,
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
            let result = client.list_agents().await.map_err(CoreError::from);
            let _ = tx.send(Action::Loaded(Loaded::Agents(result)));
        });
    }

    fn toggle_form(&mut self) {
        self.view.form.toggle();
        self.form_error = None;
    }

    fn submit(&mut self) {
        self.view.form.name = self.name_field.value().to_owned();
        let name = match self.view.form.validated_name() {
            Ok(name) => name.to_owned(),
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        self.form_error = None;
        self.submitting = true;
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .register_agent(&name)
                .await
                .map_err(CoreError::from);
            let _ = tx.send(Action::Loaded(Loaded::AgentRegistered(result)));
        });
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if self.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => self.toggle_form(),
            KeyCode::Enter => self.submit(),
            _ => {
                self.name_field.handle_key(key);
            }
        }
    }

    fn scroll(&mut self, down: bool) {
        let len = self.view.agents().len();
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
        let header = Row::new(["Name", "Status", "Last sync", "Created"]).style(theme::table_header());
        let rows = self.view.agents().iter().map(|a| {
            Row::new(vec![
                Cell::from(a.name.clone()),
                Cell::from(Span::styled(activity_label(a.is_active), theme::status(a.is_active))),
                Cell::from(fmt_timestamp(a.last_sync.as_ref())),
                Cell::from(fmt_timestamp(a.created_at.as_ref())),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(9),
                Constraint::Length(20),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(widgets::panel(
            Line::from(format!(" Agents ({}) ", self.view.agents().len())),
            self.focused,
        ));

        if self.view.agents().is_empty() && !self.view.is_loading() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No agents yet. Press n to register one.",
                    theme::key_hint(),
                ))
                .alignment(Alignment::Center)
                .block(widgets::panel(Line::from(" Agents "), self.focused)),
                area,
            );
            return;
        }
        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let rect = widgets::centered_rect(frame, area, 56, 8);
        let block = widgets::panel(Line::from(" Register agent "), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);
        self.name_field.render(frame, layout[0], !self.submitting);

        if self.submitting {
            widgets::render_loading(frame, layout[1], "Registering...", &self.throbber_state);
        } else if let Some(ref err) = self.form_error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.as_str(), theme::form_error())),
                layout[1],
            );
        }
        frame.render_widget(
            Paragraph::new(widgets::key_hints(&[("Enter", "register"), ("Esc", "cancel")])),
            layout[2],
        );
    }
}

impl Component for AgentsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.view.last_registered().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.view.dismiss_registered();
            }
            return Ok(None);
        }
        if self.view.form.open {
            self.handle_form_key(key);
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('n') => {
                self.name_field.clear();
                self.toggle_form();
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll(true),
            KeyCode::Char('k') | KeyCode::Up => self.scroll(false),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => self.refresh(),
            Action::Tick if self.view.is_loading() || self.submitting => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn receive(&mut self, loaded: Loaded) -> Result<Option<Action>> {
        match loaded {
            Loaded::Agents(result) => {
                let notice = failure_notice("agents", &result);
                self.view.finish_load(result);
                let len = self.view.agents().len();
                if len == 0 {
                    self.table_state.select(None);
                } else {
                    let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
                    self.table_state.select(Some(idx));
                }
                Ok(notice)
            }
            Loaded::AgentRegistered(Ok(registered)) => {
                self.submitting = false;
                self.name_field.clear();
                let name = registered.agent.name.clone();
                self.view.registration_succeeded(registered);
                self.refresh();
                Ok(Some(Action::Notify(Notification::success(format!(
                    "Agent {name} registered"
                )))))
            }
            Loaded::AgentRegistered(Err(e)) => {
                self.submitting = false;
                error!(error = %e, "failed to register agent");
                if e.requires_login() {
                    return Ok(None);
                }
                Ok(Some(Action::Notify(Notification::error(format!(
                    "Failed to register agent: {e}"
                )))))
            }
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).split(area);

        if self.view.is_loading() {
            widgets::render_loading(frame, layout[0], "Loading agents...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(widgets::key_hints(&[("n", "register agent"), ("r", "refresh")])),
                layout[0],
            );
        }
        self.render_table(frame, layout[1]);

        if self.view.form.open {
            self.render_form(frame, area);
        }
        if let Some(registered) = self.view.last_registered() {
            widgets::render_message(
                frame,
                area,
                "Agent registered",
                format!(
                    "{}\n\nAPI key (shown only once):\n{}\n\nEnter to close",
                    registered.agent.name, registered.api_key
                ),
                theme::info_popup(),
            );
        }
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.view.form.open && !self.submitting {
            self.name_field.paste(text);
        }
        Ok(None)
    }

    fn captures_input(&self) -> bool {
        self.view.form.open || self.view.last_registered().is_some()
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "agents"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::mpsc;
    use wifimon_core::RegisteredAgent;

    use super::*;
    use crate::screens::test_client;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn registered(name: &str) -> RegisteredAgent {
        serde_json::from_value(json!({
            "id": 7,
            "name": name,
            "is_active": true,
            "api_key": "k-123"
        }))
        .unwrap()
    }

    #[test]
    fn blank_name_is_refused_without_a_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = AgentsScreen::new(test_client());
        screen.init(tx).unwrap();

        screen.handle_key_event(press(KeyCode::Char('n'))).unwrap();
        screen.handle_key_event(press(KeyCode::Char(' '))).unwrap();
        screen.handle_key_event(press(KeyCode::Enter)).unwrap();

        assert!(screen.view.form.open);
        assert!(!screen.submitting);
        assert!(screen.form_error.as_deref().unwrap().contains("required"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn form_keeps_typed_keys_from_the_app() {
        let mut screen = AgentsScreen::new(test_client());
        screen.handle_key_event(press(KeyCode::Char('n'))).unwrap();
        assert!(screen.captures_input());

        for c in "qnr".chars() {
            screen.handle_key_event(press(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(screen.name_field.value(), "qnr");

        screen.handle_key_event(press(KeyCode::Esc)).unwrap();
        assert!(!screen.view.form.open);
        assert!(!screen.captures_input());
    }

    #[test]
    fn key_is_shown_once_then_dismissed() {
        let mut screen = AgentsScreen::new(test_client());
        screen.view.form.toggle();
        screen.submitting = true;

        let follow_up = screen
            .receive(Loaded::AgentRegistered(Ok(registered("rpi-office"))))
            .unwrap();

        assert!(matches!(follow_up, Some(Action::Notify(_))));
        assert!(!screen.view.form.open);
        assert_eq!(screen.view.last_registered().unwrap().api_key, "k-123");

        screen.handle_key_event(press(KeyCode::Enter)).unwrap();
        assert!(screen.view.last_registered().is_none());
    }

    #[test]
    fn failed_registration_leaves_the_form_as_is() {
        let mut screen = AgentsScreen::new(test_client());
        screen.handle_key_event(press(KeyCode::Char('n'))).unwrap();
        for c in "rpi".chars() {
            screen.handle_key_event(press(KeyCode::Char(c))).unwrap();
        }
        screen.submitting = true;

        let follow_up = screen
            .receive(Loaded::AgentRegistered(Err(CoreError::Rejected {
                status: 400,
                message: "duplicate".into(),
            })))
            .unwrap();

        match follow_up {
            Some(Action::Notify(n)) => assert!(n.message.contains("duplicate")),
            other => panic!("expected a toast, got {other:?}"),
        }
        assert!(screen.view.form.open);
        assert_eq!(screen.name_field.value(), "rpi");
        assert!(screen.view.last_registered().is_none());
    }
}

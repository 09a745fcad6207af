//! Alert history: recorded breaches over an adjustable look-back window.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use wifimon_core::present::fmt_timestamp;
use wifimon_core::{AlertHistoryView, ApiClient, CoreError};

use crate::action::{Action, Loaded, failure_notice};
use crate::component::Component;
use crate::theme;
use crate::widgets;

/// Window sizes cycled with `+`/`-`, in hours.
const WINDOWS: &[u32] = &[1, 6, 24, 72, 168];

pub struct HistoryScreen {
    client: ApiClient,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    view: AlertHistoryView,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl HistoryScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            action_tx: None,
            focused: false,
            view: AlertHistoryView::default(),
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
        let hours = self.view.hours();
        tokio::spawn(async move {
            let result = client.alert_history(hours).await.map_err(CoreError::from);
            let _ = tx.send(Action::Loaded(Loaded::History(result)));
        });
    }

    /// Step to the next larger (or smaller) window and reload.
    fn step_window(&mut self, wider: bool) {
        let hours = self.view.hours();
        let next = if wider {
            WINDOWS.iter().copied().find(|&w| w > hours)
        } else {
            WINDOWS.iter().rev().copied().find(|&w| w < hours)
        };
        if let Some(next) = next {
            self.view.set_hours(next);
            self.refresh();
        }
    }

    fn scroll(&mut self, down: bool) {
        let len = self.view.entries().len();
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
        let title = Line::from(format!(
            " History · last {}h · {} open ",
            self.view.hours(),
            self.view.open_count()
        ));
        if self.view.entries().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No alerts triggered in this window", theme::key_hint()))
                    .alignment(Alignment::Center)
                    .block(widgets::panel(title, self.focused)),
                area,
            );
            return;
        }

        let header = Row::new(["Alert", "Device", "Value", "Triggered", "Resolved"])
            .style(theme::table_header());
        let rows = self.view.entries().iter().map(|e| {
            let resolved = match e.resolved_at {
                Some(ref t) => Span::styled(fmt_timestamp(Some(t)), theme::status(true)),
                None => Span::styled("open", theme::open_breach()),
            };
            Row::new(vec![
                Cell::from(format!("#{}", e.alert_id)),
                Cell::from(e.device_id.map_or_else(|| "-".to_owned(), |id| format!("#{id}"))),
                Cell::from(format!("{:.2} MB/s", e.value_at_trigger)),
                Cell::from(fmt_timestamp(e.triggered_at.as_ref())),
                Cell::from(resolved),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Fill(1),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(widgets::panel(title, self.focused));
        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }
}

impl Component for HistoryScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('+' | '=') => self.step_window(true),
            KeyCode::Char('-') => self.step_window(false),
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
        let Loaded::History(result) = loaded else {
            return Ok(None);
        };
        let notice = failure_notice("alert history", &result);
        self.view.finish_load(result);
        let len = self.view.entries().len();
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select((len > 0).then(|| current.min(len - 1)));
        Ok(notice)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).split(area);

        if self.view.is_loading() {
            widgets::render_loading(frame, layout[0], "Loading history...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(widgets::key_hints(&[
                    ("+/-", "window"),
                    ("j/k", "scroll"),
                    ("r", "refresh"),
                ])),
                layout[0],
            );
        }
        self.render_table(frame, layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "history"
    }
}

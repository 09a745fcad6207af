//! Devices screen: device table, detail panel with a usage chart, and the
//! data-cap editor.
//!
//! Moving the selection starts a stats request for the newly selected
//! device. Responses carry the ticket they were issued with; the view keeps
//! only the one answering the current selection.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use wifimon_core::present::{DeviceIcon, activity_label, bytes_to_mb, fmt_mb, fmt_timestamp};
use wifimon_core::{
    ApiClient, CoreError, DetailTicket, Device, DevicesView, format_cap, parse_cap,
};

use crate::action::{Action, Loaded, Notification, failure_notice};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, TextField};

/// The open cap-edit popup.
#[derive(Debug)]
struct CapEditor {
    device_id: i64,
    device_name: String,
    field: TextField,
    saving: bool,
}

pub struct DevicesScreen {
    client: ApiClient,
    stats_hours: u32,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    view: DevicesView,
    table_state: TableState,
    cap_editor: Option<CapEditor>,
    warning: Option<String>,
    throbber_state: ThrobberState,
}

impl DevicesScreen {
    pub fn new(client: ApiClient, stats_hours: u32) -> Self {
        Self {
            client,
            stats_hours,
            action_tx: None,
            focused: false,
            view: DevicesView::new(),
            table_state: TableState::default(),
            cap_editor: None,
            warning: None,
            throbber_state: ThrobberState::default(),
        }
    }

    // ── Requests ────────────────────────────────────────────────────

    fn refresh(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.view.begin_load();
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.list_devices().await.map_err(CoreError::from);
            let _ = tx.send(Action::Loaded(Loaded::Devices(result)));
        });
    }

    fn fetch_stats(&self, ticket: DetailTicket) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        let hours = self.stats_hours;
        tokio::spawn(async move {
            let result = DevicesView::fetch_stats(&client, ticket, hours).await;
            let _ = tx.send(Action::Loaded(Loaded::DeviceStats { ticket, result }));
        });
    }

    // ── Selection ───────────────────────────────────────────────────

    fn select_index(&mut self, idx: usize) {
        let Some(id) = self.view.devices().get(idx).map(|d| d.id) else {
            return;
        };
        self.table_state.select(Some(idx));
        if self.view.selected_id() != Some(id) {
            let ticket = self.view.select(id);
            self.fetch_stats(ticket);
        }
    }

    fn move_down(&mut self) {
        let last = self.view.devices().len().saturating_sub(1);
        let next = self
            .view
            .selected_index()
            .map_or(0, |i| i.saturating_add(1).min(last));
        self.select_index(next);
    }

    fn move_up(&mut self) {
        let prev = self
            .view
            .selected_index()
            .map_or(0, |i| i.saturating_sub(1));
        self.select_index(prev);
    }

    // ── Cap editor ──────────────────────────────────────────────────

    fn open_cap_editor(&mut self) {
        let Some(device) = self.view.selected() else {
            return;
        };
        let mut field = TextField::new("Data cap (bytes)");
        if let Some(cap) = device.data_cap {
            field.set_value(cap.to_string());
        }
        self.cap_editor = Some(CapEditor {
            device_id: device.id,
            device_name: device.display_name().to_owned(),
            field,
            saving: false,
        });
    }

    /// Validate the field; only a valid cap leaves the machine.
    fn submit_cap(&mut self) {
        let Some(editor) = self.cap_editor.as_mut() else {
            return;
        };
        let cap = match parse_cap(editor.field.value()) {
            Ok(cap) => cap,
            Err(e) => {
                warn!(device_id = editor.device_id, "{e}");
                self.warning = Some(e.to_string());
                return;
            }
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        editor.saving = true;
        let client = self.client.clone();
        let device_id = editor.device_id;
        tokio::spawn(async move {
            let result = DevicesView::write_cap(&client, device_id, cap).await;
            let _ = tx.send(Action::Loaded(Loaded::CapSaved(result)));
        });
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.cap_editor.as_mut() else {
            return;
        };
        if editor.saving {
            return;
        }
        match key.code {
            KeyCode::Esc => self.cap_editor = None,
            KeyCode::Enter => self.submit_cap(),
            _ => {
                editor.field.handle_key(key);
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Device", "MAC", "Status", "Cap"]).style(theme::table_header());
        let rows = self.view.devices().iter().map(|d| {
            Row::new(vec![
                Cell::from(format!("{} {}", DeviceIcon::for_device(d).glyph(), d.display_name())),
                Cell::from(Span::styled(d.mac_address.clone(), theme::mac())),
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
                Constraint::Length(9),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(widgets::panel(
            Line::from(format!(" Devices ({}) ", self.view.devices().len())),
            self.focused,
        ));
        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, device: &Device) {
        let samples = u16::try_from(self.view.recent_stats().len()).unwrap_or(u16::MAX);
        let layout = Layout::vertical([
            Constraint::Length(10),
            Constraint::Min(6),
            Constraint::Length(if samples == 0 { 0 } else { samples.saturating_add(3) }),
        ])
        .split(area);

        let label = |text: &'static str| Span::styled(text, theme::label());
        let value = |text: String| Span::styled(text, theme::value());
        let lines = vec![
            Line::from(vec![label("  MAC           "), value(device.mac_address.clone())]),
            Line::from(vec![
                label("  IP            "),
                value(device.ip_address.clone().unwrap_or_else(|| "-".into())),
            ]),
            Line::from(vec![
                label("  Manufacturer  "),
                value(device.manufacturer.clone().unwrap_or_else(|| "-".into())),
            ]),
            Line::from(vec![
                label("  Type          "),
                value(DeviceIcon::for_device(device).to_string()),
            ]),
            Line::from(vec![
                label("  Status        "),
                Span::styled(activity_label(device.is_active), theme::status(device.is_active)),
            ]),
            Line::from(vec![
                label("  First seen    "),
                value(fmt_timestamp(device.first_seen.as_ref())),
            ]),
            Line::from(vec![
                label("  Last seen     "),
                value(fmt_timestamp(device.last_seen.as_ref())),
            ]),
            Line::from(vec![label("  Data cap      "), value(format_cap(device.data_cap))]),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(widgets::panel(
                Line::from(format!(" {} ", device.display_name())),
                false,
            )),
            layout[0],
        );

        self.render_usage(frame, layout[1]);
        if samples > 0 && !self.view.stats_loading() {
            self.render_samples(frame, layout[2]);
        }
    }

    /// Upload/download per sample, newest last.
    fn render_samples(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Time", "Uploaded", "Downloaded"]).style(theme::table_header());
        let rows = self.view.recent_stats().iter().map(|s| {
            Row::new(vec![
                Cell::from(fmt_timestamp(s.timestamp.as_ref())),
                Cell::from(fmt_mb(s.bytes_uploaded)),
                Cell::from(fmt_mb(s.bytes_downloaded)),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [Constraint::Fill(1), Constraint::Length(12), Constraint::Length(12)],
        )
        .header(header)
        .block(widgets::panel(Line::from(" Samples "), false));
        frame.render_widget(table, area);
    }

    /// Bar chart of the latest samples (MB per sample).
    fn render_usage(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(Line::from(" Usage (MB) "), false);
        let inner = block.inner(area);

        if self.view.stats_loading() {
            frame.render_widget(block, area);
            widgets::render_loading(frame, inner, "Loading usage...", &self.throbber_state);
            return;
        }
        let samples = self.view.recent_stats();
        if samples.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No usage data", theme::key_hint()))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }

        let bars: Vec<Bar> = samples
            .iter()
            .map(|s| {
                let time = s
                    .timestamp
                    .map_or_else(|| "-".to_owned(), |t| t.format("%H:%M").to_string());
                Bar::default()
                    .value(s.total())
                    .text_value(format!("{:.1}", bytes_to_mb(s.total())))
                    .label(Line::from(time))
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(6)
            .bar_gap(1)
            .bar_style(theme::usage_bar())
            .value_style(theme::usage_value())
            .label_style(theme::key_hint());
        frame.render_widget(chart, area);
    }

    fn render_cap_editor(&self, frame: &mut Frame, area: Rect, editor: &CapEditor) {
        let rect = widgets::centered_rect(frame, area, 56, 7);
        let block = widgets::panel(
            Line::from(format!(" Data cap · {} ", editor.device_name)),
            true,
        );
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let layout =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
        editor.field.render(frame, layout[0], !editor.saving);
        if editor.saving {
            widgets::render_loading(frame, layout[1], "Saving...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(widgets::key_hints(&[
                    ("Enter", "save"),
                    ("Esc", "cancel"),
                    ("empty", "= no cap"),
                ])),
                layout[1],
            );
        }
    }
}

impl Component for DevicesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.warning.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.warning = None;
            }
            return Ok(None);
        }
        if self.cap_editor.is_some() {
            self.handle_editor_key(key);
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('g') | KeyCode::Home => self.select_index(0),
            KeyCode::Char('G') | KeyCode::End => {
                self.select_index(self.view.devices().len().saturating_sub(1));
            }
            KeyCode::Char('c') | KeyCode::Enter => self.open_cap_editor(),
            _ => {}
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.warning.is_some() {
            return Ok(None);
        }
        if let Some(editor) = self.cap_editor.as_mut().filter(|e| !e.saving) {
            editor.field.paste(text.trim());
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => self.refresh(),
            Action::Tick => {
                let saving = self.cap_editor.as_ref().is_some_and(|e| e.saving);
                if self.view.is_loading() || self.view.stats_loading() || saving {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn receive(&mut self, loaded: Loaded) -> Result<Option<Action>> {
        match loaded {
            Loaded::Devices(result) => {
                let notice = failure_notice("devices", &result);
                if let Some(ticket) = self.view.finish_load(result) {
                    self.fetch_stats(ticket);
                }
                self.table_state.select(self.view.selected_index());
                Ok(notice)
            }
            Loaded::DeviceStats { ticket, result } => {
                let notice = failure_notice("usage", &result);
                if self.view.apply_stats(ticket, result) {
                    Ok(notice)
                } else {
                    debug!(device_id = ticket.device_id, "ignored stats for an old selection");
                    Ok(None)
                }
            }
            Loaded::CapSaved(Ok(device)) => {
                self.cap_editor = None;
                self.refresh();
                Ok(Some(Action::Notify(Notification::success(format!(
                    "{}: {}",
                    device.display_name(),
                    format_cap(device.data_cap)
                )))))
            }
            Loaded::CapSaved(Err(e)) => {
                if e.requires_login() {
                    self.cap_editor = None;
                } else {
                    if let Some(editor) = self.cap_editor.as_mut() {
                        editor.saving = false;
                    }
                    self.warning = Some(format!("Failed to update data cap: {e}"));
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).split(area);

        if self.view.is_loading() {
            widgets::render_loading(frame, layout[0], "Loading devices...", &self.throbber_state);
        } else {
            frame.render_widget(
                Paragraph::new(widgets::key_hints(&[
                    ("j/k", "select"),
                    ("c", "edit cap"),
                    ("r", "refresh"),
                ])),
                layout[0],
            );
        }

        let body = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);
        self.render_table(frame, body[0]);
        match self.view.selected() {
            Some(device) => self.render_detail(frame, body[1], device),
            None => frame.render_widget(
                Paragraph::new(Span::styled("No device selected", theme::key_hint()))
                    .alignment(Alignment::Center)
                    .block(widgets::panel(Line::from(" Details "), false)),
                body[1],
            ),
        }

        if let Some(ref editor) = self.cap_editor {
            self.render_cap_editor(frame, area, editor);
        }
        if let Some(ref warning) = self.warning {
            widgets::render_message(
                frame,
                area,
                "Warning",
                format!("{warning}\n\nEnter to dismiss"),
                theme::warning_popup(),
            );
        }
    }

    fn captures_input(&self) -> bool {
        self.cap_editor.is_some() || self.warning.is_some()
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "devices"
    }
}

//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use wifimon_core::{ApiClient, AuthGate, GateDecision, Route, User};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::event::{Event, EventReader, Rates};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets;

/// How long a toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    client: ApiClient,
    /// Shared with the tasks that run navigation checks.
    gate: Arc<Mutex<AuthGate>>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    /// Account confirmed by the last gate check.
    user: Option<User>,
    help_visible: bool,
    /// Active toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    session_cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(client: ApiClient, stats_hours: u32) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&client, stats_hours).into_iter().collect();

        Self {
            gate: Arc::new(Mutex::new(AuthGate::new(client.clone()))),
            client,
            active_screen: ScreenId::Login,
            screens,
            running: true,
            user: None,
            help_visible: false,
            notification: None,
            session_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        tokio::spawn(crate::session::watch_session(
            self.client.subscribe_auth(),
            self.action_tx.clone(),
            self.session_cancel.clone(),
        ));

        // Land on the dashboard if the stored session is still good.
        self.check_route(Route::HOME);

        let mut events = EventReader::spawn(Rates::default());

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(action) = self.handle_paste(&text)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action)?;
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.session_cancel.cancel();
        drop(events);
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Keys ────────────────────────────────────────────────────────

    /// Global keys are handled here unless the active screen is capturing
    /// text; everything else goes to the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let captured = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !captured {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
                (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
                (_, KeyCode::Char('L')) => return Ok(Some(Action::Logout)),

                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                    let screen = c
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .and_then(ScreenId::from_number);
                    if let Some(screen) = screen {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }

                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (_, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }

                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Pastes only reach a screen that is editing text.
    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) if screen.captures_input() => screen.handle_paste(text),
            _ => Ok(None),
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render => {}

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::SwitchScreen(target) => {
                if target == ScreenId::Login {
                    self.show_screen(ScreenId::Login)?;
                } else {
                    self.check_route(target.route());
                }
            }

            Action::RouteChecked {
                route,
                decision,
                user,
            } => {
                self.user = user;
                let target = match decision {
                    GateDecision::Stay => ScreenId::for_route(route),
                    GateDecision::Redirect(to) => {
                        debug!(from = route.path(), to = to.path(), "gate redirect");
                        ScreenId::for_route(to)
                    }
                };
                self.show_screen(target)?;
            }

            Action::LoggedIn => self.check_route(Route::Login),

            Action::Logout => {
                info!("signing out");
                self.user = None;
                self.show_screen(ScreenId::Login)?;
                self.notify(Notification::info("Signed out"));
                let gate = Arc::clone(&self.gate);
                tokio::spawn(async move {
                    gate.lock().await.sign_out();
                });
            }

            Action::SessionEnded => {
                self.user = None;
                if self.active_screen != ScreenId::Login {
                    self.show_screen(ScreenId::Login)?;
                    self.notify(Notification::warning("Session expired, please sign in again"));
                }
            }

            Action::Loaded(loaded) => {
                let owner = loaded.screen();
                if let Some(screen) = self.screens.get_mut(&owner) {
                    if let Some(follow_up) = screen.receive(loaded)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Notify(n) => self.notify(n),

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.forward(&Action::Tick)?;
            }

            Action::Refresh => self.forward(&Action::Refresh)?,
        }
        Ok(())
    }

    /// Hand an action to the active screen.
    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Ask the gate about `route` on a task; the answer comes back as
    /// `RouteChecked`.
    fn check_route(&self, route: Route) {
        let gate = Arc::clone(&self.gate);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let mut gate = gate.lock().await;
            let decision = gate.check(route).await;
            let user = gate.user().cloned();
            let _ = tx.send(Action::RouteChecked {
                route,
                decision,
                user,
            });
        });
    }

    /// Make `target` the active screen. Dashboard screens fetch on every
    /// mount.
    fn show_screen(&mut self, target: ScreenId) -> Result<()> {
        if target != self.active_screen {
            debug!("switching screen: {} → {}", self.active_screen, target);
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                screen.set_focused(false);
            }
            self.active_screen = target;
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                screen.set_focused(true);
            }
        }
        if target != ScreenId::Login {
            self.forward(&Action::Refresh)?;
        }
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        if self.active_screen != ScreenId::Login {
            self.render_tab_bar(frame, layout[1]);
        }
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    theme::tab(id == self.active_screen),
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let session = match self.user {
            Some(ref user) => Span::styled(format!("● {}", user.email), theme::session(true)),
            None => Span::styled("○ signed out", theme::session(false)),
        };
        let hints = if self.active_screen == ScreenId::Login {
            " │ Ctrl+C quit"
        } else {
            " │ ? help  r refresh  L logout  q quit"
        };

        let line = Line::from(vec![
            Span::raw(" "),
            session,
            Span::styled(hints, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width.saturating_add(1));
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let (border_color, icon) = theme::notification(notif.level);

        frame.render_widget(Block::default().style(theme::backdrop()), toast_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), theme::table_row()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = widgets::centered_rect(frame, area, 56, 20);
        let block = widgets::panel(Line::from(" Keyboard Shortcuts "), true);
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let heading = |text: &'static str| {
            Line::from(Span::styled(text, theme::help_text()))
        };
        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            heading("  Navigation"),
            entry("1-5", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("j/k ↑/↓", "Move selection"),
            entry("r", "Reload the current screen"),
            Line::from(""),
            heading("  Screens"),
            entry("c", "Edit data cap (Devices)"),
            entry("n", "Register agent (Agents)"),
            entry("+/-", "Change window (History)"),
            Line::from(""),
            heading("  Session"),
            entry("L", "Sign out"),
            entry("q", "Quit"),
            entry("?", "This help"),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

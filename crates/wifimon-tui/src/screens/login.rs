//! Login screen. Doubles as the registration form (`Ctrl+R` toggles).

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use secrecy::SecretString;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use wifimon_core::present::APP_TITLE;
use wifimon_core::{ApiClient, CoreError};

use crate::action::{Action, Loaded, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

pub struct LoginScreen {
    client: ApiClient,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    mode: Mode,
    field: Field,
    email: TextField,
    password: TextField,
    error: Option<String>,
    pending: bool,
    throbber_state: ThrobberState,
}

impl LoginScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            action_tx: None,
            focused: false,
            mode: Mode::SignIn,
            field: Field::Email,
            email: TextField::new("Email"),
            password: TextField::new("Password").masked(),
            error: None,
            pending: false,
            throbber_state: ThrobberState::default(),
        }
    }

    fn active_field(&mut self) -> &mut TextField {
        match self.field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        };
        self.error = None;
    }

    /// Validate locally, then send the request on a task.
    fn submit(&mut self) {
        let email = self.email.value().trim().to_owned();
        if email.is_empty() || self.password.value().is_empty() {
            self.error = Some("Email and password are required".into());
            return;
        }
        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        self.error = None;
        self.pending = true;
        let password = SecretString::from(self.password.value().to_owned());
        let client = self.client.clone();
        let mode = self.mode;
        tokio::spawn(async move {
            let loaded = match mode {
                Mode::SignIn => Loaded::SignIn(
                    client
                        .login(&email, &password)
                        .await
                        .map_err(CoreError::from),
                ),
                Mode::SignUp => Loaded::SignUp(
                    client
                        .register(&email, &password)
                        .await
                        .map_err(CoreError::from),
                ),
            };
            let _ = tx.send(Action::Loaded(loaded));
        });
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(1), // error / throbber
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(area);

        self.email
            .render(frame, layout[1], !self.pending && self.field == Field::Email);
        self.password
            .render(frame, layout[2], !self.pending && self.field == Field::Password);

        if self.pending {
            let label = match self.mode {
                Mode::SignIn => "Signing in...",
                Mode::SignUp => "Creating account...",
            };
            widgets::render_loading(frame, layout[3], label, &self.throbber_state);
        } else if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.as_str(), theme::form_error()))
                    .alignment(Alignment::Center),
                layout[3],
            );
        }

        let other = match self.mode {
            Mode::SignIn => "create account",
            Mode::SignUp => "back to sign in",
        };
        let mut hints = widgets::key_hints(&[("Tab", "next field"), ("Enter", "submit")]);
        hints.push_span(Span::styled(" Ctrl+R ", theme::key_hint_key()));
        hints.push_span(Span::styled(format!("{other} "), theme::key_hint()));
        hints.push_span(Span::styled(" Esc ", theme::key_hint_key()));
        hints.push_span(Span::styled("quit", theme::key_hint()));
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), layout[5]);
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending {
            return Ok(None);
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.toggle_mode(),
            (_, KeyCode::Esc) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
                self.toggle_field();
            }
            (_, KeyCode::Enter) => match self.field {
                Field::Email => self.field = Field::Password,
                Field::Password => self.submit(),
            },
            _ => {
                self.active_field().handle_key(key);
            }
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if !self.pending {
            self.active_field().paste(text);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) && self.pending {
            self.throbber_state.calc_next();
        }
        Ok(None)
    }

    fn receive(&mut self, loaded: Loaded) -> Result<Option<Action>> {
        self.pending = false;
        match loaded {
            Loaded::SignIn(Ok(())) => {
                self.password.clear();
                return Ok(Some(Action::LoggedIn));
            }
            Loaded::SignUp(Ok(user)) => {
                info!(email = %user.email, "account created");
                self.password.clear();
                self.mode = Mode::SignIn;
                self.field = Field::Password;
                return Ok(Some(Action::Notify(Notification::success(format!(
                    "Account created for {}. Sign in to continue.",
                    user.email
                )))));
            }
            Loaded::SignIn(Err(e)) | Loaded::SignUp(Err(e)) => {
                warn!(error = %e, "sign-in failed");
                self.error = Some(e.to_string());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Block::default().style(theme::backdrop()), area);

        let panel_area = widgets::centered_rect(frame, area, 60, 15);
        let title = match self.mode {
            Mode::SignIn => format!(" {APP_TITLE} · Sign in "),
            Mode::SignUp => format!(" {APP_TITLE} · Create account "),
        };
        let block = widgets::panel(Line::from(title), true);
        let inner = block.inner(panel_area);
        frame.render_widget(block, panel_area);
        self.render_form(frame, inner);
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "login"
    }
}

//! Single-line text field on top of `tui_input::Input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Editing request for a key, or `None` if the key is not an edit.
pub fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(_) if ctrl || alt => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace if ctrl || alt => Some(InputRequest::DeletePrevWord),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left if ctrl => Some(InputRequest::GoToPrevWord),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right if ctrl => Some(InputRequest::GoToNextWord),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct TextField {
    label: &'static str,
    input: Input,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: Input::default(),
            masked: false,
        }
    }

    /// Render `•` instead of the characters (passwords).
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.input = Input::new(value.into());
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Apply an editing key. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match input_request(key) {
            Some(req) => {
                self.input.handle(req);
                true
            }
            None => false,
        }
    }

    /// Insert pasted text at the cursor. Stops at the first line break and
    /// skips other control characters. Returns `true` if anything landed.
    pub fn paste(&mut self, text: &str) -> bool {
        let mut inserted = false;
        for c in text.chars().take_while(|c| !matches!(c, '\n' | '\r')) {
            if !c.is_control() {
                self.input.handle(InputRequest::InsertChar(c));
                inserted = true;
            }
        }
        inserted
    }

    /// Three rows: border, value, border. Places the cursor when `active`.
    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(if active {
                theme::title_style()
            } else {
                theme::key_hint()
            })
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.max(1));
        let scroll = self.input.visual_scroll(width.saturating_sub(1));
        let shown = if self.masked {
            "•".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_owned()
        };
        frame.render_widget(
            Paragraph::new(shown)
                .style(theme::table_row())
                .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            inner,
        );

        if active && inner.height > 0 {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            let x = inner
                .x
                .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            assert!(field.handle_key(press(KeyCode::Char(c))));
        }
    }

    #[test]
    fn typing_and_backspace() {
        let mut field = TextField::new("Name");
        type_str(&mut field, "attic");
        assert!(field.handle_key(press(KeyCode::Backspace)));
        assert_eq!(field.value(), "atti");
    }

    #[test]
    fn cursor_movement_inserts_mid_string() {
        let mut field = TextField::new("Cap");
        type_str(&mut field, "10");
        field.handle_key(press(KeyCode::Home));
        type_str(&mut field, "5");
        assert_eq!(field.value(), "510");
    }

    #[test]
    fn ctrl_u_clears_line() {
        let mut field = TextField::new("Email");
        field.set_value("ops@example.com");
        assert!(field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn paste_inserts_first_line_at_cursor() {
        let mut field = TextField::new("Email");
        type_str(&mut field, "@example.com");
        field.handle_key(press(KeyCode::Home));
        assert!(field.paste("ops\tteam\nsecond line"));
        assert_eq!(field.value(), "opsteam@example.com");
        assert!(!field.paste("\nignored"));
    }

    #[test]
    fn navigation_keys_are_not_edits() {
        let mut field = TextField::new("Email").masked();
        assert!(!field.handle_key(press(KeyCode::Enter)));
        assert!(!field.handle_key(press(KeyCode::Tab)));
        assert!(!field.handle_key(press(KeyCode::Esc)));
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}

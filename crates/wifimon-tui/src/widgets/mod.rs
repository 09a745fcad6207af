//! Reusable widgets shared by the screens.

pub mod text_field;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_popup::Popup;

use crate::theme;

pub use text_field::TextField;

/// Spinner with a label, for panels waiting on a request.
pub fn render_loading(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let throbber = Throbber::default()
        .label(format!(" {label}"))
        .style(theme::value())
        .throbber_style(theme::throbber());
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}

/// Rounded panel block, highlighted when focused.
pub fn panel(title: impl Into<Line<'static>>, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// Blocking message box centered on `area`; the caller decides how it is
/// dismissed.
pub fn render_message(frame: &mut Frame, area: Rect, title: &str, body: String, style: Style) {
    let popup = Popup::new(body).title(format!(" {title} ")).style(style);
    frame.render_widget(popup, area);
}

/// A centered rectangle of at most `width` x `height`, cleared for drawing.
pub fn centered_rect(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    frame.render_widget(Clear, rect);
    rect
}

/// `"  key desc  key desc"` hint line.
pub fn key_hints(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled(format!("{desc} "), theme::key_hint()));
    }
    Line::from(spans)
}

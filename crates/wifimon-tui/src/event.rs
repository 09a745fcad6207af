//! Terminal input and timers, merged into one stream for the app loop.
//!
//! Only what the dashboard reacts to survives translation: key presses,
//! bracketed pastes for the text fields, and a redraw request whenever the
//! terminal is resized. Mouse, focus and key-release events are dropped.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Clipboard text delivered in one piece.
    Paste(String),
    /// Advance spinners and expire toasts.
    Tick,
    /// Draw a frame, either on schedule or because the terminal resized.
    Render,
}

/// Timer periods for [`Event::Tick`] and [`Event::Render`].
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(33),
        }
    }
}

/// Map a raw terminal event onto what the app handles.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Paste(text) if !text.is_empty() => Some(Event::Paste(text)),
        CrosstermEvent::Resize(..) => Some(Event::Render),
        _ => None,
    }
}

fn interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Background task feeding [`Event`]s to the app loop.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_events(tx, rates, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn read_events(tx: mpsc::UnboundedSender<Event>, rates: Rates, cancel: CancellationToken) {
    let mut terminal = EventStream::new();
    let mut tick = interval(rates.tick);
    let mut render = interval(rates.render);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            raw = terminal.next() => match raw {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal read failed");
                    break;
                }
                None => break,
            },
        };
        if tx.send(event).is_err() {
            break;
        }
    }
    debug!("event reader stopped");
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_key_presses_pass() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert_eq!(translate(key(KeyEventKind::Release)), None);
        assert_eq!(translate(key(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn resize_requests_a_redraw() {
        assert_eq!(translate(CrosstermEvent::Resize(120, 40)), Some(Event::Render));
    }

    #[test]
    fn empty_paste_is_dropped() {
        assert_eq!(
            translate(CrosstermEvent::Paste("ops@example.com".into())),
            Some(Event::Paste("ops@example.com".into()))
        );
        assert_eq!(translate(CrosstermEvent::Paste(String::new())), None);
        assert_eq!(translate(CrosstermEvent::FocusLost), None);
    }
}

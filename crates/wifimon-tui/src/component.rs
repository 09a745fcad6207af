//! Component trait: every screen implements it.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, Loaded};

/// Lifecycle: `init` → (`handle_key_event` | `update` | `receive` | `render`)*
pub trait Component: Send {
    /// Called once at startup with the sender for dispatching actions.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a key the app did not claim. Return an action to dispatch.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Pasted text, delivered only while [`Self::captures_input`] holds.
    fn handle_paste(&mut self, _text: &str) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a dispatched action. May return a follow-up.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Take a finished request this screen started.
    fn receive(&mut self, _loaded: Loaded) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// `true` while a text field or popup owns the keyboard, so global
    /// keys like `q` reach the screen instead.
    fn captures_input(&self) -> bool {
        false
    }

    #[allow(dead_code)]
    fn focused(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}

    #[allow(dead_code)]
    fn id(&self) -> &str;
}

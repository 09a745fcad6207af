//! Per-page view state.
//!
//! Each view owns its data, fetches it when the page is entered and
//! re-fetches after its own writes. Nothing is shared between views.

pub mod agents;
pub mod alerts;
pub mod devices;
pub mod history;
pub mod overview;

pub use agents::{AgentForm, AgentsView};
pub use alerts::AlertsView;
pub use devices::{DetailTicket, DevicesView, RECENT_STATS};
pub use history::{AlertHistoryView, DEFAULT_HISTORY_HOURS};
pub use overview::{OverviewFetch, OverviewView, RECENT_ALERTS};

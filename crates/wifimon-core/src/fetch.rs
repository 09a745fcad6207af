//! Fetch-on-mount state for a single view slot.

use tracing::warn;

use crate::error::CoreError;

/// Lifecycle of data a view fetched for itself.
///
/// A failed fetch is logged and falls back to whatever the slot held
/// before, so a list that never loaded reads as empty rather than as an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Never requested.
    Idle,
    /// A request is in flight; `previous` stays visible meanwhile.
    Loading { previous: Option<T> },
    Loaded(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FetchState<T> {
    /// Enter `Loading`, keeping the current data.
    pub fn begin(&mut self) {
        let previous = match std::mem::take(self) {
            Self::Idle => None,
            Self::Loading { previous } => previous,
            Self::Loaded(data) => Some(data),
        };
        *self = Self::Loading { previous };
    }

    /// Enter `Loading` with nothing to show (the data belonged to something else).
    pub fn reset_loading(&mut self) {
        *self = Self::Loading { previous: None };
    }

    /// Settle the slot. Returns `false` (and logs) if the fetch failed.
    pub fn finish(&mut self, what: &str, result: Result<T, CoreError>) -> bool {
        match result {
            Ok(data) => {
                *self = Self::Loaded(data);
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to load {what}");
                let restored = match std::mem::take(self) {
                    Self::Loading { previous } => previous,
                    Self::Loaded(data) => Some(data),
                    Self::Idle => None,
                };
                *self = restored.map_or(Self::Idle, Self::Loaded);
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The data to display, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Loading { previous } => previous.as_ref(),
            Self::Loaded(data) => Some(data),
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Idle => None,
            Self::Loading { previous } => previous.as_mut(),
            Self::Loaded(data) => Some(data),
        }
    }
}

impl<T> FetchState<Vec<T>> {
    /// Items to render; empty while idle or on a failed first load.
    pub fn items(&self) -> &[T] {
        self.data().map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boom() -> CoreError {
        CoreError::Internal("boom".into())
    }

    #[test]
    fn failed_first_load_is_empty() {
        let mut slot: FetchState<Vec<u8>> = FetchState::default();
        slot.begin();
        assert!(slot.is_loading());
        assert!(!slot.finish("things", Err(boom())));
        assert_eq!(slot, FetchState::Idle);
        assert!(slot.items().is_empty());
    }

    #[test]
    fn failed_refresh_keeps_previous() {
        let mut slot = FetchState::Loaded(vec![1, 2]);
        slot.begin();
        assert_eq!(slot.items(), &[1, 2]);
        slot.finish("things", Err(boom()));
        assert_eq!(slot, FetchState::Loaded(vec![1, 2]));
    }

    #[test]
    fn success_replaces() {
        let mut slot = FetchState::Loaded(vec![1]);
        slot.begin();
        assert!(slot.finish("things", Ok(vec![])));
        assert_eq!(slot, FetchState::Loaded(vec![]));
    }
}

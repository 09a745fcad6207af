//! Session bridge: turns the client's auth transitions into actions.
//!
//! A 401 on any request clears the stored token and flips the client's
//! auth state to `Unauthenticated`. This task watches that state and sends
//! [`Action::SessionEnded`] so the app can return to the login screen, no
//! matter which screen issued the failing request.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use wifimon_core::AuthState;

use crate::action::Action;

/// Forward every transition to `Unauthenticated` until cancelled or the
/// client is dropped.
///
/// `auth` must be fresh from `subscribe_auth()`: a change that lands before
/// this task is first polled is still reported.
pub async fn watch_session(
    mut auth: watch::Receiver<AuthState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = auth.changed() => {
                if changed.is_err() {
                    debug!("auth channel closed");
                    break;
                }
                let state = *auth.borrow_and_update();
                debug!(?state, "auth state changed");
                if state == AuthState::Unauthenticated {
                    info!("session ended");
                    if action_tx.send(Action::SessionEnded).is_err() {
                        break;
                    }
                }
            }
        }
    }
    debug!("session watch stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn logout_transition_becomes_session_ended() {
        let (state_tx, state_rx) = watch::channel(AuthState::Authenticated);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(watch_session(state_rx, tx, cancel.clone()));

        state_tx.send(AuthState::Unauthenticated).unwrap();
        let action = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert!(matches!(action, Some(Action::SessionEnded)));

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn logout_before_first_poll_is_not_lost() {
        let (state_tx, state_rx) = watch::channel(AuthState::Authenticated);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        state_tx.send(AuthState::Unauthenticated).unwrap();
        let task = tokio::spawn(watch_session(state_rx, tx, cancel.clone()));

        let action = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert!(matches!(action, Some(Action::SessionEnded)));

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn sign_in_is_not_reported() {
        let (state_tx, state_rx) = watch::channel(AuthState::Unauthenticated);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(watch_session(state_rx, tx, cancel.clone()));

        state_tx.send(AuthState::Authenticated).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        cancel.cancel();
        task.await.unwrap();
    }
}

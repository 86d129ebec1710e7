// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide identity session.
//!
//! `IdentitySession::init` subscribes to the provider's session changes and
//! republishes them; teardown (or drop) ends the subscription. Coordinators
//! read the current identity through a cloned [`SessionHandle`].

use crate::models::Identity;
use crate::services::identity::IdentityProvider;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Known session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No notification from the provider yet; identity-dependent views wait.
    Pending,
    /// Provider has reported; `None` means signed out.
    Ready(Option<Identity>),
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Ready(identity) => identity.as_ref(),
            SessionState::Pending => None,
        }
    }
}

/// Subscription to the identity provider, alive from `init` to teardown.
pub struct IdentitySession {
    state: watch::Receiver<SessionState>,
    forwarder: JoinHandle<()>,
}

impl IdentitySession {
    /// Subscribe to `provider` and start tracking its session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(provider: &dyn IdentityProvider) -> Self {
        let mut changes = provider.session_changes();
        let (tx, state) = watch::channel(SessionState::Pending);

        let forwarder = tokio::spawn(async move {
            loop {
                let next = changes.borrow_and_update().clone();
                if next.is_ready() {
                    tracing::info!(
                        identity_id = next.identity().map(|i| i.id.as_str()),
                        "Identity session changed"
                    );
                }
                // Whole-value replacement; readers never see a partial update.
                tx.send_replace(next);

                if changes.changed().await.is_err() {
                    tracing::debug!("Identity provider closed its session channel");
                    break;
                }
            }
        });

        Self { state, forwarder }
    }

    /// Cheap, clonable read access for coordinators.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: self.state.clone(),
        }
    }

    /// Unsubscribe from the provider. The last known state stays readable
    /// through existing handles.
    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for IdentitySession {
    fn drop(&mut self) {
        self.forwarder.abort();
        tracing::debug!("Identity session torn down");
    }
}

/// Read access to the current identity.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Handle with a fixed state, for views driven without a provider.
    pub fn fixed(state: SessionState) -> Self {
        let (_tx, state) = watch::channel(state);
        Self { state }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Current identity; `None` while pending or signed out.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Wait for the provider's first notification, then return the identity.
    pub async fn ready(&self) -> Option<Identity> {
        let mut state = self.state.clone();
        let identity = match state.wait_for(SessionState::is_ready).await {
            Ok(ready) => ready.identity().cloned(),
            Err(_) => None,
        };
        identity
    }

    /// Receiver for views that re-render on session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

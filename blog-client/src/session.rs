//! Who is signed in, as seen by the front ends.
//!
//! The state is an explicit value handed down from the application root,
//! never a global. [`SessionProvider`] keeps it in sync with the auth
//! backend's notifications.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;

use crate::error::GatewayError;
use crate::gateway::AuthBackend;
use crate::models::{AuthEvent, Credentials, Identity, SignUpOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Loading,
    Anonymous,
    Authenticated(Identity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl SessionState {
    /// State before the backend has been asked for an existing session.
    pub fn loading() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    pub fn resolved(identity: Option<Identity>) -> Self {
        Self {
            identity,
            loading: false,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn status(&self) -> AuthStatus {
        match (&self.identity, self.loading) {
            (_, true) => AuthStatus::Loading,
            (Some(identity), false) => AuthStatus::Authenticated(identity.clone()),
            (None, false) => AuthStatus::Anonymous,
        }
    }

    /// Returns `true` when the event changed the state.
    pub fn apply(&mut self, event: &AuthEvent) -> bool {
        let next = match event {
            AuthEvent::InitialSession(identity) => Self::resolved(identity.clone()),
            AuthEvent::SignedIn(identity) | AuthEvent::TokenRefreshed(identity) => {
                Self::resolved(Some(identity.clone()))
            }
            AuthEvent::SignedOut => Self::resolved(None),
        };

        if *self == next {
            return false;
        }
        *self = next;
        true
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

pub struct SessionProvider<A: ?Sized> {
    backend: Arc<A>,
    state: Mutex<SessionState>,
}

impl<A: AuthBackend + ?Sized> SessionProvider<A> {
    pub fn new(backend: Arc<A>) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState::loading()),
        }
    }

    pub fn backend(&self) -> &Arc<A> {
        &self.backend
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Subscribe before [`init`](Self::init) so no notification is missed.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.backend.subscribe()
    }

    /// Resolves the loading state from any existing session.
    pub async fn init(&self) -> SessionState {
        let identity = match self.backend.get_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                tracing::warn!("Could not restore session: {}", e);
                None
            }
        };

        let state = SessionState::resolved(identity);
        *self.state.lock().await = state.clone();
        state
    }

    pub async fn apply(&self, event: &AuthEvent) -> SessionState {
        let mut state = self.state.lock().await;
        if state.apply(event) {
            tracing::debug!("Session state changed: {:?}", event);
        }
        state.clone()
    }

    /// Waits for the next notification and returns the updated state, or
    /// `None` once the backend has gone away.
    pub async fn next_state(
        &self,
        events: &mut broadcast::Receiver<AuthEvent>,
    ) -> Option<SessionState> {
        loop {
            match events.recv().await {
                Ok(event) => return Some(self.apply(&event).await),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} auth notifications", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub async fn sign_in(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Identity, GatewayError> {
        let session = self
            .backend
            .sign_in(Credentials::new(email, password))
            .await?;
        self.apply(&AuthEvent::SignedIn(session.user.clone())).await;
        Ok(session.user)
    }

    pub async fn sign_up(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<SignUpOutcome, GatewayError> {
        let outcome = self
            .backend
            .sign_up(Credentials::new(email, password))
            .await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.apply(&AuthEvent::SignedIn(session.user.clone())).await;
        }
        Ok(outcome)
    }

    pub async fn sign_out(&self) -> Result<(), GatewayError> {
        self.backend.sign_out().await?;
        self.apply(&AuthEvent::SignedOut).await;
        Ok(())
    }
}

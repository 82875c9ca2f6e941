//! Injected session state with an explicit subscribe/update contract.
//!
//! The session replaces ambient shared storage: components that need to know
//! who is logged in receive a `Session` handle and either read
//! [`Session::current`] or watch [`Session::subscribe`] for changes. Auth
//! providers are out of scope; whatever produces a [`CurrentUser`] calls
//! [`Session::login`].

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::CurrentUser;

/// Shared, cheaply cloneable session handle.
///
/// All clones observe the same login state. Scoped to one browser tab;
/// cross-tab consistency is not attempted.
#[derive(Clone)]
pub struct Session {
    user: Arc<watch::Sender<Option<CurrentUser>>>,
}

impl Session {
    /// Create a logged-out session.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { user: Arc::new(tx) }
    }

    /// Record a successful login.
    pub fn login(&self, user: CurrentUser) {
        tracing::info!(user_id = %user.id, "session login");
        self.user.send_replace(Some(user));
    }

    /// Clear the session.
    pub fn logout(&self) {
        tracing::info!("session logout");
        self.user.send_replace(None);
    }

    /// The current user, if logged in.
    #[must_use]
    pub fn current(&self) -> Option<CurrentUser> {
        self.user.borrow().clone()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Watch for login-state changes.
    ///
    /// The receiver yields the new state on every [`Session::login`] /
    /// [`Session::logout`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.user.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

//! Session context: who is logged in, and whether we know yet.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`Session`] exists per running client. Views read [`AuthState`] to
//! decide between rendering, waiting, and redirecting to login; services read
//! it to gate identity-scoped queries.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel so observers always see a
//! whole snapshot and can await changes. `is_authenticated` is derived from
//! `user` and never stored, so the two cannot disagree.
//!
//! A startup probe (`GET /me`) can race with an explicit login or logout. Each
//! identity change bumps an epoch; a probe that started under an older epoch
//! only flips `loading` and leaves `user` alone. A login checks the epoch it
//! started under before committing, so a logout during its settle delay sticks.
//!
//! ERROR HANDLING
//! ==============
//! Probe failures are never surfaced: the session simply starts signed out.
//! Login failures leave state untouched and return the error. Logout always
//! clears local state, then reports the endpoint's error if there was one.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::scope::ViewScope;
use crate::config::SessionTimings;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::query::cache::QueryCache;

/// Snapshot of the session as observers see it.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// True until the startup probe has settled.
    pub loading: bool,
}

impl AuthState {
    /// Initial state: identity unknown, probe pending.
    #[must_use]
    pub const fn probing() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub const fn signed_out() -> Self {
        Self { user: None, loading: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::probing()
    }
}

/// Whether a protected view should send the visitor to the login page.
///
/// Never true while loading, so a restored session does not flash a redirect.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Whether queries that depend on the logged-in identity may run.
#[must_use]
pub fn can_load_identity_queries(state: &AuthState) -> bool {
    !state.loading && state.user.is_some()
}

/// The logged-in identity for one running client, with its startup probe.
pub struct Session {
    api: ApiClient,
    cache: QueryCache,
    timings: SessionTimings,
    state: watch::Sender<AuthState>,
    scope: ViewScope,
    epoch: AtomicU64,
}

impl Session {
    /// A session in the [`AuthState::probing`] state. Call [`Session::start`]
    /// to resolve it.
    #[must_use]
    pub fn new(api: ApiClient, cache: QueryCache, timings: SessionTimings) -> Self {
        let (state, _) = watch::channel(AuthState::probing());
        Self { api, cache, timings, state, scope: ViewScope::new(), epoch: AtomicU64::new(0) }
    }

    // =============================================================
    // Lifecycle
    // =============================================================

    /// Probe `GET /me` once and settle `loading`.
    ///
    /// Any probe failure leaves the session signed out. After the probe, the
    /// session waits the configured startup grace before `loading` turns
    /// false. Results arriving after [`Session::close`] are discarded.
    pub async fn start(&self) {
        let epoch = self.epoch.load(Ordering::Acquire);
        let Some(result) = self.scope.guard(self.api.current_user()).await else {
            return;
        };

        let user = match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, "session restored");
                Some(user)
            }
            Err(ApiError::Unauthenticated) => {
                tracing::debug!("no active session");
                None
            }
            Err(err) if err.retryable() => {
                tracing::warn!(error = %err, "session probe failed; starting signed out");
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "session probe rejected; starting signed out");
                None
            }
        };

        if self.epoch.load(Ordering::Acquire) == epoch {
            self.state.send_modify(|state| state.user = user);
        } else {
            tracing::debug!("identity changed during probe; keeping newer user");
        }

        if !self.timings.startup_grace.is_zero() {
            tokio::time::sleep(self.timings.startup_grace).await;
        }
        if !self.scope.is_mounted() {
            return;
        }
        self.state.send_modify(|state| state.loading = false);
    }

    /// Resolve once `loading` is false and return that snapshot.
    pub async fn wait_until_ready(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Tear down: late responses are ignored and identity data is dropped.
    pub fn close(&self) {
        self.scope.unmount();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.state.send_replace(AuthState::signed_out());
        self.cache.clear_identity_scoped();
        tracing::debug!("session closed");
    }

    // =============================================================
    // Identity changes
    // =============================================================

    /// Log in with email and password.
    ///
    /// On success the returned user becomes the session user. The call waits
    /// the configured settle delay first, so the next request carries the new
    /// session cookie.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] for a blank email or password,
    /// [`ApiError::Superseded`] when a logout or close lands before the login
    /// settles, otherwise the endpoint's error. State is unchanged on error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput("email and password are required".to_owned()));
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let response = self.api.login(email, password).await.inspect_err(|err| {
            tracing::info!(error = %err, "login failed");
        })?;
        let user = match response.user {
            Some(user) if response.success => user,
            _ => {
                let message = if response.message.is_empty() { "Login failed".to_owned() } else { response.message };
                tracing::info!(%message, "login refused");
                return Err(ApiError::Rejected { status: 200, message });
            }
        };

        if !self.timings.login_settle.is_zero() {
            tokio::time::sleep(self.timings.login_settle).await;
        }

        // A logout or close while settling wins over this login.
        if self.epoch.compare_exchange(epoch, epoch + 1, Ordering::AcqRel, Ordering::Acquire).is_err() {
            tracing::info!(user_id = user.id, "identity changed during login; discarding");
            return Err(ApiError::Superseded);
        }
        self.cache.clear_identity_scoped();
        self.state.send_modify(|state| state.user = Some(user.clone()));
        tracing::info!(user_id = user.id, role = ?user.role, "logged in");
        Ok(user)
    }

    /// Log out. Local state is cleared whatever the endpoint answers.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's error after local state has been cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.logout().await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "logout endpoint failed; clearing local session anyway");
        }

        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.state.send_modify(|state| state.user = None);
        self.cache.clear_identity_scoped();
        tracing::info!("logged out");
        result
    }

    // =============================================================
    // Accessors
    // =============================================================

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver that observes every state change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

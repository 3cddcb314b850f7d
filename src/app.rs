//! Application handle.
//!
//! DESIGN
//! ======
//! `App` is built once per process (or per test) and passed to consumers. It
//! owns exactly one API client, one query cache and one session; the services
//! share them. Nothing here is global, so tests build isolated instances over
//! a scripted transport.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::transport::Transport;
use crate::query::cache::QueryCache;
use crate::services::catalog::CatalogService;
use crate::services::community::CommunityService;
use crate::services::learning::LearningService;
use crate::state::auth::{AuthState, Session};

/// Shared client state. Clone is cheap; every field is a shared handle.
#[derive(Clone)]
pub struct App {
    pub api: ApiClient,
    pub cache: QueryCache,
    pub session: Arc<Session>,
    pub catalog: CatalogService,
    pub learning: LearningService,
    pub community: CommunityService,
}

impl App {
    /// Build an app that talks HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_api(ApiClient::from_config(config)?, config))
    }

    /// Build an app over any [`Transport`].
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self::with_api(ApiClient::new(transport), config)
    }

    fn with_api(api: ApiClient, config: &ClientConfig) -> Self {
        let cache = QueryCache::new(config.queries);
        let session = Arc::new(Session::new(api.clone(), cache.clone(), config.session));
        Self {
            catalog: CatalogService::new(api.clone(), cache.clone()),
            learning: LearningService::new(api.clone(), cache.clone(), Arc::clone(&session)),
            community: CommunityService::new(api.clone(), cache.clone()),
            api,
            cache,
            session,
        }
    }

    /// Run the session's startup probe and return the settled state.
    pub async fn start(&self) -> AuthState {
        self.session.start().await;
        self.session.state()
    }

    /// Tear the session down; late responses are ignored afterwards.
    pub fn shutdown(&self) {
        self.session.close();
    }
}

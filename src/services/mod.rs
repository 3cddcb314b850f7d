//! Resource services: the contract between views and the query cache.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views never call [`crate::net::api::ApiClient`] directly for reads. They go
//! through a service, which picks the [`QueryKey`], decides whether the query
//! may run yet, and invalidates the right keys after a mutation.

pub mod catalog;
pub mod community;
pub mod learning;

use std::future::Future;
use std::sync::Arc;

use crate::net::error::ApiError;
use crate::query::cache::{Query, QueryCache};
use crate::query::key::QueryKey;

/// Read an always-enabled query.
///
/// # Errors
///
/// Returns the request's [`ApiError`], or [`ApiError::InvalidInput`] if the
/// query turned out to be disabled.
pub(crate) async fn read<T, F, Fut>(cache: &QueryCache, query: &Query, fetcher: F) -> Result<Arc<T>, ApiError>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    cache
        .fetch(query, fetcher)
        .await?
        .ok_or_else(|| disabled(query.key()))
}

fn disabled(key: &QueryKey) -> ApiError {
    ApiError::InvalidInput(format!("query {key} is not enabled"))
}

//! Course discussion threads.

#[cfg(test)]
#[path = "community_test.rs"]
mod community_test;

use std::sync::Arc;

use super::read;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::Comment;
use crate::query::cache::QueryCache;
use crate::query::key::QueryKey;

#[derive(Clone)]
pub struct CommunityService {
    api: ApiClient,
    cache: QueryCache,
}

impl CommunityService {
    #[must_use]
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// Comments on `course_id`, oldest first as the backend sends them.
    ///
    /// # Errors
    ///
    /// Returns the final [`ApiError`] after read retries.
    pub async fn comments(&self, course_id: i64) -> Result<Arc<Vec<Comment>>, ApiError> {
        let query = self.cache.query(QueryKey::Comments(course_id));
        let api = self.api.clone();
        read(&self.cache, &query, move || {
            let api = api.clone();
            async move { api.course_comments(course_id).await }
        })
        .await
    }

    /// Post a comment. Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] for blank text, [`ApiError::Unauthenticated`]
    /// when signed out, otherwise the endpoint's error.
    pub async fn post_comment(&self, course_id: i64, text: &str) -> Result<Comment, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::InvalidInput("comment text must not be empty".to_owned()));
        }
        let comment = self.api.create_comment(course_id, text).await?;
        tracing::debug!(course_id, comment_id = comment.id, "comment posted");
        self.cache.invalidate(&QueryKey::Comments(course_id));
        Ok(comment)
    }

    /// Delete one of `course_id`'s comments.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's [`ApiError`].
    pub async fn delete_comment(&self, course_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.api.delete_comment(comment_id).await?;
        tracing::debug!(course_id, comment_id, "comment deleted");
        self.cache.invalidate(&QueryKey::Comments(course_id));
        Ok(())
    }
}

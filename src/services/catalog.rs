//! Course catalog reads and client-side search.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::sync::Arc;

use super::read;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::Course;
use crate::query::cache::QueryCache;
use crate::query::key::QueryKey;

/// Search box text plus the level checkboxes of the catalog page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Matched case-insensitively against title and description.
    pub text: String,
    /// Accepted levels; empty accepts every level.
    pub levels: Vec<String>,
}

impl CourseFilter {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), levels: Vec::new() }
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.levels.push(level.into());
        self
    }

    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let needle = self.text.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || course.title.to_lowercase().contains(&needle)
            || course.description.to_lowercase().contains(&needle);
        let level_ok = self.levels.is_empty()
            || course
                .level
                .as_deref()
                .is_some_and(|level| self.levels.iter().any(|wanted| wanted.eq_ignore_ascii_case(level)));
        text_ok && level_ok
    }
}

/// Apply `filter`, keeping the backend's order.
#[must_use]
pub fn filter_courses(courses: &[Course], filter: &CourseFilter) -> Vec<Course> {
    courses.iter().filter(|course| filter.matches(course)).cloned().collect()
}

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    cache: QueryCache,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// Course list, optionally only published courses.
    ///
    /// # Errors
    ///
    /// Returns the final [`ApiError`] after read retries.
    pub async fn courses(&self, published_only: Option<bool>) -> Result<Arc<Vec<Course>>, ApiError> {
        let query = self.cache.query(QueryKey::Courses { published_only });
        let api = self.api.clone();
        read(&self.cache, &query, move || {
            let api = api.clone();
            async move { api.courses(published_only).await }
        })
        .await
    }

    /// One course, or `None` when the backend does not know it.
    ///
    /// # Errors
    ///
    /// Returns any [`ApiError`] other than [`ApiError::NotFound`].
    pub async fn course(&self, course_id: i64) -> Result<Option<Arc<Course>>, ApiError> {
        let query = self.cache.query(QueryKey::Course(course_id));
        let api = self.api.clone();
        let result = read(&self.cache, &query, move || {
            let api = api.clone();
            async move { api.course(course_id).await }
        })
        .await;
        match result {
            Ok(course) => Ok(Some(course)),
            Err(ApiError::NotFound { .. }) => {
                tracing::debug!(course_id, "course not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Published courses that match `filter`.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from loading the published list.
    pub async fn search(&self, filter: &CourseFilter) -> Result<Vec<Course>, ApiError> {
        let courses = self.courses(Some(true)).await?;
        Ok(filter_courses(&courses, filter))
    }
}

//! Enrollment reads and writes for the signed-in user.
//!
//! DESIGN
//! ======
//! `my-enrollments` is identity-scoped: it only runs once the session probe
//! has settled with a user present, and every successful enrollment or
//! progress update invalidates it so the next read goes to the network.

#[cfg(test)]
#[path = "learning_test.rs"]
mod learning_test;

use std::sync::Arc;

use serde::Serialize;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{Enrollment, EnrollmentWithCourse};
use crate::query::cache::QueryCache;
use crate::query::key::QueryKey;
use crate::state::auth::{Session, can_load_identity_queries};

const MAX_PROGRESS: i64 = 100;

/// Aggregate numbers shown on the profile page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LearningSummary {
    pub total: usize,
    /// Enrollments below 100 %.
    pub active: usize,
    pub completed: usize,
    /// Mean progress, rounded to the nearest percent. Zero with no enrollments.
    pub average_progress: u8,
}

impl LearningSummary {
    #[must_use]
    pub fn from_rows(rows: &[EnrollmentWithCourse]) -> Self {
        let total = rows.len();
        if total == 0 {
            return Self::default();
        }
        let completed = rows.iter().filter(|row| i64::from(row.progress_percent) >= MAX_PROGRESS).count();
        let sum: usize = rows.iter().map(|row| usize::from(row.progress_percent)).sum();
        let mean = (sum + total / 2) / total;
        Self {
            total,
            active: total - completed,
            completed,
            average_progress: u8::try_from(mean).unwrap_or(u8::MAX),
        }
    }
}

/// Check a progress value before it goes on the wire.
///
/// # Errors
///
/// [`ApiError::InvalidInput`] outside `0..=100`.
pub fn validate_progress(progress_percent: i64) -> Result<u8, ApiError> {
    if (0..=MAX_PROGRESS).contains(&progress_percent) {
        u8::try_from(progress_percent).map_err(|_| progress_out_of_range(progress_percent))
    } else {
        Err(progress_out_of_range(progress_percent))
    }
}

fn progress_out_of_range(value: i64) -> ApiError {
    ApiError::InvalidInput(format!("progress must be between 0 and 100, got {value}"))
}

#[derive(Clone)]
pub struct LearningService {
    api: ApiClient,
    cache: QueryCache,
    session: Arc<Session>,
}

impl LearningService {
    #[must_use]
    pub fn new(api: ApiClient, cache: QueryCache, session: Arc<Session>) -> Self {
        Self { api, cache, session }
    }

    /// The signed-in user's enrollments with course detail.
    ///
    /// `Ok(None)` while the session is still loading or nobody is signed in;
    /// no request is made in that case.
    ///
    /// # Errors
    ///
    /// Returns the final [`ApiError`] after read retries.
    pub async fn my_enrollments(&self) -> Result<Option<Arc<Vec<EnrollmentWithCourse>>>, ApiError> {
        let enabled = can_load_identity_queries(&self.session.state());
        let query = self.cache.query(QueryKey::MyEnrollments).enabled(enabled);
        let api = self.api.clone();
        self.cache
            .fetch(&query, move || {
                let api = api.clone();
                async move { api.my_courses().await }
            })
            .await
    }

    /// Summary of [`LearningService::my_enrollments`]; `None` when it is disabled.
    ///
    /// # Errors
    ///
    /// Propagates the enrollment read's [`ApiError`].
    pub async fn summary(&self) -> Result<Option<LearningSummary>, ApiError> {
        Ok(self.my_enrollments().await?.map(|rows| LearningSummary::from_rows(&rows)))
    }

    /// Whether the signed-in user is enrolled in `course_id`. False when signed out.
    ///
    /// # Errors
    ///
    /// Propagates the enrollment read's [`ApiError`].
    pub async fn is_enrolled(&self, course_id: i64) -> Result<bool, ApiError> {
        Ok(self
            .my_enrollments()
            .await?
            .is_some_and(|rows| rows.iter().any(|row| row.course.id == course_id)))
    }

    /// Enroll in a course, then mark `my-enrollments` stale.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's [`ApiError`]; writes are not retried.
    pub async fn enroll(&self, course_id: i64) -> Result<Enrollment, ApiError> {
        let enrollment = self.api.enroll(course_id).await?;
        tracing::info!(course_id, enrollment_id = enrollment.id, "enrolled");
        self.cache.invalidate(&QueryKey::MyEnrollments);
        Ok(enrollment)
    }

    /// Record progress on an enrollment, then mark `my-enrollments` stale.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidInput`] outside `0..=100` (nothing is sent),
    /// otherwise the endpoint's [`ApiError`].
    pub async fn update_progress(&self, enrollment_id: i64, progress_percent: i64) -> Result<Enrollment, ApiError> {
        let progress = validate_progress(progress_percent)?;
        let enrollment = self.api.update_progress(enrollment_id, progress).await?;
        tracing::debug!(enrollment_id, progress, "progress updated");
        self.cache.invalidate(&QueryKey::MyEnrollments);
        Ok(enrollment)
    }
}

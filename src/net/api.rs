//! REST API client for the Onlearn backend.
//!
//! Every backend call funnels through [`ApiClient::request`], which attaches
//! the transport-level policies (cookies, JSON content type) and turns any
//! non-2xx status into an [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! A `401` becomes [`ApiError::Unauthenticated`] and nothing more: the client
//! never logs the user out or redirects. Probes treat it as "no session",
//! explicit mutations surface it.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{ApiRequest, HttpTransport, RawResponse, Transport};
use super::types::{
    Comment, CommentRequest, Course, Enrollment, EnrollRequest, EnrollmentWithCourse, LoginRequest, LoginResponse,
    ProgressUpdateRequest, User,
};
use crate::config::ClientConfig;

fn courses_endpoint(published_only: Option<bool>) -> String {
    match published_only {
        Some(flag) => format!("/courses?published_only={flag}"),
        None => "/courses".to_owned(),
    }
}

fn course_endpoint(course_id: i64) -> String {
    format!("/courses/{course_id}")
}

fn progress_endpoint(enrollment_id: i64) -> String {
    format!("/enrollments/{enrollment_id}/progress")
}

fn course_comments_endpoint(course_id: i64) -> String {
    format!("/courses/{course_id}/comments")
}

fn comment_endpoint(comment_id: i64) -> String {
    format!("/comments/{comment_id}")
}

/// Typed wrapper over the backend contract.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a client over [`HttpTransport`] using `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.base_url, config.timeouts)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Send `request` and return the raw response if its status is 2xx.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, or the classified status failure.
    pub async fn request(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, "api request");

        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::warn!(%method, %path, error = %e, "api transport failed");
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let err = ApiError::from_status(response.status, &response.status_text, &response.body);
        if matches!(err, ApiError::Unauthenticated) {
            tracing::debug!(%method, %path, "api request unauthenticated");
        } else {
            tracing::warn!(%method, %path, status = response.status, code = err.error_code(), "api request failed");
        }
        Err(err)
    }

    async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.request(request).await?;
        decode_body(&response.body)
    }

    async fn request_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.request(request).await?;
        Ok(())
    }

    /// `POST /login`. The backend answers with a session cookie.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the credentials are rejected or the call fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post("/login").json(&LoginRequest { email, password })?;
        self.request_json(request).await
    }

    /// `POST /logout`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.request_empty(ApiRequest::post("/logout")).await
    }

    /// `GET /me`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when there is no session.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.request_json(ApiRequest::get("/me")).await
    }

    /// `GET /courses`, optionally filtered by publication state.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn courses(&self, published_only: Option<bool>) -> Result<Vec<Course>, ApiError> {
        self.request_json(ApiRequest::get(courses_endpoint(published_only))).await
    }

    /// `GET /courses/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown course.
    pub async fn course(&self, course_id: i64) -> Result<Course, ApiError> {
        self.request_json(ApiRequest::get(course_endpoint(course_id))).await
    }

    /// `POST /enroll` for the current user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the enrollment is rejected or the call fails.
    pub async fn enroll(&self, course_id: i64) -> Result<Enrollment, ApiError> {
        let request = ApiRequest::post("/enroll").json(&EnrollRequest { course_id })?;
        self.request_json(request).await
    }

    /// `GET /my-courses`: the current user's enrollments with course detail.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when there is no session.
    pub async fn my_courses(&self) -> Result<Vec<EnrollmentWithCourse>, ApiError> {
        self.request_json(ApiRequest::get("/my-courses")).await
    }

    /// `PATCH /enrollments/{id}/progress`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the update is rejected or the call fails.
    pub async fn update_progress(&self, enrollment_id: i64, progress_percent: u8) -> Result<Enrollment, ApiError> {
        let request = ApiRequest::patch(progress_endpoint(enrollment_id)).json(&ProgressUpdateRequest { progress_percent })?;
        self.request_json(request).await
    }

    /// `GET /courses/{id}/comments`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn course_comments(&self, course_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.request_json(ApiRequest::get(course_comments_endpoint(course_id))).await
    }

    /// `POST /courses/{id}/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when there is no session.
    pub async fn create_comment(&self, course_id: i64, text: &str) -> Result<Comment, ApiError> {
        let request = ApiRequest::post(course_comments_endpoint(course_id)).json(&CommentRequest { text })?;
        self.request_json(request).await
    }

    /// `DELETE /comments/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the deletion is rejected or the call fails.
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        self.request_empty(ApiRequest::delete(comment_endpoint(comment_id))).await
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

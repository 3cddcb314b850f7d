//! Wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON bodies field-for-field so serde can
//! decode responses directly. Snapshots such as [`User`] are immutable from
//! the client's point of view: they are replaced wholesale, never patched.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Role assigned to a user account by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// An authenticated user as returned by `GET /me` and `POST /login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
}

/// Body of a successful `POST /login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Absent or null when the backend refuses the login.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: String,
}

/// A catalog course.
///
/// Marketing fields (`image`, `rating`, ...) are optional on the wire and may
/// be `null` or missing entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub teacher_id: i64,
    pub is_published: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// The relationship between a user and a course.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub progress_percent: u8,
}

/// One row of `GET /my-courses`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentWithCourse {
    pub enrollment_id: i64,
    pub course: Course,
    pub progress_percent: u8,
}

/// A discussion comment attached to a course.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub text: String,
    /// Creation timestamp as sent by the backend (ISO-8601).
    pub created_at: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollRequest {
    pub course_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressUpdateRequest {
    pub progress_percent: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub text: &'a str,
}

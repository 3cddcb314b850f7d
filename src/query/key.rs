//! Logical identities for cached queries.

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;

use std::fmt;

/// Resource kind plus the parameters that select one instance of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Course list, optionally filtered by publication state.
    Courses { published_only: Option<bool> },
    /// A single course by id.
    Course(i64),
    /// The authenticated user's enrollments with course detail.
    MyEnrollments,
    /// Comments attached to a course.
    Comments(i64),
}

impl QueryKey {
    /// Whether the cached result depends on who is logged in.
    ///
    /// Identity-scoped entries are dropped whenever the session identity
    /// changes so one user's data never reaches the next.
    #[must_use]
    pub fn is_identity_scoped(&self) -> bool {
        matches!(self, Self::MyEnrollments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Courses { published_only: None } => f.write_str("courses"),
            Self::Courses { published_only: Some(flag) } => write!(f, "courses?published_only={flag}"),
            Self::Course(id) => write!(f, "course/{id}"),
            Self::MyEnrollments => f.write_str("my-enrollments"),
            Self::Comments(course_id) => write!(f, "comments/{course_id}"),
        }
    }
}

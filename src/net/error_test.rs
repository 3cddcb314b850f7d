use super::*;

#[test]
fn status_401_maps_to_unauthenticated_with_fixed_message() {
    let err = ApiError::from_status(401, "Unauthorized", "{\"detail\":\"Not authenticated\"}");
    assert_eq!(err, ApiError::Unauthenticated);
    assert_eq!(err.to_string(), "Please login first");
}

#[test]
fn status_404_maps_to_not_found() {
    let err = ApiError::from_status(404, "Not Found", "Course not found");
    assert_eq!(err, ApiError::NotFound { message: "Course not found".to_owned() });
}

#[test]
fn other_4xx_is_a_rejection_carrying_body_verbatim() {
    let body = "{\"detail\":\"Enrollment already exists\"}";
    let err = ApiError::from_status(400, "Bad Request", body);
    assert_eq!(err, ApiError::Rejected { status: 400, message: body.to_owned() });
    assert_eq!(err.to_string(), body);
}

#[test]
fn blank_body_falls_back_to_status_text() {
    let err = ApiError::from_status(503, "Service Unavailable", "  ");
    assert_eq!(err.to_string(), "Request failed: Service Unavailable");
    assert_eq!(err.status(), Some(503));
}

#[test]
fn only_transient_failures_are_retryable() {
    assert!(ApiError::Network("reset".to_owned()).retryable());
    assert!(ApiError::from_status(500, "Internal Server Error", "boom").retryable());

    assert!(!ApiError::Unauthenticated.retryable());
    assert!(!ApiError::from_status(422, "Unprocessable Entity", "bad").retryable());
    assert!(!ApiError::from_status(404, "Not Found", "").retryable());
    assert!(!ApiError::Decode("eof".to_owned()).retryable());
    assert!(!ApiError::InvalidInput("blank".to_owned()).retryable());
}

#[test]
fn error_codes_are_distinct() {
    let errors = [
        ApiError::Unauthenticated,
        ApiError::NotFound { message: String::new() },
        ApiError::Rejected { status: 400, message: String::new() },
        ApiError::Server { status: 500, message: String::new() },
        ApiError::Network(String::new()),
        ApiError::Decode(String::new()),
        ApiError::InvalidInput(String::new()),
        ApiError::Superseded,
    ];
    let mut codes: Vec<_> = errors.iter().map(ApiError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn unauthenticated_display_matches_login_prompt() {
    assert_eq!(ApiError::Unauthenticated.to_string(), UNAUTHENTICATED_MESSAGE);
}

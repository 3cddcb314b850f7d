use serde_json::json;

use super::*;

#[test]
fn role_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
    let role: Role = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(role, Role::Admin);
}

#[test]
fn unknown_role_is_rejected() {
    assert!(serde_json::from_str::<Role>("\"guest\"").is_err());
}

#[test]
fn login_response_decodes_user_snapshot() {
    let body = json!({
        "success": true,
        "user": { "id": 1, "name": "A", "email": "a@b.com", "role": "student" },
        "message": "ok"
    });
    let resp: LoginResponse = serde_json::from_value(body).unwrap();
    assert!(resp.success);
    let user = resp.user.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.role, Role::Student);
}

#[test]
fn login_refusal_decodes_without_user() {
    let body = json!({ "success": false, "user": null, "message": "Invalid credentials" });
    let resp: LoginResponse = serde_json::from_value(body).unwrap();
    assert!(!resp.success);
    assert!(resp.user.is_none());
    assert_eq!(resp.message, "Invalid credentials");
}

#[test]
fn course_tolerates_missing_and_null_marketing_fields() {
    let body = json!({
        "id": 4,
        "title": "Machine Learning Basics",
        "description": "Introduction to ML concepts",
        "teacher_id": 4,
        "is_published": false,
        "rating": null
    });
    let course: Course = serde_json::from_value(body).unwrap();
    assert_eq!(course.id, 4);
    assert!(!course.is_published);
    assert_eq!(course.rating, None);
    assert_eq!(course.level, None);
    assert_eq!(course.image, None);
}

#[test]
fn enrollment_with_course_nests_course() {
    let body = json!({
        "enrollment_id": 2,
        "progress_percent": 20,
        "course": {
            "id": 2,
            "title": "Advanced Web Development",
            "description": "Build modern web applications",
            "teacher_id": 3,
            "is_published": true
        }
    });
    let row: EnrollmentWithCourse = serde_json::from_value(body).unwrap();
    assert_eq!(row.enrollment_id, 2);
    assert_eq!(row.course.teacher_id, 3);
    assert_eq!(row.progress_percent, 20);
}

#[test]
fn comment_user_name_is_optional() {
    let body = json!({
        "id": 9,
        "user_id": 1,
        "course_id": 3,
        "text": "Great course",
        "created_at": "2024-11-15T10:00:00Z"
    });
    let comment: Comment = serde_json::from_value(body).unwrap();
    assert_eq!(comment.user_name, None);
    assert_eq!(comment.text, "Great course");
}

#[test]
fn request_bodies_use_backend_field_names() {
    let login = serde_json::to_value(LoginRequest { email: "a@b.com", password: "pw" }).unwrap();
    assert_eq!(login, json!({ "email": "a@b.com", "password": "pw" }));

    let enroll = serde_json::to_value(EnrollRequest { course_id: 7 }).unwrap();
    assert_eq!(enroll, json!({ "course_id": 7 }));

    let progress = serde_json::to_value(ProgressUpdateRequest { progress_percent: 55 }).unwrap();
    assert_eq!(progress, json!({ "progress_percent": 55 }));

    let comment = serde_json::to_value(CommentRequest { text: "hi" }).unwrap();
    assert_eq!(comment, json!({ "text": "hi" }));
}

use serde_json::json;

use super::*;
use crate::config::QueryDefaults;
use crate::test_helpers::{MockTransport, client_over, comment_json, empty_ok, ok, status};

fn service_over(transport: &Arc<MockTransport>) -> CommunityService {
    CommunityService::new(client_over(transport), QueryCache::new(QueryDefaults::default()))
}

#[tokio::test]
async fn comments_are_cached() {
    let transport = Arc::new(MockTransport::new().on(
        "GET",
        "/courses/1/comments",
        ok(json!([comment_json(1, 1, "Great course!")])),
    ));
    let community = service_over(&transport);

    community.comments(1).await.unwrap();
    let comments = community.comments(1).await.unwrap();

    assert_eq!(comments[0].text, "Great course!");
    assert_eq!(transport.call_count("GET", "/courses/1/comments"), 1);
}

#[tokio::test]
async fn posting_trims_text_and_refreshes_thread() {
    let transport = Arc::new(
        MockTransport::new()
            .on("GET", "/courses/1/comments", ok(json!([])))
            .on("GET", "/courses/1/comments", ok(json!([comment_json(5, 1, "Thanks")])))
            .on("POST", "/courses/1/comments", ok(comment_json(5, 1, "Thanks"))),
    );
    let community = service_over(&transport);
    assert!(community.comments(1).await.unwrap().is_empty());

    let posted = community.post_comment(1, "  Thanks \n").await.unwrap();

    assert_eq!(posted.id, 5);
    let sent = transport.calls().into_iter().find(|req| req.method == reqwest::Method::POST).unwrap();
    assert_eq!(sent.body, Some(json!({ "text": "Thanks" })));
    assert_eq!(community.comments(1).await.unwrap().len(), 1);
    assert_eq!(transport.call_count("GET", "/courses/1/comments"), 2);
}

#[tokio::test]
async fn blank_comment_is_not_sent() {
    let transport = Arc::new(MockTransport::new());
    let community = service_over(&transport);

    let err = community.post_comment(1, "   ").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn unauthenticated_post_surfaces_to_caller() {
    let transport = Arc::new(MockTransport::new().on("POST", "/courses/1/comments", status(401, "Not authenticated")));
    let community = service_over(&transport);

    let err = community.post_comment(1, "Hello").await.unwrap_err();

    assert_eq!(err, ApiError::Unauthenticated);
    assert_eq!(err.to_string(), "Please login first");
    assert_eq!(transport.call_count("POST", "/courses/1/comments"), 1);
}

#[tokio::test]
async fn deleting_invalidates_that_course_only() {
    let transport = Arc::new(
        MockTransport::new()
            .on("GET", "/courses/1/comments", ok(json!([comment_json(5, 1, "Thanks")])))
            .on("GET", "/courses/2/comments", ok(json!([])))
            .on("DELETE", "/comments/5", empty_ok()),
    );
    let community = service_over(&transport);
    community.comments(1).await.unwrap();
    community.comments(2).await.unwrap();

    community.delete_comment(1, 5).await.unwrap();
    community.comments(1).await.unwrap();
    community.comments(2).await.unwrap();

    assert_eq!(transport.call_count("GET", "/courses/1/comments"), 2);
    assert_eq!(transport.call_count("GET", "/courses/2/comments"), 1);
}

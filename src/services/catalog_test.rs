use serde_json::json;

use super::*;
use crate::config::QueryDefaults;
use crate::test_helpers::{MockTransport, client_over, course_json, ok, status};

fn course(id: i64, title: &str, description: &str, level: Option<&str>) -> Course {
    Course {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        teacher_id: 3,
        is_published: true,
        image: None,
        rating: None,
        review_count: None,
        price: None,
        level: level.map(str::to_owned),
    }
}

fn service_over(transport: &Arc<MockTransport>) -> CatalogService {
    CatalogService::new(client_over(transport), QueryCache::new(QueryDefaults::default()))
}

#[test]
fn empty_filter_matches_everything() {
    let filter = CourseFilter::default();
    assert!(filter.matches(&course(1, "Rust", "", None)));
}

#[test]
fn text_matches_title_or_description_ignoring_case() {
    let courses = vec![
        course(1, "Introduction to Python", "Basics", Some("Beginner")),
        course(2, "Web Design", "HTML, CSS and a bit of PYTHON tooling", Some("Intermediate")),
        course(3, "Data Science", "Statistics", Some("Advanced")),
    ];

    let found = filter_courses(&courses, &CourseFilter::text("  python "));

    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn level_filter_excludes_courses_without_level() {
    let courses = vec![
        course(1, "Python", "", Some("Beginner")),
        course(2, "Go", "", None),
        course(3, "Rust", "", Some("Advanced")),
    ];

    let filter = CourseFilter::default().with_level("beginner").with_level("Advanced");

    assert_eq!(filter_courses(&courses, &filter).iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn courses_are_cached_per_filter() {
    let transport = Arc::new(
        MockTransport::new()
            .on("GET", "/courses", ok(json!([course_json(1, "Python", true), course_json(2, "Draft", false)])))
            .on("GET", "/courses?published_only=true", ok(json!([course_json(1, "Python", true)]))),
    );
    let catalog = service_over(&transport);

    assert_eq!(catalog.courses(None).await.unwrap().len(), 2);
    assert_eq!(catalog.courses(Some(true)).await.unwrap().len(), 1);
    catalog.courses(None).await.unwrap();

    assert_eq!(transport.call_count("GET", "/courses"), 1);
    assert_eq!(transport.call_count("GET", "/courses?published_only=true"), 1);
}

#[tokio::test]
async fn missing_course_is_none() {
    let transport = Arc::new(MockTransport::new().on("GET", "/courses/99", status(404, "Course not found")));
    let catalog = service_over(&transport);

    assert_eq!(catalog.course(99).await.unwrap(), None);
    assert_eq!(transport.call_count("GET", "/courses/99"), 1);
}

#[tokio::test]
async fn existing_course_is_returned() {
    let transport = Arc::new(MockTransport::new().on("GET", "/courses/1", ok(course_json(1, "Python", true))));
    let catalog = service_over(&transport);

    let found = catalog.course(1).await.unwrap().unwrap();

    assert_eq!(found.title, "Python");
}

#[tokio::test]
async fn search_reads_published_list() {
    let transport = Arc::new(MockTransport::new().on(
        "GET",
        "/courses?published_only=true",
        ok(json!([course_json(1, "Introduction to Python", true), course_json(2, "Web Design", true)])),
    ));
    let catalog = service_over(&transport);

    let found = catalog.search(&CourseFilter::text("web")).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

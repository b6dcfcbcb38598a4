//! Integration tests for the mentorship HTTP API
//! Drives the full router over the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mentorship::api::{create_router, AppState};
use mentorship::store::MemoryStore;

/// Router over a fresh, empty store
struct ApiTestFixture {
    router: Router,
}

impl ApiTestFixture {
    fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        Self {
            router: create_router(state),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body should be JSON")
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, None).await
    }

    /// Create a mentor and return its id
    async fn create_mentor(&self, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/mentors",
                Some(json!({ "name": name, "email": format!("{}@example.com", name) })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("Mentor should have an id").to_string()
    }

    /// Create a student and return its id
    async fn create_student(&self, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/students",
                Some(json!({ "name": name, "email": format!("{}@example.com", name) })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().expect("Student should have an id").to_string()
    }
}

fn ids(students: &Value) -> Vec<String> {
    let mut ids: Vec<String> = students
        .as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

const UNKNOWN_ID: &str = "65f000000000000000000000";

// ============================================================================
// Creation
// ============================================================================

mod creation_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_mentor() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .send(
                Method::POST,
                "/mentors",
                Some(json!({ "name": "Grace", "email": "grace@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Grace");
        assert_eq!(body["email"], "grace@example.com");
        assert_eq!(body["id"].as_str().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_create_student_is_unassigned() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .send(
                Method::POST,
                "/students",
                Some(json!({ "name": "Ada", "email": "ada@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.get("mentor").is_none());

        let (status, unassigned) = fixture.get("/students").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&unassigned), vec![body["id"].as_str().unwrap().to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_allowed() {
        let fixture = ApiTestFixture::new();
        let first = fixture.create_mentor("grace").await;
        let second = fixture.create_mentor("grace").await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .send(Method::POST, "/mentors", Some(json!({ "name": "Grace" })))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture
            .send(
                Method::POST,
                "/students",
                Some(json!({ "name": "  ", "email": "ada@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_rejected() {
        let fixture = ApiTestFixture::new();

        let (status, _) = fixture
            .send(
                Method::POST,
                "/students",
                Some(json!({ "name": 42, "email": "ada@example.com" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Assignment
// ============================================================================

mod assignment_tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_student_then_previous_mentor() {
        let fixture = ApiTestFixture::new();
        let mentor = fixture.create_mentor("grace").await;
        let student = fixture.create_student("ada").await;

        let (status, body) = fixture
            .put(&format!("/assign-student/{}/{}", mentor, student))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], student.as_str());
        assert_eq!(body["mentor"], mentor.as_str());

        let (status, body) = fixture.get(&format!("/previous-mentor/{}", student)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], mentor.as_str());
        assert_eq!(body["name"], "grace");
    }

    #[tokio::test]
    async fn test_change_mentor_last_write_wins() {
        let fixture = ApiTestFixture::new();
        let first = fixture.create_mentor("grace").await;
        let second = fixture.create_mentor("alan").await;
        let student = fixture.create_student("ada").await;

        fixture
            .put(&format!("/assign-mentor/{}/{}", student, first))
            .await;
        let (status, body) = fixture
            .put(&format!("/change-mentor/{}/{}", student, second))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mentor"], second.as_str());

        let (_, of_first) = fixture.get(&format!("/mentor-students/{}", first)).await;
        let (_, of_second) = fixture.get(&format!("/mentor-students/{}", second)).await;
        assert!(ids(&of_first).is_empty());
        assert_eq!(ids(&of_second), vec![student]);
    }

    #[tokio::test]
    async fn test_assign_unknown_student_is_not_found() {
        let fixture = ApiTestFixture::new();
        let mentor = fixture.create_mentor("grace").await;

        let (status, body) = fixture
            .put(&format!("/assign-mentor/{}/{}", UNKNOWN_ID, mentor))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_assign_unknown_mentor_is_accepted() {
        let fixture = ApiTestFixture::new();
        let student = fixture.create_student("ada").await;

        let (status, body) = fixture
            .put(&format!("/assign-mentor/{}/{}", student, UNKNOWN_ID))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mentor"], UNKNOWN_ID);

        // Dangling reference expands to null
        let (status, body) = fixture.get(&format!("/previous-mentor/{}", student)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_malformed_ids_are_rejected() {
        let fixture = ApiTestFixture::new();
        let student = fixture.create_student("ada").await;

        let (status, body) = fixture
            .put(&format!("/assign-mentor/{}/not-an-id", student))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, _) = fixture.get("/previous-mentor/xyz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_students_skips_unknown_ids() {
        let fixture = ApiTestFixture::new();
        let mentor = fixture.create_mentor("grace").await;
        let a = fixture.create_student("ada").await;
        let b = fixture.create_student("bob").await;
        let untouched = fixture.create_student("cy").await;

        let (status, body) = fixture
            .send(
                Method::PUT,
                &format!("/add-students/{}", mentor),
                Some(json!({ "students": [a, b, UNKNOWN_ID] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matched_count"], 2);
        assert_eq!(body["modified_count"], 2);

        let (_, assigned) = fixture.get(&format!("/mentor-students/{}", mentor)).await;
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(ids(&assigned), expected);

        let (_, unassigned) = fixture.get("/students").await;
        assert_eq!(ids(&unassigned), vec![untouched]);
    }

    #[tokio::test]
    async fn test_add_students_requires_students_field() {
        let fixture = ApiTestFixture::new();
        let mentor = fixture.create_mentor("grace").await;

        let (status, _) = fixture
            .send(
                Method::PUT,
                &format!("/add-students/{}", mentor),
                Some(json!({ "ids": [] })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Queries
// ============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_previous_mentor_of_unassigned_student_is_null() {
        let fixture = ApiTestFixture::new();
        let student = fixture.create_student("ada").await;

        let (status, body) = fixture.get(&format!("/previous-mentor/{}", student)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_previous_mentor_of_unknown_student_is_not_found() {
        let fixture = ApiTestFixture::new();

        let (status, body) = fixture.get(&format!("/previous-mentor/{}", UNKNOWN_ID)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_mentor_students_for_unknown_mentor_is_empty() {
        let fixture = ApiTestFixture::new();
        fixture.create_student("ada").await;

        let (status, body) = fixture.get(&format!("/mentor-students/{}", UNKNOWN_ID)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_full_walkthrough() {
        let fixture = ApiTestFixture::new();
        let m1 = fixture.create_mentor("A").await;
        let s1 = fixture.create_student("B").await;
        let s2 = fixture.create_student("C").await;

        let (status, _) = fixture.put(&format!("/assign-mentor/{}/{}", s1, m1)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = fixture
            .send(
                Method::PUT,
                &format!("/add-students/{}", m1),
                Some(json!({ "students": [s2] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, unassigned) = fixture.get("/students").await;
        assert_eq!(unassigned, json!([]));

        let (_, assigned) = fixture.get(&format!("/mentor-students/{}", m1)).await;
        let mut expected = vec![s1.clone(), s2];
        expected.sort();
        assert_eq!(ids(&assigned), expected);

        let (_, mentor) = fixture.get(&format!("/previous-mentor/{}", s1)).await;
        assert_eq!(mentor["id"], m1.as_str());
        assert_eq!(mentor["name"], "A");
        assert_eq!(mentor["email"], "A@example.com");
    }
}

// ============================================================================
// Ambient endpoints
// ============================================================================

mod ambient_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let fixture = ApiTestFixture::new();
        let (status, body) = fixture.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let fixture = ApiTestFixture::new();
        let (status, body) = fixture.get("/api/openapi.json").await;
        assert_eq!(status, StatusCode::OK);

        let paths = body["paths"].as_object().expect("paths should be an object");
        assert!(paths.contains_key("/mentors"));
        assert!(paths.contains_key("/previous-mentor/{studentId}"));
        assert!(paths.contains_key("/add-students/{mentorId}"));
    }

    #[tokio::test]
    async fn test_every_documented_path_is_routed() {
        let fixture = ApiTestFixture::new();
        let student = fixture.create_student("ada").await;
        let (_, doc) = fixture.get("/api/openapi.json").await;

        let paths = doc["paths"].as_object().expect("paths should be an object");
        for (template, operations) in paths {
            let uri = template
                .replace("{studentId}", &student)
                .replace("{mentorId}", UNKNOWN_ID)
                .replace("{newMentorId}", UNKNOWN_ID);
            assert!(!uri.contains('{'), "Unfilled parameter in {}", template);

            for method in operations.as_object().unwrap().keys() {
                let method: Method = method.to_uppercase().parse().unwrap();
                let body = (method != Method::GET).then(|| {
                    json!({ "name": "x", "email": "x@example.com", "students": [] })
                });
                let (status, body) = fixture.send(method.clone(), &uri, body).await;

                assert!(
                    status.is_success(),
                    "{} {} returned {} {}",
                    method,
                    uri,
                    status,
                    body
                );
            }
        }
    }
}

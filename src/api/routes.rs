//! API route definitions

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::error::ErrorResponse;
use super::handlers::{self, AddStudentsRequest, CreatePersonRequest, HealthResponse};
use crate::store::{MentorStore, StudentStore};
use crate::types::{BulkAssignment, Mentor, Student};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mentorship API",
        version = "0.1.0",
        description = "Create mentors and students and manage mentor assignments"
    ),
    tags(
        (name = "mentors", description = "Mentor management"),
        (name = "students", description = "Student management"),
        (name = "assignments", description = "Assigning mentors to students"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::create_mentor,
        handlers::create_student,
        handlers::assign_student,
        handlers::add_students,
        handlers::list_unassigned,
        handlers::change_mentor,
        handlers::assign_mentor,
        handlers::mentor_students,
        handlers::previous_mentor,
    ),
    components(schemas(
        Mentor,
        Student,
        BulkAssignment,
        CreatePersonRequest,
        AddStudentsRequest,
        HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub mentors: Arc<dyn MentorStore>,
    pub students: Arc<dyn StudentStore>,
}

impl AppState {
    /// State backed by a single store serving both collections
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: MentorStore + StudentStore + 'static,
    {
        Self {
            mentors: store.clone(),
            students: store,
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        // Creation
        .route("/mentors", post(handlers::create_mentor))
        .route("/students", post(handlers::create_student))

        // Assignment
        .route("/assign-student/{mentorId}/{studentId}", put(handlers::assign_student))
        .route("/add-students/{mentorId}", put(handlers::add_students))
        .route("/change-mentor/{studentId}/{newMentorId}", put(handlers::change_mentor))
        .route("/assign-mentor/{studentId}/{mentorId}", put(handlers::assign_mentor))

        // Queries
        .route("/students", get(handlers::list_unassigned))
        .route("/mentor-students/{mentorId}", get(handlers::mentor_students))
        .route("/previous-mentor/{studentId}", get(handlers::previous_mentor))

        // Health
        .route("/health", get(handlers::health))

        // OpenAPI document and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

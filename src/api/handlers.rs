//! API request handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ErrorResponse;
use super::extractors::{ValidJson, ValidPath};
use super::routes::AppState;
use crate::error::{Error, Result};
use crate::types::{parse_id, BulkAssignment, Mentor, Student};

// Request bodies

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePersonRequest {
    /// Display name
    pub name: String,
    /// Contact email; not required to be unique
    pub email: String,
}

impl CreatePersonRequest {
    /// Trimmed name and email, rejecting blanks
    fn into_fields(self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("name cannot be empty"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::validation("email cannot be empty"));
        }
        Ok((name.to_string(), email.to_string()))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStudentsRequest {
    /// Ids of the students to assign
    pub students: Vec<String>,
}

// Path parameters, named as in the route templates

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPath {
    pub student_id: String,
    pub mentor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMentorPath {
    pub student_id: String,
    pub new_mentor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorPath {
    pub mentor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPath {
    pub student_id: String,
}

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
}

async fn assign(state: &AppState, student_id: &str, mentor_id: &str) -> Result<Json<Student>> {
    let student_id = parse_id("studentId", student_id)?;
    let mentor_id = parse_id("mentorId", mentor_id)?;

    let student = state.students.set_mentor(student_id, mentor_id).await?;
    tracing::info!("Assigned student {} to mentor {}", student_id, mentor_id);
    Ok(Json(student))
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Create a mentor
#[utoipa::path(
    post,
    path = "/mentors",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Mentor created", body = Mentor),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    tag = "mentors"
)]
pub async fn create_mentor(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreatePersonRequest>,
) -> Result<(StatusCode, Json<Mentor>)> {
    let (name, email) = req.into_fields()?;
    let mentor = state.mentors.create_mentor(name, email).await?;
    tracing::info!("Created mentor {}", mentor.id);
    Ok((StatusCode::CREATED, Json(mentor)))
}

/// Create a student with no mentor
#[utoipa::path(
    post,
    path = "/students",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreatePersonRequest>,
) -> Result<(StatusCode, Json<Student>)> {
    let (name, email) = req.into_fields()?;
    let student = state.students.create_student(name, email).await?;
    tracing::info!("Created student {}", student.id);
    Ok((StatusCode::CREATED, Json(student)))
}

/// Assign a student to a mentor
#[utoipa::path(
    put,
    path = "/assign-student/{mentorId}/{studentId}",
    params(
        ("mentorId" = String, Path, description = "Mentor id"),
        ("studentId" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn assign_student(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AssignmentPath>,
) -> Result<Json<Student>> {
    assign(&state, &path.student_id, &path.mentor_id).await
}

/// Assign one mentor to several students
#[utoipa::path(
    put,
    path = "/add-students/{mentorId}",
    params(
        ("mentorId" = String, Path, description = "Mentor id")
    ),
    request_body = AddStudentsRequest,
    responses(
        (status = 200, description = "Counts of matched and modified students", body = BulkAssignment),
        (status = 400, description = "Invalid id or body", body = ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn add_students(
    State(state): State<AppState>,
    ValidPath(MentorPath { mentor_id }): ValidPath<MentorPath>,
    ValidJson(req): ValidJson<AddStudentsRequest>,
) -> Result<Json<BulkAssignment>> {
    let mentor_id = parse_id("mentorId", &mentor_id)?;
    let student_ids = req
        .students
        .iter()
        .map(|id| parse_id("students", id))
        .collect::<Result<Vec<_>>>()?;

    let result = state
        .students
        .set_mentor_bulk(&student_ids, mentor_id)
        .await?;
    tracing::info!(
        "Bulk assigned mentor {}: {} matched, {} modified",
        mentor_id,
        result.matched_count,
        result.modified_count
    );
    Ok(Json(result))
}

/// List students without a mentor
#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "Unassigned students", body = Vec<Student>),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    tag = "students"
)]
pub async fn list_unassigned(State(state): State<AppState>) -> Result<Json<Vec<Student>>> {
    let students = state.students.list_unassigned().await?;
    Ok(Json(students))
}

/// Assign or change the mentor of a student
#[utoipa::path(
    put,
    path = "/change-mentor/{studentId}/{newMentorId}",
    params(
        ("studentId" = String, Path, description = "Student id"),
        ("newMentorId" = String, Path, description = "Mentor id to assign")
    ),
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn change_mentor(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<ChangeMentorPath>,
) -> Result<Json<Student>> {
    assign(&state, &path.student_id, &path.new_mentor_id).await
}

/// Assign a mentor to one student
#[utoipa::path(
    put,
    path = "/assign-mentor/{studentId}/{mentorId}",
    params(
        ("studentId" = String, Path, description = "Student id"),
        ("mentorId" = String, Path, description = "Mentor id")
    ),
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "assignments"
)]
pub async fn assign_mentor(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<AssignmentPath>,
) -> Result<Json<Student>> {
    assign(&state, &path.student_id, &path.mentor_id).await
}

/// List the students of a mentor
#[utoipa::path(
    get,
    path = "/mentor-students/{mentorId}",
    params(
        ("mentorId" = String, Path, description = "Mentor id")
    ),
    responses(
        (status = 200, description = "Students assigned to the mentor", body = Vec<Student>),
        (status = 400, description = "Invalid id", body = ErrorResponse)
    ),
    tag = "mentors"
)]
pub async fn mentor_students(
    State(state): State<AppState>,
    ValidPath(MentorPath { mentor_id }): ValidPath<MentorPath>,
) -> Result<Json<Vec<Student>>> {
    let mentor_id = parse_id("mentorId", &mentor_id)?;
    let students = state.students.list_by_mentor(mentor_id).await?;
    Ok(Json(students))
}

/// Get the mentor currently assigned to a student.
///
/// Only the current assignment is stored; the route name is kept for compatibility.
#[utoipa::path(
    get,
    path = "/previous-mentor/{studentId}",
    params(
        ("studentId" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Assigned mentor, or null when unassigned", body = Mentor),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "students"
)]
pub async fn previous_mentor(
    State(state): State<AppState>,
    ValidPath(StudentPath { student_id }): ValidPath<StudentPath>,
) -> Result<Json<Option<Mentor>>> {
    let student_id = parse_id("studentId", &student_id)?;
    let mentor = state.students.get_mentor_of(student_id).await?;
    Ok(Json(mentor))
}

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::Ack;
use service::student::{Student, StudentPayload};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of name, email or course
    pub search: Option<String>,
}

/// A path segment that is not a UUID cannot name any record.
fn parse_id(raw: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| JsonApiError::not_found(format!("student {raw} not found")))
}

#[utoipa::path(
    get, path = "/api/students", tag = "students",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching students in insertion order", body = [crate::openapi::StudentDoc]),
        (status = 503, description = "Storage Unavailable")
    )
)]
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<Student>>, JsonApiError> {
    let list = state.students.list(q.search.as_deref()).await?;
    info!(count = list.len(), search = ?q.search, "list students");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/students/{id}", tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StudentDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Student>, JsonApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.students.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/students", tag = "students",
    request_body = crate::openapi::StudentInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StudentDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Conflict"),
        (status = 503, description = "Storage Unavailable")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<StudentPayload>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let created = state.students.create(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/students/{id}", tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = crate::openapi::StudentInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StudentDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Conflict"),
        (status = 503, description = "Storage Unavailable")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StudentPayload>,
) -> Result<Json<Student>, JsonApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.students.update(id, &input).await?))
}

#[utoipa::path(
    delete, path = "/api/students/{id}", tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 503, description = "Storage Unavailable")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Ack<Uuid>>, JsonApiError> {
    let id = parse_id(&id)?;
    state.students.delete(id).await?;
    Ok(Json(Ack { message: "Student deleted", id }))
}

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::UserDraft;
use super::repository::{RepositoryError, UserRepository};
use super::service::{DirectoryError, DirectoryService};
use crate::metrics::router::{error_payload, TSV_CONTENT_TYPE};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub zone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub zone: String,
    pub old_password: String,
    pub new_password: String,
}

/// Router exposing session and user administration endpoints.
pub fn directory_router<U>(service: Arc<DirectoryService<U>>) -> Router
where
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/session/login", post(login_handler::<U>))
        .route("/api/v1/session/password", post(change_password_handler::<U>))
        .route(
            "/api/v1/users",
            get(list_handler::<U>).post(create_handler::<U>),
        )
        .route("/api/v1/users/import", post(import_handler::<U>))
        .route("/api/v1/users/export", get(export_handler::<U>))
        .route(
            "/api/v1/users/:zone",
            put(update_handler::<U>).delete(delete_handler::<U>),
        )
        .with_state(service)
}

pub(crate) async fn login_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.login(&request.zone, &request.password) {
        Ok(context) => (StatusCode::OK, axum::Json(context)).into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn change_password_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    axum::Json(request): axum::Json<PasswordChangeRequest>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.change_password(&request.zone, &request.old_password, &request.new_password) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn list_handler<U>(State(service): State<Arc<DirectoryService<U>>>) -> Response
where
    U: UserRepository + 'static,
{
    match service.list() {
        Ok(users) => (StatusCode::OK, axum::Json(users)).into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn create_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    axum::Json(draft): axum::Json<UserDraft>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.add(draft) {
        Ok(user) => (StatusCode::CREATED, axum::Json(user)).into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn update_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    Path(zone): Path<String>,
    axum::Json(draft): axum::Json<UserDraft>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.update(&zone, draft) {
        Ok(user) => (StatusCode::OK, axum::Json(user)).into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn delete_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    Path(zone): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.delete(&zone) {
        Ok(user) => (StatusCode::OK, axum::Json(user)).into_response(),
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn import_handler<U>(
    State(service): State<Arc<DirectoryService<U>>>,
    body: Bytes,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.import_tsv(body.as_ref()) {
        Ok(imported) => {
            let payload = json!({
                "imported": imported,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => directory_error(error),
    }
}

pub(crate) async fn export_handler<U>(State(service): State<Arc<DirectoryService<U>>>) -> Response
where
    U: UserRepository + 'static,
{
    match service.export_tsv() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TSV_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(error) => directory_error(error),
    }
}

fn directory_error(error: DirectoryError) -> Response {
    let status = match &error {
        DirectoryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        DirectoryError::UnknownUser(_) | DirectoryError::NothingToExport => StatusCode::NOT_FOUND,
        DirectoryError::AdminProtected => StatusCode::FORBIDDEN,
        DirectoryError::MissingZone | DirectoryError::EmptyImport | DirectoryError::Tsv(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DirectoryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_payload(status, error.to_string())
}

use crate::config::ConfigError;
use crate::directory::DirectoryError;
use crate::metrics::{MetricImportError, PanelServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(MetricImportError),
    Panel(PanelServiceError),
    Directory(DirectoryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Panel(err) => write!(f, "results error: {}", err),
            AppError::Directory(err) => write!(f, "directory error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Panel(err) => Some(err),
            AppError::Directory(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_)
            | AppError::Panel(PanelServiceError::Import(_))
            | AppError::Directory(DirectoryError::Tsv(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Panel(PanelServiceError::NothingToExport(_))
            | AppError::Directory(DirectoryError::NothingToExport)
            | AppError::Directory(DirectoryError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            AppError::Directory(DirectoryError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Directory(DirectoryError::AdminProtected) => StatusCode::FORBIDDEN,
            AppError::Directory(DirectoryError::MissingZone)
            | AppError::Directory(DirectoryError::EmptyImport) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Panel(_)
            | AppError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<MetricImportError> for AppError {
    fn from(value: MetricImportError) -> Self {
        Self::Import(value)
    }
}

impl From<PanelServiceError> for AppError {
    fn from(value: PanelServiceError) -> Self {
        Self::Panel(value)
    }
}

impl From<DirectoryError> for AppError {
    fn from(value: DirectoryError) -> Self {
        Self::Directory(value)
    }
}

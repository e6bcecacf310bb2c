use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DataKind, DataSet, Indicator, SystemParameters};
use super::filter::{PeriodFilter, Selector};
use super::pivot::CategoryOrder;
use super::ranking::RankMode;
use super::repository::{MetricStore, ParameterStore, RepositoryError};
use super::service::{PanelService, PanelServiceError};

pub const TSV_CONTENT_TYPE: &str = "text/tab-separated-values; charset=utf-8";

/// Query string shared by the results endpoints.
#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub area: String,
    #[serde(default)]
    pub month: Selector,
    #[serde(default)]
    pub week: Selector,
    #[serde(default)]
    pub order: CategoryOrder,
    #[serde(default)]
    pub mode: RankMode,
}

impl ResultsQuery {
    fn filter(&self) -> PeriodFilter {
        PeriodFilter::new(self.area.clone(), self.month.clone(), self.week.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    pub area: String,
}

/// Router exposing data loading, parameters and the results views.
pub fn results_router<M, P>(service: Arc<PanelService<M, P>>) -> Router
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/parameters",
            get(parameters_handler::<M, P>).put(update_parameters_handler::<M, P>),
        )
        .route(
            "/api/v1/data/:indicator",
            get(export_handler::<M, P>)
                .post(import_handler::<M, P>)
                .delete(clear_handler::<M, P>),
        )
        .route(
            "/api/v1/data/:indicator/:kind",
            get(export_kind_handler::<M, P>)
                .post(import_kind_handler::<M, P>)
                .delete(clear_kind_handler::<M, P>),
        )
        .route("/api/v1/results/options", get(options_handler::<M, P>))
        .route("/api/v1/results/pivot", get(pivot_handler::<M, P>))
        .route("/api/v1/results/ranking", get(ranking_handler::<M, P>))
        .with_state(service)
}

pub(crate) async fn parameters_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.parameters() {
        Ok(parameters) => (StatusCode::OK, axum::Json(parameters)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn update_parameters_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    axum::Json(parameters): axum::Json<SystemParameters>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.update_parameters(parameters) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn import_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path(indicator): Path<String>,
    body: Bytes,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, None) {
        Ok(set) => import_response(&service, set, &body),
        Err(response) => response,
    }
}

pub(crate) async fn import_kind_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path((indicator, kind)): Path<(String, String)>,
    body: Bytes,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, Some(&kind)) {
        Ok(set) => import_response(&service, set, &body),
        Err(response) => response,
    }
}

pub(crate) async fn export_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path(indicator): Path<String>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, None) {
        Ok(set) => export_response(&service, set),
        Err(response) => response,
    }
}

pub(crate) async fn export_kind_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path((indicator, kind)): Path<(String, String)>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, Some(&kind)) {
        Ok(set) => export_response(&service, set),
        Err(response) => response,
    }
}

pub(crate) async fn clear_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path(indicator): Path<String>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, None) {
        Ok(set) => clear_response(&service, set),
        Err(response) => response,
    }
}

pub(crate) async fn clear_kind_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Path((indicator, kind)): Path<(String, String)>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match data_set(&indicator, Some(&kind)) {
        Ok(set) => clear_response(&service, set),
        Err(response) => response,
    }
}

/// Resolves path segments; unknown indicators or kinds are 404s.
fn data_set(indicator: &str, kind: Option<&str>) -> Result<DataSet, Response> {
    let indicator = indicator
        .parse::<Indicator>()
        .map_err(|error| error_payload(StatusCode::NOT_FOUND, error.to_string()))?;
    let kind = match kind {
        Some(kind) => kind
            .parse::<DataKind>()
            .map_err(|error| error_payload(StatusCode::NOT_FOUND, error.to_string()))?,
        None => DataKind::DailyZone,
    };
    Ok(DataSet::new(indicator, kind))
}

fn import_response<M, P>(service: &PanelService<M, P>, set: DataSet, body: &[u8]) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.import_tsv(set, body) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => service_error(error),
    }
}

fn export_response<M, P>(service: &PanelService<M, P>, set: DataSet) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.export_tsv(set) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TSV_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(error) => service_error(error),
    }
}

fn clear_response<M, P>(service: &PanelService<M, P>, set: DataSet) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.clear(set) {
        Ok(removed) => {
            let payload = json!({
                "indicator": set.indicator,
                "kind": set.kind,
                "removed": removed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error(error),
    }
}

pub(crate) async fn options_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Query(query): Query<AreaQuery>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.options(&query.area) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn pivot_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Query(query): Query<ResultsQuery>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.results(query.filter(), query.order) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn ranking_handler<M, P>(
    State(service): State<Arc<PanelService<M, P>>>,
    Query(query): Query<ResultsQuery>,
) -> Response
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    match service.ranking(query.filter(), query.mode) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

fn service_error(error: PanelServiceError) -> Response {
    let status = match &error {
        PanelServiceError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PanelServiceError::NothingToExport(_) => StatusCode::NOT_FOUND,
        PanelServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PanelServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PanelServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_payload(status, error.to_string())
}

pub(crate) fn error_payload(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}

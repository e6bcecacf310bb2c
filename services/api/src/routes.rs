use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use results_panel::directory::{directory_router, DirectoryService, UserRepository};
use results_panel::metrics::{results_router, MetricStore, PanelService, ParameterStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_panel_routes<M, P, U>(
    panel: Arc<PanelService<M, P>>,
    directory: Arc<DirectoryService<U>>,
) -> axum::Router
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
    U: UserRepository + 'static,
{
    results_router(panel)
        .merge(directory_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryMetricStore, InMemoryParameterStore, InMemoryUserRepository};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let panel = Arc::new(PanelService::new(
            Arc::new(InMemoryMetricStore::default()),
            Arc::new(InMemoryParameterStore::default()),
        ));
        let directory = Arc::new(DirectoryService::new(Arc::new(
            InMemoryUserRepository::default(),
        )));
        directory.seed_admin("1234").expect("admin seeded");

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_panel_routes(panel, directory).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn health_and_readiness_reflect_state() {
        assert_eq!(status_of(app(false), "/health").await, StatusCode::OK);
        assert_eq!(
            status_of(app(false), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_router_serves_results_and_directory() {
        assert_eq!(
            status_of(app(true), "/api/v1/results/ranking?area=NORTE001").await,
            StatusCode::OK
        );
        assert_eq!(status_of(app(true), "/api/v1/users").await, StatusCode::OK);
        assert_eq!(
            status_of(app(true), "/api/v1/data/productivity").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn readiness_flag_is_read_per_request() {
        let flag = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: flag.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = axum::Router::new()
            .route("/ready", axum::routing::get(readiness_endpoint))
            .layer(Extension(state));

        assert_eq!(
            status_of(router.clone(), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        flag.store(true, Ordering::Release);
        assert_eq!(status_of(router, "/ready").await, StatusCode::OK);
    }
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMetricStore, InMemoryParameterStore, InMemoryUserRepository};
use crate::routes::with_panel_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use results_panel::config::{AppConfig, PanelConfig};
use results_panel::directory::DirectoryService;
use results_panel::error::AppError;
use results_panel::metrics::{Indicator, MetricStore, PanelService, ParameterStore};
use results_panel::telemetry;
use std::fs::File;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let panel = Arc::new(PanelService::new(
        Arc::new(InMemoryMetricStore::default()),
        Arc::new(InMemoryParameterStore::default()),
    ));
    seed_metrics(&panel, &config.panel)?;

    let directory = Arc::new(DirectoryService::new(Arc::new(
        InMemoryUserRepository::default(),
    )));
    if config.panel.uses_default_admin_password() {
        warn!("administrator account uses the default password; set PANEL_ADMIN_PASSWORD");
    }
    directory.seed_admin(config.panel.admin_password())?;

    let app = with_panel_routes(panel, directory)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "results panel ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Loads the optional seed files named in the configuration.
fn seed_metrics<M, P>(panel: &PanelService<M, P>, config: &PanelConfig) -> Result<(), AppError>
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    let seeds = [
        (Indicator::Productivity, config.productivity_seed.as_ref()),
        (Indicator::Effectiveness, config.effectiveness_seed.as_ref()),
    ];

    for (indicator, path) in seeds {
        let Some(path) = path else {
            continue;
        };
        let file = File::open(path)?;
        let summary = panel.import_tsv(indicator, file)?;
        info!(
            indicator = %indicator,
            path = %path.display(),
            records = summary.records,
            "seed data loaded"
        );
    }

    Ok(())
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::metrics::domain::{DataSet, Indicator, MetricRecord, SystemParameters, TOTAL_CATEGORY};
use crate::metrics::repository::{MetricStore, ParameterStore, RepositoryError};
use crate::metrics::service::PanelService;

pub(super) const PRODUCTIVITY_TSV: &str = "MÊS\tSEMANA\tÁREA\tZONA\tDVV\tRESULTADO\t(A/B)\n\
1\t1\tNORTE001\tNORTE001A\t1\t90%\t(9/10)\n\
1\t1\tNORTE001\tNORTE001A\tTOTAL\t90%\t(9/10)\n\
1\t1\tNORTE001\tNORTE001B\t1\t80%\t(8/10)\n\
1\t1\tNORTE001\tNORTE001B\tTOTAL\t80%\t(8/10)\n";

pub(super) const EFFECTIVENESS_TSV: &str = "1\t1\tNORTE001\tNORTE001A\tTOTAL\t70%\t(7|10)\n\
1\t1\tNORTE001\tNORTE001B\tTOTAL\t95%\t(19/20)\n";

pub(super) const WEEKLY_AREA_TSV: &str = "MÊS\tSEMANA\tÁREA\tRESULTADO\t(A/B)\n\
1\t1\tNORTE001\t84%\t(84/100)\n";

pub(super) fn total(zone: &str, result: &str, fraction: &str) -> MetricRecord {
    MetricRecord {
        month: "1".to_string(),
        week: "1".to_string(),
        area: "NORTE001".to_string(),
        zone: zone.to_string(),
        category: TOTAL_CATEGORY.to_string(),
        result_text: result.to_string(),
        fraction_text: fraction.to_string(),
    }
}

pub(super) fn parameters() -> SystemParameters {
    SystemParameters {
        productivity_target: 85.0,
        effectiveness_target: 80.0,
        current_month: "1".to_string(),
        current_week: "1".to_string(),
        last_updated_at: "2025-03-07T14:05".to_string(),
        ..SystemParameters::default()
    }
}

pub(super) type MemoryService = PanelService<MemoryMetrics, MemoryParameters>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryMetrics>, Arc<MemoryParameters>) {
    let metrics = Arc::new(MemoryMetrics::default());
    let parameters = Arc::new(MemoryParameters::default());
    let service = PanelService::new(metrics.clone(), parameters.clone());
    (service, metrics, parameters)
}

/// Service preloaded with both sample files and [`parameters`].
pub(super) fn loaded_service() -> MemoryService {
    let (service, _, _) = build_service();
    service
        .import_tsv(Indicator::Productivity, PRODUCTIVITY_TSV.as_bytes())
        .expect("productivity import");
    service
        .import_tsv(Indicator::Effectiveness, EFFECTIVENESS_TSV.as_bytes())
        .expect("effectiveness import");
    service
        .update_parameters(parameters())
        .expect("parameters saved");
    service
}

#[derive(Default, Clone)]
pub(super) struct MemoryMetrics {
    records: Arc<Mutex<HashMap<DataSet, Vec<MetricRecord>>>>,
}

impl MetricStore for MemoryMetrics {
    fn replace(&self, set: DataSet, records: Vec<MetricRecord>) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("metrics mutex poisoned");
        guard.insert(set, records);
        Ok(())
    }

    fn list(&self, set: DataSet) -> Result<Vec<MetricRecord>, RepositoryError> {
        let guard = self.records.lock().expect("metrics mutex poisoned");
        Ok(guard.get(&set).cloned().unwrap_or_default())
    }

    fn clear(&self, set: DataSet) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("metrics mutex poisoned");
        Ok(guard.remove(&set).map(|records| records.len()).unwrap_or(0))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryParameters {
    stored: Arc<Mutex<Option<SystemParameters>>>,
}

impl ParameterStore for MemoryParameters {
    fn load(&self) -> Result<Option<SystemParameters>, RepositoryError> {
        Ok(self.stored.lock().expect("parameters mutex poisoned").clone())
    }

    fn save(&self, parameters: SystemParameters) -> Result<(), RepositoryError> {
        *self.stored.lock().expect("parameters mutex poisoned") = Some(parameters);
        Ok(())
    }
}

pub(super) struct UnavailableMetrics;

impl MetricStore for UnavailableMetrics {
    fn replace(&self, _: DataSet, _: Vec<MetricRecord>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self, _: DataSet) -> Result<Vec<MetricRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn clear(&self, _: DataSet) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{DataKind, DataSet, Indicator, MetricRecord, MetricSnapshot, SystemParameters};
use super::filter::{period_options, PeriodFilter};
use super::import::{export_to_string, MetricImportError, MetricImporter};
use super::pivot::{build_pivot, CategoryOrder};
use super::ranking::{rank, RankMode};
use super::repository::{MetricStore, ParameterStore, RepositoryError};
use super::views::{format_last_updated, PeriodOptionsView, PivotView, RankingView, ResultsView};

/// Outcome of loading one TSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub indicator: Indicator,
    pub kind: DataKind,
    pub records: usize,
    pub header_skipped: bool,
    pub migrated_fractions: usize,
}

/// Service composing the metric and parameter stores with the ranking engine.
pub struct PanelService<M, P> {
    metrics: Arc<M>,
    parameters: Arc<P>,
}

impl<M, P> PanelService<M, P>
where
    M: MetricStore + 'static,
    P: ParameterStore + 'static,
{
    pub fn new(metrics: Arc<M>, parameters: Arc<P>) -> Self {
        Self {
            metrics,
            parameters,
        }
    }

    /// Parse a TSV upload and replace the data set with it.
    ///
    /// Passing a bare [`Indicator`] targets its daily zone data.
    pub fn import_tsv<R: Read>(
        &self,
        set: impl Into<DataSet>,
        reader: R,
    ) -> Result<ImportSummary, PanelServiceError> {
        let set = set.into();
        let import = MetricImporter::from_reader_as(set.kind, reader)?;
        let summary = ImportSummary {
            indicator: set.indicator,
            kind: set.kind,
            records: import.records.len(),
            header_skipped: import.header_skipped,
            migrated_fractions: import.migrated_fractions,
        };

        self.metrics.replace(set, import.records)?;
        info!(
            indicator = %set.indicator,
            kind = %set.kind,
            records = summary.records,
            "metric data replaced"
        );
        Ok(summary)
    }

    pub fn replace_records(
        &self,
        set: impl Into<DataSet>,
        records: Vec<MetricRecord>,
    ) -> Result<usize, PanelServiceError> {
        let count = records.len();
        self.metrics.replace(set.into(), records)?;
        Ok(count)
    }

    pub fn records(&self, set: impl Into<DataSet>) -> Result<Vec<MetricRecord>, PanelServiceError> {
        Ok(self.metrics.list(set.into())?)
    }

    /// Render the data set as TSV behind its kind's header.
    pub fn export_tsv(&self, set: impl Into<DataSet>) -> Result<String, PanelServiceError> {
        let set = set.into();
        let records = self.metrics.list(set)?;
        if records.is_empty() {
            return Err(PanelServiceError::NothingToExport(set));
        }
        Ok(export_to_string(set.kind, &records)?)
    }

    pub fn clear(&self, set: impl Into<DataSet>) -> Result<usize, PanelServiceError> {
        let set = set.into();
        let removed = self.metrics.clear(set)?;
        info!(indicator = %set.indicator, kind = %set.kind, removed, "metric data cleared");
        Ok(removed)
    }

    /// Stored parameters, or the defaults when none were saved yet.
    pub fn parameters(&self) -> Result<SystemParameters, PanelServiceError> {
        Ok(self.parameters.load()?.unwrap_or_default())
    }

    pub fn update_parameters(
        &self,
        parameters: SystemParameters,
    ) -> Result<SystemParameters, PanelServiceError> {
        self.parameters.save(parameters.clone())?;
        info!(
            month = %parameters.current_month,
            week = %parameters.current_week,
            "system parameters saved"
        );
        Ok(parameters)
    }

    pub fn snapshot(&self) -> Result<MetricSnapshot, PanelServiceError> {
        Ok(MetricSnapshot {
            productivity: self.metrics.list(Indicator::Productivity.into())?,
            effectiveness: self.metrics.list(Indicator::Effectiveness.into())?,
        })
    }

    /// Period choices for the area plus the filter a fresh view starts from.
    pub fn options(&self, area: &str) -> Result<PeriodOptionsView, PanelServiceError> {
        let snapshot = self.snapshot()?;
        let params = self.parameters()?;
        let options = period_options(snapshot.iter(), area);
        let initial = options.initial_filter(area, &params);
        Ok(PeriodOptionsView { options, initial })
    }

    pub fn results(
        &self,
        filter: PeriodFilter,
        order: CategoryOrder,
    ) -> Result<ResultsView, PanelServiceError> {
        let snapshot = filter.apply_snapshot(&self.snapshot()?);
        let params = self.parameters()?;

        let pivot_for = |indicator: Indicator| {
            let table = build_pivot(snapshot.records(indicator), order, params.target(indicator));
            PivotView::from_table(indicator, &table)
        };

        Ok(ResultsView {
            productivity: pivot_for(Indicator::Productivity),
            effectiveness: pivot_for(Indicator::Effectiveness),
            last_updated: format_last_updated(&params.last_updated_at),
            filter,
        })
    }

    pub fn ranking(
        &self,
        filter: PeriodFilter,
        mode: RankMode,
    ) -> Result<RankingView, PanelServiceError> {
        let snapshot = self.snapshot()?;
        let params = self.parameters()?;
        let ranking = rank(&snapshot, Some(params.weights()), &filter, mode);
        Ok(RankingView::new(filter, mode, &params, ranking))
    }
}

/// Error raised by the panel service.
#[derive(Debug, thiserror::Error)]
pub enum PanelServiceError {
    #[error(transparent)]
    Import(#[from] MetricImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no {0} data to export")]
    NothingToExport(DataSet),
}

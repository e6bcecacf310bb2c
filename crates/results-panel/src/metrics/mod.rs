//! Metrics aggregation and ranking engine.
//!
//! The engine functions ([`parse_fraction`], [`filter`], [`build_pivot`],
//! [`rank`]) are pure: they read a [`MetricSnapshot`] and never touch a
//! store. [`PanelService`] takes the snapshot from the stores for each
//! request and [`results_router`] exposes it over HTTP.

pub mod domain;
pub mod filter;
pub mod fraction;
pub mod import;
pub mod percent;
pub mod pivot;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Column, DataKind, DataSet, Indicator, MetricRecord, MetricSnapshot, SystemParameters,
    UnknownDataKind, UnknownIndicator, Weights, DEFAULT_EFFECTIVENESS_WEIGHT,
    DEFAULT_PRODUCTIVITY_WEIGHT, TOTAL_CATEGORY,
};
pub use filter::{filter, period_options, PeriodFilter, PeriodOptions, Selector};
pub use fraction::{parse_fraction, Fraction};
pub use import::{MetricImport, MetricImportError, MetricImporter};
pub use percent::{parse_percent_text, to_percentage, TargetStatus};
pub use pivot::{build_pivot, CategoryOrder, PivotCell, PivotTable};
pub use ranking::{rank, RankMode, Ranking, RankingTotals, ZoneAggregate};
pub use repository::{MetricStore, ParameterStore, RepositoryError};
pub use router::results_router;
pub use service::{ImportSummary, PanelService, PanelServiceError};
pub use views::{
    format_last_updated, format_percent, PeriodOptionsView, PivotView, RankingView, ResultsView,
};

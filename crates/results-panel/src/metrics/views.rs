use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use super::domain::{Indicator, SystemParameters, Weights};
use super::filter::{PeriodFilter, PeriodOptions};
use super::percent::TargetStatus;
use super::pivot::{PivotCell, PivotTable};
use super::ranking::{RankMode, Ranking, RankingTotals, ZoneAggregate};

/// Composite ranks up to this position are highlighted.
pub const PODIUM_SIZE: usize = 3;

const UNKNOWN_TIMESTAMP: &str = "N/A";

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Renders the stored last-update timestamp as `dd/mm/yyyy HH:MM`.
pub fn format_last_updated(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|timestamp| timestamp.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.naive_local());
    }

    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotRowView {
    pub zone: String,
    pub cells: Vec<Option<PivotCell>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotView {
    pub indicator: Indicator,
    pub title: &'static str,
    pub target: f64,
    pub categories: Vec<String>,
    pub rows: Vec<PivotRowView>,
}

impl PivotView {
    pub fn from_table(indicator: Indicator, table: &PivotTable) -> Self {
        let rows = table
            .zones()
            .iter()
            .map(|zone| PivotRowView {
                zone: zone.clone(),
                cells: table.row(zone).into_iter().map(|cell| cell.cloned()).collect(),
            })
            .collect();

        Self {
            indicator,
            title: indicator.label(),
            target: table.target(),
            categories: table.categories().to_vec(),
            rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub filter: PeriodFilter,
    pub last_updated: String,
    pub productivity: PivotView,
    pub effectiveness: PivotView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodOptionsView {
    pub options: PeriodOptions,
    pub initial: PeriodFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingRowView {
    #[serde(flatten)]
    pub aggregate: ZoneAggregate,
    pub composite_status: TargetStatus,
    pub podium: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingTotalsView {
    #[serde(flatten)]
    pub totals: RankingTotals,
    pub composite_status: TargetStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub filter: PeriodFilter,
    pub mode: RankMode,
    pub weights: Weights,
    pub composite_target: f64,
    pub rows: Vec<RankingRowView>,
    pub totals: RankingTotalsView,
}

impl RankingView {
    pub fn new(
        filter: PeriodFilter,
        mode: RankMode,
        params: &SystemParameters,
        ranking: Ranking,
    ) -> Self {
        let composite_target = params.composite_target();
        let rows = ranking
            .zones
            .into_iter()
            .map(|aggregate| RankingRowView {
                composite_status: TargetStatus::for_value(
                    aggregate.composite_percent,
                    composite_target,
                ),
                podium: aggregate.composite_rank <= PODIUM_SIZE,
                aggregate,
            })
            .collect();

        let totals = RankingTotalsView {
            composite_status: TargetStatus::for_value(ranking.totals.composite, composite_target),
            totals: ranking.totals,
        };

        Self {
            filter,
            mode,
            weights: params.weights(),
            composite_target,
            rows,
            totals,
        }
    }
}

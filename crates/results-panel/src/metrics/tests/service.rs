use super::common::*;
use std::sync::Arc;

use crate::metrics::domain::{DataKind, DataSet, Indicator, SystemParameters};
use crate::metrics::filter::{PeriodFilter, Selector};
use crate::metrics::percent::TargetStatus;
use crate::metrics::pivot::CategoryOrder;
use crate::metrics::ranking::RankMode;
use crate::metrics::repository::RepositoryError;
use crate::metrics::service::{PanelService, PanelServiceError};

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn import_replaces_the_whole_indicator_data_set() {
    let (service, _, _) = build_service();

    let first = service
        .import_tsv(Indicator::Productivity, PRODUCTIVITY_TSV.as_bytes())
        .expect("first import");
    assert_eq!(first.records, 4);
    assert!(first.header_skipped);

    service
        .import_tsv(
            Indicator::Productivity,
            "2\t1\tSUL00001\tSUL00001A\tTOTAL\t50%\t(1/2)\n".as_bytes(),
        )
        .expect("second import");

    let records = service.records(Indicator::Productivity).expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].area, "SUL00001");
    assert!(service
        .records(Indicator::Effectiveness)
        .expect("records")
        .is_empty());
}

#[test]
fn legacy_fractions_are_counted_and_exported_canonically() {
    let (service, _, _) = build_service();
    let summary = service
        .import_tsv(Indicator::Effectiveness, EFFECTIVENESS_TSV.as_bytes())
        .expect("import");
    assert_eq!(summary.migrated_fractions, 1);
    assert!(!summary.header_skipped);

    let exported = service.export_tsv(Indicator::Effectiveness).expect("export");
    let lines: Vec<_> = exported.lines().collect();
    assert_eq!(lines[0], "MÊS\tSEMANA\tÁREA\tZONA\tDVV\tRESULTADO\t(A/B)");
    assert_eq!(lines[1], "1\t1\tNORTE001\tNORTE001A\tTOTAL\t70%\t(7/10)");
    assert_eq!(lines.len(), 3);
}

#[test]
fn exporting_an_empty_indicator_is_rejected() {
    let (service, _, _) = build_service();
    let error = service
        .export_tsv(Indicator::Productivity)
        .expect_err("nothing to export");
    assert!(matches!(
        error,
        PanelServiceError::NothingToExport(set) if set == DataSet::from(Indicator::Productivity)
    ));
}

#[test]
fn consolidated_loads_are_stored_apart_from_daily_zone_data() {
    let service = loaded_service();
    let weekly_area = DataSet::new(Indicator::Productivity, DataKind::WeeklyArea);

    let summary = service
        .import_tsv(weekly_area, WEEKLY_AREA_TSV.as_bytes())
        .expect("weekly area import");
    assert_eq!(summary.kind, DataKind::WeeklyArea);
    assert_eq!(summary.records, 1);
    assert!(summary.header_skipped);

    assert_eq!(service.records(Indicator::Productivity).expect("records").len(), 4);
    let stored = service.records(weekly_area).expect("records");
    assert_eq!(stored[0].area, "NORTE001");
    assert_eq!(stored[0].zone, "");
    assert_eq!(stored[0].result_text, "84%");

    let ranking = service
        .ranking(PeriodFilter::for_area("NORTE001"), RankMode::Ordinal)
        .expect("ranking");
    assert_eq!(ranking.rows.len(), 2);

    assert_eq!(service.export_tsv(weekly_area).expect("export"), WEEKLY_AREA_TSV);
    assert_eq!(service.clear(weekly_area).expect("clear"), 1);
    assert!(matches!(
        service.export_tsv(weekly_area),
        Err(PanelServiceError::NothingToExport(set)) if set == weekly_area
    ));
    assert_eq!(service.records(Indicator::Productivity).expect("records").len(), 4);
}

#[test]
fn clear_reports_removed_records() {
    let service = loaded_service();
    assert_eq!(service.clear(Indicator::Productivity).expect("clear"), 4);
    assert_eq!(service.clear(Indicator::Productivity).expect("clear"), 0);
    assert_eq!(service.records(Indicator::Effectiveness).expect("records").len(), 2);
}

#[test]
fn parameters_fall_back_to_defaults_until_saved() {
    let (service, _, _) = build_service();
    assert_eq!(service.parameters().expect("load"), SystemParameters::default());

    service.update_parameters(parameters()).expect("save");
    assert_eq!(service.parameters().expect("load").productivity_target, 85.0);
}

#[test]
fn options_start_from_the_configured_period() {
    let service = loaded_service();
    let view = service.options("NORTE001").expect("options");
    assert_eq!(view.options.months, vec!["all", "1"]);
    assert_eq!(view.options.weeks, vec!["all", "1"]);
    assert_eq!(view.initial.month, Selector::Only("1".to_string()));

    let empty = service.options("SUL00001").expect("options");
    assert_eq!(empty.options.months, vec!["all"]);
    assert_eq!(empty.initial.month, Selector::All);
}

#[test]
fn results_pivot_both_indicators_with_their_targets() {
    let service = loaded_service();
    let view = service
        .results(PeriodFilter::for_area("NORTE001"), CategoryOrder::Numeric)
        .expect("results");

    assert_eq!(view.last_updated, "07/03/2025 14:05");
    assert_eq!(view.productivity.categories, vec!["1", "TOTAL"]);
    assert_eq!(view.productivity.target, 85.0);
    assert_eq!(view.effectiveness.categories, vec!["TOTAL"]);

    let zone_b = &view.productivity.rows[1];
    assert_eq!(zone_b.zone, "NORTE001B");
    let statuses: Vec<_> = zone_b
        .cells
        .iter()
        .map(|cell| cell.as_ref().map(|cell| cell.status))
        .collect();
    assert_eq!(
        statuses,
        vec![Some(TargetStatus::BelowTarget), Some(TargetStatus::BelowTarget)]
    );
}

#[test]
fn ranking_blends_indicators_with_stored_weights() {
    let service = loaded_service();
    let view = service
        .ranking(PeriodFilter::for_area("NORTE001"), RankMode::Ordinal)
        .expect("ranking");

    assert!(close(view.composite_target, 82.0));
    assert_eq!(view.rows.len(), 2);

    let zone_a = &view.rows[0];
    assert_eq!(zone_a.aggregate.zone, "NORTE001A");
    assert!(close(zone_a.aggregate.composite_percent, 78.0));
    assert_eq!(zone_a.aggregate.productivity_rank, 1);
    assert_eq!(zone_a.aggregate.composite_rank, 2);
    assert_eq!(zone_a.composite_status, TargetStatus::BelowTarget);

    let zone_b = &view.rows[1];
    assert!(close(zone_b.aggregate.composite_percent, 89.0));
    assert_eq!(zone_b.aggregate.effectiveness_rank, 1);
    assert_eq!(zone_b.aggregate.composite_rank, 1);
    assert_eq!(zone_b.composite_status, TargetStatus::OnTarget);
    assert!(zone_a.podium && zone_b.podium);

    assert!(close(view.totals.totals.productivity, 85.0));
    assert!(close(view.totals.totals.effectiveness, 26.0 / 30.0 * 100.0));
    assert_eq!(view.totals.composite_status, TargetStatus::OnTarget);
}

#[test]
fn unavailable_store_surfaces_repository_error() {
    let service = PanelService::new(
        Arc::new(UnavailableMetrics),
        Arc::new(MemoryParameters::default()),
    );
    let error = service
        .ranking(PeriodFilter::for_area("NORTE001"), RankMode::default())
        .expect_err("store offline");
    assert!(matches!(
        error,
        PanelServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

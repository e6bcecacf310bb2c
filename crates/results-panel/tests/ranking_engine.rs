use results_panel::metrics::{
    build_pivot, filter, parse_fraction, parse_percent_text, rank, to_percentage, CategoryOrder,
    Fraction, MetricRecord, MetricSnapshot, PeriodFilter, RankMode, Selector, Weights,
};

fn record(zone: &str, category: &str, result: &str, fraction: &str) -> MetricRecord {
    MetricRecord {
        month: "1".to_string(),
        week: "1".to_string(),
        area: "NORTE001".to_string(),
        zone: zone.to_string(),
        category: category.to_string(),
        result_text: result.to_string(),
        fraction_text: fraction.to_string(),
    }
}

fn two_zone_snapshot() -> MetricSnapshot {
    MetricSnapshot {
        productivity: vec![
            record("A", "TOTAL", "90%", "(90/100)"),
            record("B", "TOTAL", "80%", "(8/10)"),
        ],
        effectiveness: vec![
            record("A", "TOTAL", "70%", "(7/10)"),
            record("B", "TOTAL", "95%", "(95/100)"),
        ],
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn fraction_and_percent_helpers_are_total() {
    assert_eq!(parse_fraction(Some("(12/40)")), Fraction::new(12, 40));
    assert_eq!(parse_fraction(Some("garbage")), Fraction::ZERO);
    assert_eq!(parse_fraction(None), Fraction::ZERO);
    assert_eq!(to_percentage(0, 0), 0.0);
    assert_eq!(to_percentage(45, 90), 50.0);
    assert_eq!(parse_percent_text(Some("87,5%")), 87.5);
    assert_eq!(parse_percent_text(Some("")), 0.0);
    assert_eq!(parse_percent_text(Some("abc")), 0.0);
}

#[test]
fn pivot_leaves_missing_cells_absent() {
    let records = vec![
        record("A", "1", "90%", ""),
        record("A", "2", "80%", ""),
        record("B", "1", "70%", ""),
    ];
    let pivot = build_pivot(&records, CategoryOrder::default(), 0.0);

    assert_eq!(pivot.categories(), ["1", "2"]);
    assert_eq!(pivot.zones(), ["A", "B"]);
    assert!(pivot.cell("B", "2").is_none());
    assert_eq!(
        pivot.cell("A", "2").map(|cell| cell.result_text.as_str()),
        Some("80%")
    );
}

#[test]
fn composite_ranking_blends_both_indicators() {
    let ranking = rank(
        &two_zone_snapshot(),
        Some(Weights::default()),
        &PeriodFilter::for_area("NORTE001"),
        RankMode::Ordinal,
    );

    let a = ranking.zone("A").expect("zone A ranked");
    let b = ranking.zone("B").expect("zone B ranked");
    assert_close(a.composite_percent, 78.0);
    assert_close(b.composite_percent, 89.0);
    assert_eq!((a.composite_rank, b.composite_rank), (2, 1));
    assert_eq!((a.productivity_rank, b.productivity_rank), (1, 2));
    assert_eq!((a.effectiveness_rank, b.effectiveness_rank), (2, 1));
}

#[test]
fn grand_total_is_volume_weighted() {
    let snapshot = two_zone_snapshot();
    let ranking = rank(
        &snapshot,
        None,
        &PeriodFilter::for_area("NORTE001"),
        RankMode::Ordinal,
    );

    // (90 + 8) / (100 + 10) and (7 + 95) / (10 + 100)
    let productivity = 98.0 / 110.0 * 100.0;
    let effectiveness = 102.0 / 110.0 * 100.0;
    assert_close(ranking.totals.productivity, productivity);
    assert_close(ranking.totals.effectiveness, effectiveness);
    assert_close(
        ranking.totals.composite,
        productivity * 0.4 + effectiveness * 0.6,
    );

    let mean_of_composites = ranking
        .zones
        .iter()
        .map(|zone| zone.composite_percent)
        .sum::<f64>()
        / ranking.zones.len() as f64;
    assert!((ranking.totals.composite - mean_of_composites).abs() > 1.0);
}

#[test]
fn empty_input_yields_empty_output() {
    let empty = MetricSnapshot::default();
    let ranking = rank(
        &empty,
        None,
        &PeriodFilter::for_area("NORTE001"),
        RankMode::default(),
    );
    assert!(ranking.is_empty());
    assert_eq!(ranking.totals.composite, 0.0);

    assert!(filter(&[], "NORTE001", &Selector::All, &Selector::All).is_empty());
    assert!(build_pivot(&[], CategoryOrder::default(), 0.0).is_empty());
}

#[test]
fn aggregation_is_idempotent() {
    let snapshot = two_zone_snapshot();
    let filter = PeriodFilter::for_area("NORTE001");
    let first = rank(&snapshot, None, &filter, RankMode::Shared);
    let second = rank(&snapshot, None, &filter, RankMode::Shared);
    assert_eq!(first, second);

    let records = &snapshot.productivity;
    assert_eq!(
        build_pivot(records, CategoryOrder::Numeric, 90.0),
        build_pivot(records, CategoryOrder::Numeric, 90.0)
    );
}

#[test]
fn zones_missing_an_indicator_score_zero_on_that_side() {
    let mut snapshot = two_zone_snapshot();
    snapshot.effectiveness.retain(|record| record.zone == "B");

    let ranking = rank(
        &snapshot,
        None,
        &PeriodFilter::for_area("NORTE001"),
        RankMode::Ordinal,
    );
    let a = ranking.zone("A").expect("zone A kept");
    assert_eq!(a.effectiveness_percent, 0.0);
    assert_close(a.composite_percent, 36.0);
}

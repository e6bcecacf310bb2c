use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::domain::{MetricRecord, MetricSnapshot, Weights};
use super::filter::PeriodFilter;
use super::fraction::{parse_fraction, Fraction};
use super::percent::parse_percent_text;
use std::cmp::Ordering;

/// Scores are compared after rounding to this step, so arithmetic noise
/// in the composite never separates equal scores.
const SCORE_STEP: f64 = 1e-9;

/// How equal scores are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Every zone gets a distinct position; ties go to the lower zone name.
    #[default]
    Ordinal,
    /// Equal scores share the best position and the next rank skips ahead.
    Shared,
    /// Equal scores share a position and the next rank follows without gaps.
    Dense,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAggregate {
    pub zone: String,
    pub productivity_percent: f64,
    pub effectiveness_percent: f64,
    pub composite_percent: f64,
    pub productivity_rank: usize,
    pub effectiveness_rank: usize,
    pub composite_rank: usize,
}

/// The "TV" row: fractions summed across zones before converting to percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankingTotals {
    pub productivity: f64,
    pub effectiveness: f64,
    pub composite: f64,
    pub productivity_fraction: Fraction,
    pub effectiveness_fraction: Fraction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub zones: Vec<ZoneAggregate>,
    pub totals: RankingTotals,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zone(&self, zone: &str) -> Option<&ZoneAggregate> {
        self.zones.iter().find(|aggregate| aggregate.zone == zone)
    }
}

/// Ranks the zones of the filtered period by their `TOTAL` rows.
///
/// Zones missing from one indicator score `0` on that side instead of being
/// dropped. Output rows are sorted by zone; missing weights fall back to 40/60.
pub fn rank(
    snapshot: &MetricSnapshot,
    weights: Option<Weights>,
    filter: &PeriodFilter,
    mode: RankMode,
) -> Ranking {
    let weights = weights.unwrap_or_default();
    let productivity_rows = total_rows(&snapshot.productivity, filter);
    let effectiveness_rows = total_rows(&snapshot.effectiveness, filter);

    let productivity_by_zone = first_by_zone(&productivity_rows);
    let effectiveness_by_zone = first_by_zone(&effectiveness_rows);

    let zones: BTreeSet<&str> = productivity_by_zone
        .keys()
        .chain(effectiveness_by_zone.keys())
        .copied()
        .collect();

    if zones.is_empty() {
        return Ranking::default();
    }

    let mut aggregates: Vec<ZoneAggregate> = zones
        .into_iter()
        .map(|zone| {
            let productivity_percent = percent_for(&productivity_by_zone, zone);
            let effectiveness_percent = percent_for(&effectiveness_by_zone, zone);
            ZoneAggregate {
                zone: zone.to_string(),
                productivity_percent,
                effectiveness_percent,
                composite_percent: weights.composite(productivity_percent, effectiveness_percent),
                productivity_rank: 0,
                effectiveness_rank: 0,
                composite_rank: 0,
            }
        })
        .collect();

    assign_ranks(
        &mut aggregates,
        mode,
        |row| row.productivity_percent,
        |row, rank| row.productivity_rank = rank,
    );
    assign_ranks(
        &mut aggregates,
        mode,
        |row| row.effectiveness_percent,
        |row, rank| row.effectiveness_rank = rank,
    );
    assign_ranks(
        &mut aggregates,
        mode,
        |row| row.composite_percent,
        |row, rank| row.composite_rank = rank,
    );

    let productivity_fraction = sum_fractions(&productivity_rows);
    let effectiveness_fraction = sum_fractions(&effectiveness_rows);
    let productivity = productivity_fraction.percentage();
    let effectiveness = effectiveness_fraction.percentage();

    Ranking {
        zones: aggregates,
        totals: RankingTotals {
            productivity,
            effectiveness,
            composite: weights.composite(productivity, effectiveness),
            productivity_fraction,
            effectiveness_fraction,
        },
    }
}

fn total_rows<'a>(records: &'a [MetricRecord], filter: &PeriodFilter) -> Vec<&'a MetricRecord> {
    records
        .iter()
        .filter(|record| record.is_total() && filter.matches(record))
        .collect()
}

fn first_by_zone<'a>(rows: &[&'a MetricRecord]) -> BTreeMap<&'a str, &'a MetricRecord> {
    let mut by_zone = BTreeMap::new();
    for &row in rows {
        by_zone.entry(row.zone.as_str()).or_insert(row);
    }
    by_zone
}

fn percent_for(rows: &BTreeMap<&str, &MetricRecord>, zone: &str) -> f64 {
    rows.get(zone)
        .map(|record| parse_percent_text(Some(&record.result_text)))
        .unwrap_or(0.0)
}

fn sum_fractions(rows: &[&MetricRecord]) -> Fraction {
    rows.iter()
        .map(|record| parse_fraction(Some(&record.fraction_text)))
        .sum()
}

fn score_key(value: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0 for `total_cmp`.
    (value / SCORE_STEP).round() + 0.0
}

/// Descending order of the rounded scores.
fn compare_scores(left: f64, right: f64) -> Ordering {
    score_key(right).total_cmp(&score_key(left))
}

/// Ranks descending by `value`; `rows` must already be in zone order.
fn assign_ranks<V, S>(rows: &mut [ZoneAggregate], mode: RankMode, value: V, set: S)
where
    V: Fn(&ZoneAggregate) -> f64,
    S: Fn(&mut ZoneAggregate, usize),
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&left, &right| {
        compare_scores(value(&rows[left]), value(&rows[right]))
            .then_with(|| rows[left].zone.cmp(&rows[right].zone))
    });

    let mut previous: Option<(f64, usize)> = None;
    for (position, index) in order.into_iter().enumerate() {
        let current = value(&rows[index]);
        let rank = match (mode, previous) {
            (RankMode::Shared | RankMode::Dense, Some((last_value, last_rank)))
                if compare_scores(last_value, current).is_eq() =>
            {
                last_rank
            }
            (RankMode::Dense, Some((_, last_rank))) => last_rank + 1,
            _ => position + 1,
        };
        previous = Some((current, rank));
        set(&mut rows[index], rank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::domain::TOTAL_CATEGORY;

    fn total(zone: &str, result: &str, fraction: &str) -> MetricRecord {
        MetricRecord {
            month: "1".to_string(),
            week: "1".to_string(),
            area: "AREA0001".to_string(),
            zone: zone.to_string(),
            category: TOTAL_CATEGORY.to_string(),
            result_text: result.to_string(),
            fraction_text: fraction.to_string(),
        }
    }

    fn ranks(ranking: &Ranking) -> Vec<(&str, usize)> {
        ranking
            .zones
            .iter()
            .map(|row| (row.zone.as_str(), row.composite_rank))
            .collect()
    }

    #[test]
    fn ordinal_ties_fall_back_to_zone_name() {
        let snapshot = MetricSnapshot {
            productivity: vec![
                total("C", "80%", ""),
                total("B", "90%", ""),
                total("A", "80%", ""),
            ],
            effectiveness: Vec::new(),
        };
        let ranking = rank(
            &snapshot,
            None,
            &PeriodFilter::for_area("AREA0001"),
            RankMode::Ordinal,
        );
        assert_eq!(ranks(&ranking), vec![("A", 2), ("B", 1), ("C", 3)]);
    }

    #[test]
    fn shared_mode_gives_equal_scores_the_same_rank() {
        let snapshot = MetricSnapshot {
            productivity: vec![
                total("A", "80%", ""),
                total("B", "90%", ""),
                total("C", "80%", ""),
                total("D", "70%", ""),
            ],
            effectiveness: Vec::new(),
        };
        let ranking = rank(
            &snapshot,
            None,
            &PeriodFilter::for_area("AREA0001"),
            RankMode::Shared,
        );
        assert_eq!(
            ranks(&ranking),
            vec![("A", 2), ("B", 1), ("C", 2), ("D", 4)]
        );
    }

    #[test]
    fn dense_mode_leaves_no_gaps_after_ties() {
        let snapshot = MetricSnapshot {
            productivity: vec![
                total("A", "80%", ""),
                total("B", "90%", ""),
                total("C", "80%", ""),
                total("D", "70%", ""),
            ],
            effectiveness: Vec::new(),
        };
        let ranking = rank(
            &snapshot,
            None,
            &PeriodFilter::for_area("AREA0001"),
            RankMode::Dense,
        );
        assert_eq!(
            ranks(&ranking),
            vec![("A", 2), ("B", 1), ("C", 2), ("D", 3)]
        );
    }

    #[test]
    fn composites_equal_up_to_rounding_share_a_rank() {
        // 0.4 * 3 and 0.6 * 2 differ in the last bit.
        let snapshot = MetricSnapshot {
            productivity: vec![
                total("X", "0%", ""),
                total("Y", "3%", ""),
                total("Z", "1%", ""),
            ],
            effectiveness: vec![
                total("X", "2%", ""),
                total("Y", "0%", ""),
                total("Z", "0%", ""),
            ],
        };
        let filter = PeriodFilter::for_area("AREA0001");

        let shared = rank(&snapshot, None, &filter, RankMode::Shared);
        assert_eq!(ranks(&shared), vec![("X", 1), ("Y", 1), ("Z", 3)]);

        let dense = rank(&snapshot, None, &filter, RankMode::Dense);
        assert_eq!(ranks(&dense), vec![("X", 1), ("Y", 1), ("Z", 2)]);

        let ordinal = rank(&snapshot, None, &filter, RankMode::Ordinal);
        assert_eq!(ranks(&ordinal), vec![("X", 1), ("Y", 2), ("Z", 3)]);
    }

    #[test]
    fn duplicate_total_rows_count_once_per_zone_but_fully_in_the_grand_total() {
        let snapshot = MetricSnapshot {
            productivity: vec![
                total("A", "50%", "(5/10)"),
                total("A", "100%", "(10/10)"),
                total("B", "80%", "(8/10)"),
            ],
            effectiveness: Vec::new(),
        };
        let ranking = rank(
            &snapshot,
            None,
            &PeriodFilter::for_area("AREA0001"),
            RankMode::Ordinal,
        );

        let a = ranking.zone("A").expect("zone A ranked");
        assert_eq!(a.productivity_percent, 50.0);
        assert_eq!(a.productivity_rank, 2);
        assert_eq!(ranking.zones.len(), 2);
        assert_eq!(ranking.totals.productivity_fraction, Fraction::new(23, 30));
        assert!((ranking.totals.productivity - 23.0 / 30.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn non_total_rows_are_ignored() {
        let mut daily = total("A", "10%", "(1/10)");
        daily.category = "3".to_string();
        let snapshot = MetricSnapshot {
            productivity: vec![daily, total("B", "50%", "(5/10)")],
            effectiveness: Vec::new(),
        };
        let ranking = rank(
            &snapshot,
            None,
            &PeriodFilter::for_area("AREA0001"),
            RankMode::default(),
        );
        assert_eq!(ranking.zones.len(), 1);
        assert_eq!(ranking.totals.productivity_fraction, Fraction::new(5, 10));
    }

    #[test]
    fn other_areas_and_periods_are_excluded() {
        let mut other_area = total("Z", "99%", "(99/100)");
        other_area.area = "AREA0002".to_string();
        let mut other_week = total("Y", "99%", "(99/100)");
        other_week.week = "2".to_string();
        let snapshot = MetricSnapshot {
            productivity: vec![other_area, other_week, total("A", "50%", "(1/2)")],
            effectiveness: Vec::new(),
        };
        let filter = PeriodFilter::new(
            "AREA0001",
            crate::metrics::filter::Selector::All,
            crate::metrics::filter::Selector::parse("1"),
        );
        let ranking = rank(&snapshot, None, &filter, RankMode::default());
        assert_eq!(ranks(&ranking), vec![("A", 1)]);
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

use super::domain::MetricRecord;
use super::percent::TargetStatus;

/// Column ordering for pivot categories (DVVs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryOrder {
    /// Numeric-like categories ascending by value, then the rest lexicographically.
    #[default]
    Numeric,
    Lexicographic,
}

impl CategoryOrder {
    fn compare(self, left: &str, right: &str) -> Ordering {
        match self {
            Self::Lexicographic => left.cmp(right),
            Self::Numeric => match (numeric_value(left), numeric_value(right)) {
                (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| left.cmp(right)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => left.cmp(right),
            },
        }
    }
}

fn numeric_value(category: &str) -> Option<f64> {
    category
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotCell {
    pub result_text: String,
    pub fraction_text: String,
    pub status: TargetStatus,
}

impl PivotCell {
    fn from_record(record: &MetricRecord, target: f64) -> Self {
        Self {
            result_text: record.result_text.clone(),
            fraction_text: record.fraction_text.clone(),
            status: TargetStatus::classify(Some(&record.result_text), target),
        }
    }
}

/// Zone x category matrix of one indicator's records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    categories: Vec<String>,
    zones: Vec<String>,
    cells: BTreeMap<String, BTreeMap<String, PivotCell>>,
    target: f64,
}

impl PivotTable {
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn cell(&self, zone: &str, category: &str) -> Option<&PivotCell> {
        self.cells.get(zone)?.get(category)
    }

    /// Cells of `zone` aligned with [`PivotTable::categories`].
    pub fn row(&self, zone: &str) -> Vec<Option<&PivotCell>> {
        self.categories
            .iter()
            .map(|category| self.cell(zone, category))
            .collect()
    }
}

/// Reshapes flat records into a pivot; the first record of a (zone, category)
/// pair wins and later duplicates are ignored.
pub fn build_pivot(records: &[MetricRecord], order: CategoryOrder, target: f64) -> PivotTable {
    let mut categories: Vec<String> = Vec::new();
    let mut cells: BTreeMap<String, BTreeMap<String, PivotCell>> = BTreeMap::new();

    for record in records {
        if !categories.iter().any(|category| category == &record.category) {
            categories.push(record.category.clone());
        }

        match cells
            .entry(record.zone.clone())
            .or_default()
            .entry(record.category.clone())
        {
            Entry::Vacant(slot) => {
                slot.insert(PivotCell::from_record(record, target));
            }
            Entry::Occupied(_) => {
                debug!(
                    zone = %record.zone,
                    category = %record.category,
                    "duplicate pivot cell ignored"
                );
            }
        }
    }

    categories.sort_by(|left, right| order.compare(left, right));
    let zones = cells.keys().cloned().collect();

    PivotTable {
        categories,
        zones,
        cells,
        target,
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::domain::{MetricRecord, MetricSnapshot, SystemParameters};

/// Textual sentinel meaning "no restriction" for a period selector.
pub const ALL: &str = "all";

/// Month or week selector; `All` lifts the restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Selector {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Selector::parse).unwrap_or_default()
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Selector::from(raw))
    }
}

/// Area scope plus period selectors for one results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub area: String,
    #[serde(default)]
    pub month: Selector,
    #[serde(default)]
    pub week: Selector,
}

impl PeriodFilter {
    pub fn new(area: impl Into<String>, month: Selector, week: Selector) -> Self {
        Self {
            area: area.into(),
            month,
            week,
        }
    }

    /// Area-only filter covering every month and week.
    pub fn for_area(area: impl Into<String>) -> Self {
        Self::new(area, Selector::All, Selector::All)
    }

    pub fn matches(&self, record: &MetricRecord) -> bool {
        record.area == self.area
            && self.month.matches(&record.month)
            && self.week.matches(&record.week)
    }

    pub fn apply(&self, records: &[MetricRecord]) -> Vec<MetricRecord> {
        filter(records, &self.area, &self.month, &self.week)
    }

    pub fn apply_snapshot(&self, snapshot: &MetricSnapshot) -> MetricSnapshot {
        MetricSnapshot {
            productivity: self.apply(&snapshot.productivity),
            effectiveness: self.apply(&snapshot.effectiveness),
        }
    }
}

/// Keeps the records of `area` that fall inside the selected month and week,
/// preserving input order.
pub fn filter(
    records: &[MetricRecord],
    area: &str,
    month: &Selector,
    week: &Selector,
) -> Vec<MetricRecord> {
    records
        .iter()
        .filter(|record| {
            record.area == area && month.matches(&record.month) && week.matches(&record.week)
        })
        .cloned()
        .collect()
}

/// Choices offered by the month and week selectors, `"all"` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOptions {
    pub months: Vec<String>,
    pub weeks: Vec<String>,
}

impl PeriodOptions {
    /// Picks the configured current period when the data has it, else `"all"`.
    pub fn initial_filter(
        &self,
        area: impl Into<String>,
        params: &SystemParameters,
    ) -> PeriodFilter {
        let month = pick(&self.months, &params.current_month);
        let week = pick(&self.weeks, &params.current_week);
        PeriodFilter::new(area, month, week)
    }
}

fn pick(options: &[String], current: &str) -> Selector {
    if !current.is_empty() && current != ALL && options.iter().any(|option| option == current) {
        Selector::Only(current.to_string())
    } else {
        Selector::All
    }
}

/// Distinct non-empty months and weeks of the area's records, first-seen order.
pub fn period_options<'a, I>(records: I, area: &str) -> PeriodOptions
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut months = vec![ALL.to_string()];
    let mut weeks = vec![ALL.to_string()];

    for record in records.into_iter().filter(|record| record.area == area) {
        push_distinct(&mut months, &record.month);
        push_distinct(&mut weeks, &record.week);
    }

    PeriodOptions { months, weeks }
}

fn push_distinct(values: &mut Vec<String>, candidate: &str) {
    if candidate.is_empty() || values.iter().any(|value| value == candidate) {
        return;
    }
    values.push(candidate.to_string());
}

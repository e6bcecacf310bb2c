use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category value marking a zone-level pre-aggregated row.
pub const TOTAL_CATEGORY: &str = "TOTAL";

pub const DEFAULT_PRODUCTIVITY_WEIGHT: f64 = 40.0;
pub const DEFAULT_EFFECTIVENESS_WEIGHT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Productivity,
    Effectiveness,
}

impl Indicator {
    pub const fn ordered() -> [Self; 2] {
        [Self::Productivity, Self::Effectiveness]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Productivity => "Productivity",
            Self::Effectiveness => "Effectiveness",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Productivity => "productivity",
            Self::Effectiveness => "effectiveness",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator '{0}', expected productivity or effectiveness")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "productivity" | "produtividade" => Ok(Self::Productivity),
            "effectiveness" | "efetividade" => Ok(Self::Effectiveness),
            _ => Err(UnknownIndicator(value.to_string())),
        }
    }
}

/// Which upload of an indicator a record set came from.
///
/// `DailyZone` is the per-DVV zone data the results views are built from; the
/// other three are consolidated loads kept for import, export and clearing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    #[default]
    DailyZone,
    WeeklyZone,
    DailyArea,
    WeeklyArea,
}

impl DataKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::DailyZone,
            Self::WeeklyZone,
            Self::DailyArea,
            Self::WeeklyArea,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::DailyZone => "daily_zone",
            Self::WeeklyZone => "weekly_zone",
            Self::DailyArea => "daily_area",
            Self::WeeklyArea => "weekly_area",
        }
    }

    /// Column layout of the kind's TSV files, in file order.
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::DailyZone => &[
                Column::Month,
                Column::Week,
                Column::Area,
                Column::Zone,
                Column::Category,
                Column::Result,
                Column::Fraction,
            ],
            Self::WeeklyZone => &[
                Column::Month,
                Column::Week,
                Column::Area,
                Column::Zone,
                Column::Result,
                Column::Fraction,
            ],
            Self::DailyArea => &[
                Column::Month,
                Column::Week,
                Column::Area,
                Column::Category,
                Column::Result,
                Column::Fraction,
            ],
            Self::WeeklyArea => &[
                Column::Month,
                Column::Week,
                Column::Area,
                Column::Result,
                Column::Fraction,
            ],
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown data kind '{0}', expected daily_zone, weekly_zone, daily_area or weekly_area")]
pub struct UnknownDataKind(pub String);

impl FromStr for DataKind {
    type Err = UnknownDataKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == key)
            .ok_or_else(|| UnknownDataKind(value.to_string()))
    }
}

/// A field of a metrics TSV line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Month,
    Week,
    Area,
    Zone,
    Category,
    Result,
    Fraction,
}

impl Column {
    pub const fn header(self) -> &'static str {
        match self {
            Self::Month => "MÊS",
            Self::Week => "SEMANA",
            Self::Area => "ÁREA",
            Self::Zone => "ZONA",
            Self::Category => "DVV",
            Self::Result => "RESULTADO",
            Self::Fraction => "(A/B)",
        }
    }

    pub fn value(self, record: &MetricRecord) -> &str {
        match self {
            Self::Month => &record.month,
            Self::Week => &record.week,
            Self::Area => &record.area,
            Self::Zone => &record.zone,
            Self::Category => &record.category,
            Self::Result => &record.result_text,
            Self::Fraction => &record.fraction_text,
        }
    }

    pub fn slot(self, record: &mut MetricRecord) -> &mut String {
        match self {
            Self::Month => &mut record.month,
            Self::Week => &mut record.week,
            Self::Area => &mut record.area,
            Self::Zone => &mut record.zone,
            Self::Category => &mut record.category,
            Self::Result => &mut record.result_text,
            Self::Fraction => &mut record.fraction_text,
        }
    }
}

/// Storage key: one record set per indicator and data kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSet {
    pub indicator: Indicator,
    pub kind: DataKind,
}

impl DataSet {
    pub const fn new(indicator: Indicator, kind: DataKind) -> Self {
        Self { indicator, kind }
    }
}

impl From<Indicator> for DataSet {
    fn from(indicator: Indicator) -> Self {
        Self::new(indicator, DataKind::DailyZone)
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.indicator, self.kind)
    }
}

/// One zone/category/period measurement for a single indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub month: String,
    pub week: String,
    pub area: String,
    pub zone: String,
    pub category: String,
    pub result_text: String,
    pub fraction_text: String,
}

impl MetricRecord {
    pub fn is_total(&self) -> bool {
        self.category == TOTAL_CATEGORY
    }
}

/// Records of both indicators as read from the stores for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub productivity: Vec<MetricRecord>,
    pub effectiveness: Vec<MetricRecord>,
}

impl MetricSnapshot {
    pub fn records(&self, indicator: Indicator) -> &[MetricRecord] {
        match indicator {
            Indicator::Productivity => &self.productivity,
            Indicator::Effectiveness => &self.effectiveness,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.productivity.is_empty() && self.effectiveness.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricRecord> {
        self.productivity.iter().chain(self.effectiveness.iter())
    }
}

/// Composite blend, in percent per indicator. Summing to 100 is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub productivity: f64,
    pub effectiveness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            productivity: DEFAULT_PRODUCTIVITY_WEIGHT,
            effectiveness: DEFAULT_EFFECTIVENESS_WEIGHT,
        }
    }
}

impl Weights {
    pub fn composite(&self, productivity: f64, effectiveness: f64) -> f64 {
        productivity * (self.productivity / 100.0) + effectiveness * (self.effectiveness / 100.0)
    }
}

/// Administrator-maintained targets, reporting period and composite weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    pub productivity_target: f64,
    pub effectiveness_target: f64,
    pub current_month: String,
    pub current_week: String,
    pub last_updated_at: String,
    pub productivity_weight: f64,
    pub effectiveness_weight: f64,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            productivity_target: 0.0,
            effectiveness_target: 0.0,
            current_month: "1".to_string(),
            current_week: "1".to_string(),
            last_updated_at: String::new(),
            productivity_weight: DEFAULT_PRODUCTIVITY_WEIGHT,
            effectiveness_weight: DEFAULT_EFFECTIVENESS_WEIGHT,
        }
    }
}

impl SystemParameters {
    pub fn weights(&self) -> Weights {
        Weights {
            productivity: self.productivity_weight,
            effectiveness: self.effectiveness_weight,
        }
    }

    pub fn target(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Productivity => self.productivity_target,
            Indicator::Effectiveness => self.effectiveness_target,
        }
    }

    /// Target for the composite score, blended with the same weights as the score.
    pub fn composite_target(&self) -> f64 {
        self.weights()
            .composite(self.productivity_target, self.effectiveness_target)
    }
}

use serde::{Deserialize, Serialize};

/// `numerator / denominator * 100`, with a zero denominator defined as `0`.
pub fn to_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }

    numerator as f64 / denominator as f64 * 100.0
}

/// Parses locale-formatted result text such as `"87,5%"`; unparseable text is `0`.
pub fn parse_percent_text(text: Option<&str>) -> f64 {
    try_parse_percent_text(text).unwrap_or(0.0)
}

pub fn try_parse_percent_text(text: Option<&str>) -> Option<f64> {
    let trimmed = text?.trim();
    let without_sign = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if without_sign.is_empty() {
        return None;
    }

    let normalized = without_sign.replacen(',', ".", 1);
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Presentation class of a result against its configured target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    OnTarget,
    BelowTarget,
    Neutral,
}

impl TargetStatus {
    pub fn classify(result_text: Option<&str>, target: f64) -> Self {
        match try_parse_percent_text(result_text) {
            Some(value) => Self::for_value(value, target),
            None => Self::Neutral,
        }
    }

    pub fn for_value(value: f64, target: f64) -> Self {
        if value >= target {
            Self::OnTarget
        } else {
            Self::BelowTarget
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTarget => "On target",
            Self::BelowTarget => "Below target",
            Self::Neutral => "No result",
        }
    }
}

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::sync::OnceLock;

use super::percent::to_percentage;

/// Canonical `(A/B)` delimiter; `|` is accepted as legacy input only.
pub const CANONICAL_DELIMITER: char = '/';
pub const LEGACY_DELIMITER: char = '|';

static FRACTION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn fraction_pattern() -> &'static Regex {
    FRACTION_PATTERN.get_or_init(|| {
        Regex::new(r"\(\s*(\d+)\s*([/|])\s*(\d+)\s*\)").expect("fraction pattern is valid")
    })
}

/// Numerator/denominator pair behind a displayed percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 0,
    };

    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn percentage(self) -> f64 {
        to_percentage(self.numerator, self.denominator)
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, other: Fraction) -> Fraction {
        Fraction {
            numerator: self.numerator.saturating_add(other.numerator),
            denominator: self.denominator.saturating_add(other.denominator),
        }
    }
}

impl std::iter::Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::ZERO, Add::add)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}{}{})",
            self.numerator, CANONICAL_DELIMITER, self.denominator
        )
    }
}

/// A parsed fraction plus the delimiter it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFraction {
    pub fraction: Fraction,
    pub legacy: bool,
}

/// Parses the first parenthesized `A/B` (or legacy `A|B`) pair in `text`.
///
/// Total: missing, empty and malformed input all yield [`Fraction::ZERO`].
pub fn parse_fraction(text: Option<&str>) -> Fraction {
    scan_fraction(text)
        .map(|parsed| parsed.fraction)
        .unwrap_or(Fraction::ZERO)
}

pub(crate) fn scan_fraction(text: Option<&str>) -> Option<ParsedFraction> {
    let captures = fraction_pattern().captures(text?)?;
    let numerator = captures.get(1)?.as_str().parse::<u64>().ok()?;
    let legacy = captures.get(2)?.as_str() == "|";
    let denominator = captures.get(3)?.as_str().parse::<u64>().ok()?;

    Some(ParsedFraction {
        fraction: Fraction::new(numerator, denominator),
        legacy,
    })
}

/// Rewrites a legacy `(A|B)` fraction to the canonical `(A/B)` form.
///
/// Returns `None` when the text holds no legacy fraction and can be kept as is.
pub(crate) fn migrate_legacy(text: &str) -> Option<String> {
    let parsed = scan_fraction(Some(text))?;
    if !parsed.legacy {
        return None;
    }

    let span = fraction_pattern().find(text)?;
    let mut migrated = String::with_capacity(text.len());
    migrated.push_str(&text[..span.start()]);
    migrated.push_str(&parsed.fraction.to_string());
    migrated.push_str(&text[span.end()..]);
    Some(migrated)
}

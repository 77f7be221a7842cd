//! Numeric literal detection, summary statistics and default binning

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{BinMode, DefaultBins, FirstBin, LastBin, TermKind};

// ASCII digits only, so every match is accepted by `str::parse::<f64>`
static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());

/// Number of digits after the decimal point, or `None` when `value` is not
/// a plain decimal literal. Trailing zeros count ("1.50" has depth 2).
pub fn decimal_depth(value: &str) -> Option<usize> {
    if !NUMERIC_PATTERN.is_match(value) {
        return None;
    }
    Some(value.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0))
}

/// Parse a trimmed cell as a number; blanks and non-numeric text give `None`
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Running min/max over the numeric values of a column
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl NumericStats {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Compute the default discretization for a numeric column.
///
/// Returns `None` when no values were observed. A constant column
/// (`max <= min`) gets the two-bin split `{<= v, > v}` around its value.
pub fn default_bins(
    kind: TermKind,
    stats: &NumericStats,
    bin_count: usize,
) -> Option<DefaultBins> {
    if stats.is_empty() {
        return None;
    }

    if stats.max <= stats.min {
        let boundary = stats.min;
        return Some(DefaultBins {
            mode: BinMode::RegularBin,
            bin_size: 1.0,
            start_inclusive: false,
            stop_inclusive: true,
            first_bin: FirstBin {
                start_unbounded: true,
                stop: boundary,
            },
            last_bin: Some(LastBin {
                start: boundary,
                stop_unbounded: true,
            }),
        });
    }

    let raw = (stats.max - stats.min) / bin_count.max(1) as f64;
    // Only integer widths are rounded, and upward, so the bins always
    // reach the observed maximum.
    let bin_size = match kind {
        TermKind::Integer => raw.ceil(),
        _ => raw,
    };

    Some(DefaultBins {
        mode: BinMode::RegularBin,
        bin_size,
        start_inclusive: true,
        stop_inclusive: false,
        first_bin: FirstBin {
            start_unbounded: true,
            stop: stats.min + bin_size,
        },
        last_bin: None,
    })
}

//! Column statistics and numeric summaries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::schema::{Cell, ColumnStatistics};

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming statistics accumulator using Welford's algorithm.
#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64,  // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Sample standard deviation (n - 1 denominator); undefined below two values.
    fn sample_std(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some((self.m2 / (self.count - 1) as f64).sqrt())
        }
    }
}

/// Summary of one numeric column, in the layout of a `describe` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// `None` when fewer than two values are present.
    pub std: Option<f64>,
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    pub max: f64,
}

/// Statistics for a materialized column.
///
/// Missing values are numeric `None` cells and blank text cells.
pub fn column_statistics(cells: &[&Cell]) -> ColumnStatistics {
    let mut null_count = 0;
    let mut distinct: HashSet<String> = HashSet::new();
    let mut stats = StreamingStats::new();

    for cell in cells {
        match cell {
            Cell::Numeric(None) => null_count += 1,
            Cell::Numeric(Some(n)) => {
                stats.add(n.as_f64());
                distinct.insert(n.to_string());
            }
            Cell::Text(s) if s.trim().is_empty() => null_count += 1,
            Cell::Text(s) => {
                distinct.insert(s.clone());
            }
        }
    }

    let (min, max) = if stats.count > 0 {
        (Some(stats.min), Some(stats.max))
    } else {
        (None, None)
    };

    ColumnStatistics {
        count: cells.len(),
        null_count,
        unique_count: distinct.len(),
        min,
        max,
    }
}

/// Summarize a numeric column. Returns `None` if there are no values.
pub fn summarize(column: impl Into<String>, values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let mut stats = StreamingStats::new();
    for &value in values {
        stats.add(value);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(NumericSummary {
        column: column.into(),
        count: stats.count,
        mean: stats.mean,
        std: stats.sample_std(),
        min: stats.min,
        q1: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q3: percentile(&sorted, 75.0),
        max: stats.max,
    })
}

/// Percentile of sorted values with linear interpolation between ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Number;

    #[test]
    fn test_numeric_column_statistics() {
        let cells = vec![
            Cell::Numeric(Some(Number::Real(10.0))),
            Cell::Numeric(Some(Number::Real(20.5))),
            Cell::Numeric(None),
            Cell::Numeric(Some(Number::Real(10.0))),
        ];
        let refs: Vec<&Cell> = cells.iter().collect();
        let stats = column_statistics(&refs);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.min, Some(10.0));
        assert_eq!(stats.max, Some(20.5));
    }

    #[test]
    fn test_text_column_statistics() {
        let cells = vec![
            Cell::Text("00123".into()),
            Cell::Text("".into()),
            Cell::Text("00123".into()),
        ];
        let refs: Vec<&Cell> = cells.iter().collect();
        let stats = column_statistics(&refs);

        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.unique_count, 1);
        assert_eq!(stats.min, None);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize("v", &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q3, 3.25);
        let std = summary.std.unwrap();
        assert!((std - 1.290_994).abs() < 1e-6);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize("v", &[7.0]).unwrap();
        assert_eq!(summary.std, None);
        assert_eq!(summary.median, 7.0);
        assert!(summarize("v", &[]).is_none());
    }
}

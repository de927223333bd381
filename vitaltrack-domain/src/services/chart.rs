//! Daily aggregation of blood-pressure readings for chart rendering.
//!
//! Takes the raw time series of one person's readings as three
//! index-aligned sequences and collapses them into one averaged data
//! point per calendar day. Days are bucketed in UTC; inputs arrive as
//! `DateTime<Utc>`, so timezone ambiguity is resolved before this code
//! runs.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound of the chart's y-axis domain (mmHg)
pub const Y_AXIS_MIN: u16 = 40;

/// Upper bound of the chart's y-axis domain (mmHg)
pub const Y_AXIS_MAX: u16 = 220;

/// Systolic averages strictly above this are flagged
pub const SYSTOLIC_ALERT_THRESHOLD: f64 = 140.0;

/// Diastolic averages strictly above this are flagged
pub const DIASTOLIC_ALERT_THRESHOLD: f64 = 100.0;

/// Errors from the daily aggregation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    /// The three input sequences must be index-aligned
    #[error("Mismatched series lengths: {timestamps} timestamps, {systolic} systolic, {diastolic} diastolic")]
    MismatchedSeries {
        timestamps: usize,
        systolic: usize,
        diastolic: usize,
    },
}

/// Presentation classification for one aggregated data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointLevel {
    /// Within the normal range
    Normal,
    /// Average exceeds the systolic or diastolic alert threshold
    Elevated,
}

/// One averaged data point per calendar day, sorted chronologically.
/// The three vectors are index-aligned: `avg_systolic[i]` and
/// `avg_diastolic[i]` belong to `dates[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// Distinct calendar days present, formatted `YYYY/MM/DD`, ascending
    pub dates: Vec<String>,

    /// Mean systolic value per day
    pub avg_systolic: Vec<f64>,

    /// Mean diastolic value per day
    pub avg_diastolic: Vec<f64>,
}

impl DailySeries {
    /// Number of aggregated days
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no readings were aggregated
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Format a calendar day as the fixed-width chart key.
/// Fixed width makes lexicographic order equal chronological order.
fn day_key(day: NaiveDate) -> String {
    day.format("%Y/%m/%d").to_string()
}

/// Collapse index-aligned reading sequences into per-day averages.
///
/// Readings sharing a UTC calendar day are combined by arithmetic mean;
/// multiple readings on one day are averaged, never deduplicated. Empty
/// input yields an empty series. Input order does not matter: grouping
/// is order-independent and the output is sorted by day.
pub fn aggregate_daily(
    timestamps: &[DateTime<Utc>],
    systolic: &[u16],
    diastolic: &[u16],
) -> Result<DailySeries, ChartError> {
    if timestamps.len() != systolic.len() || timestamps.len() != diastolic.len() {
        return Err(ChartError::MismatchedSeries {
            timestamps: timestamps.len(),
            systolic: systolic.len(),
            diastolic: diastolic.len(),
        });
    }

    // Group values by calendar day; BTreeMap keeps the days sorted.
    let mut buckets: BTreeMap<NaiveDate, (Vec<u16>, Vec<u16>)> = BTreeMap::new();
    for (i, timestamp) in timestamps.iter().enumerate() {
        let bucket = buckets.entry(timestamp.date_naive()).or_default();
        bucket.0.push(systolic[i]);
        bucket.1.push(diastolic[i]);
    }

    let mut series = DailySeries::default();
    for (day, (sys_values, dia_values)) in buckets {
        // A bucket exists only if at least one reading produced it, so
        // the divisor is never zero.
        let count = sys_values.len() as f64;
        let sys_sum: f64 = sys_values.iter().map(|&v| f64::from(v)).sum();
        let dia_sum: f64 = dia_values.iter().map(|&v| f64::from(v)).sum();

        series.dates.push(day_key(day));
        series.avg_systolic.push(sys_sum / count);
        series.avg_diastolic.push(dia_sum / count);
    }

    Ok(series)
}

/// Classify one aggregated point for rendering. The boundary is
/// exclusive on the normal side: exactly 140/100 is still `Normal`.
pub fn classify_point(avg_systolic: f64, avg_diastolic: f64) -> PointLevel {
    if avg_systolic > SYSTOLIC_ALERT_THRESHOLD || avg_diastolic > DIASTOLIC_ALERT_THRESHOLD {
        PointLevel::Elevated
    } else {
        PointLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        let series = aggregate_daily(&[], &[], &[]).unwrap();
        assert!(series.is_empty());
        assert!(series.dates.is_empty());
        assert!(series.avg_systolic.is_empty());
        assert!(series.avg_diastolic.is_empty());
    }

    #[test]
    fn test_one_date_per_distinct_day() {
        let timestamps = vec![
            ts("2024-01-01T08:00:00Z"),
            ts("2024-01-01T20:00:00Z"),
            ts("2024-01-03T09:00:00Z"),
            ts("2024-02-01T09:00:00Z"),
        ];
        let systolic = vec![120, 130, 125, 118];
        let diastolic = vec![80, 85, 82, 78];

        let series = aggregate_daily(&timestamps, &systolic, &diastolic).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.dates, vec!["2024/01/01", "2024/01/03", "2024/02/01"]);
    }

    #[test]
    fn test_same_day_readings_are_averaged_exactly() {
        let timestamps = vec![
            ts("2024-03-10T06:00:00Z"),
            ts("2024-03-10T12:00:00Z"),
            ts("2024-03-10T21:00:00Z"),
        ];
        let systolic = vec![120, 130, 140];
        let diastolic = vec![70, 80, 90];

        let series = aggregate_daily(&timestamps, &systolic, &diastolic).unwrap();
        assert_eq!(series.dates, vec!["2024/03/10"]);
        assert_eq!(series.avg_systolic, vec![130.0]);
        assert_eq!(series.avg_diastolic, vec![80.0]);
    }

    #[test]
    fn test_single_reading_identity() {
        let series =
            aggregate_daily(&[ts("2024-05-05T10:30:00Z")], &[117], &[76]).unwrap();
        assert_eq!(series.dates, vec!["2024/05/05"]);
        assert_eq!(series.avg_systolic, vec![117.0]);
        assert_eq!(series.avg_diastolic, vec![76.0]);
    }

    #[test]
    fn test_order_invariance() {
        let timestamps = vec![
            ts("2024-01-02T08:00:00Z"),
            ts("2024-01-01T08:00:00Z"),
            ts("2024-01-01T20:00:00Z"),
        ];
        let systolic = vec![150, 120, 130];
        let diastolic = vec![95, 80, 85];

        let shuffled = aggregate_daily(&timestamps, &systolic, &diastolic).unwrap();

        let ordered = aggregate_daily(
            &[timestamps[1], timestamps[2], timestamps[0]],
            &[systolic[1], systolic[2], systolic[0]],
            &[diastolic[1], diastolic[2], diastolic[0]],
        )
        .unwrap();

        assert_eq!(shuffled, ordered);
    }

    #[test]
    fn test_worked_example() {
        let timestamps = vec![
            ts("2024-01-01T08:00:00Z"),
            ts("2024-01-01T20:00:00Z"),
            ts("2024-01-02T08:00:00Z"),
        ];
        let systolic = vec![120, 130, 150];
        let diastolic = vec![80, 85, 95];

        let series = aggregate_daily(&timestamps, &systolic, &diastolic).unwrap();
        assert_eq!(series.dates, vec!["2024/01/01", "2024/01/02"]);
        assert_eq!(series.avg_systolic, vec![125.0, 150.0]);
        assert_eq!(series.avg_diastolic, vec![82.5, 95.0]);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = aggregate_daily(&[ts("2024-01-01T08:00:00Z")], &[120, 130], &[80]);
        assert_eq!(
            result.unwrap_err(),
            ChartError::MismatchedSeries {
                timestamps: 1,
                systolic: 2,
                diastolic: 1,
            }
        );
    }

    #[test]
    fn test_systolic_boundary_is_exclusive() {
        assert_eq!(classify_point(140.0, 80.0), PointLevel::Normal);
        assert_eq!(classify_point(141.0, 80.0), PointLevel::Elevated);
    }

    #[test]
    fn test_diastolic_boundary_is_exclusive() {
        assert_eq!(classify_point(120.0, 100.0), PointLevel::Normal);
        assert_eq!(classify_point(120.0, 101.0), PointLevel::Elevated);
    }

    #[test]
    fn test_axis_domain_covers_plausible_readings() {
        assert_eq!(Y_AXIS_MIN, 40);
        assert_eq!(Y_AXIS_MAX, 220);
        assert!(Y_AXIS_MIN < Y_AXIS_MAX);
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vitaltrack_domain::services::chart::{
    classify_point, DailySeries, PointLevel, Y_AXIS_MAX, Y_AXIS_MIN,
};

/// Y-axis domain for the rendered chart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AxisRange {
    /// Lower bound (mmHg)
    pub min: u16,

    /// Upper bound (mmHg)
    pub max: u16,
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            min: Y_AXIS_MIN,
            max: Y_AXIS_MAX,
        }
    }
}

/// One aggregated chart point with its presentation classification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    /// Calendar day, formatted `YYYY/MM/DD`
    pub date: String,

    /// Mean systolic value for the day
    pub avg_systolic: f64,

    /// Mean diastolic value for the day
    pub avg_diastolic: f64,

    /// `normal` or `elevated`
    pub level: String,
}

/// Chart payload: per-day averages as two line series plus tagged points
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartResponse {
    /// Distinct calendar days present, formatted `YYYY/MM/DD`, ascending
    pub dates: Vec<String>,

    /// Mean systolic value per day, aligned with `dates`
    pub avg_systolic: Vec<f64>,

    /// Mean diastolic value per day, aligned with `dates`
    pub avg_diastolic: Vec<f64>,

    /// The same data as per-point objects with classification
    pub points: Vec<ChartPoint>,

    /// Y-axis domain the renderer should clamp to
    pub y_axis: AxisRange,
}

fn level_label(level: PointLevel) -> &'static str {
    match level {
        PointLevel::Normal => "normal",
        PointLevel::Elevated => "elevated",
    }
}

impl From<DailySeries> for ChartResponse {
    fn from(series: DailySeries) -> Self {
        let points = series
            .dates
            .iter()
            .zip(series.avg_systolic.iter().zip(series.avg_diastolic.iter()))
            .map(|(date, (&avg_systolic, &avg_diastolic))| ChartPoint {
                date: date.clone(),
                avg_systolic,
                avg_diastolic,
                level: level_label(classify_point(avg_systolic, avg_diastolic)).to_string(),
            })
            .collect();

        Self {
            dates: series.dates,
            avg_systolic: series.avg_systolic,
            avg_diastolic: series.avg_diastolic,
            points,
            y_axis: AxisRange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_carry_classification() {
        let series = DailySeries {
            dates: vec!["2024/01/01".to_string(), "2024/01/02".to_string()],
            avg_systolic: vec![125.0, 150.0],
            avg_diastolic: vec![82.5, 95.0],
        };

        let response = ChartResponse::from(series);
        assert_eq!(response.points.len(), 2);
        assert_eq!(response.points[0].level, "normal");
        assert_eq!(response.points[1].level, "elevated");
        assert_eq!(response.y_axis.min, 40);
        assert_eq!(response.y_axis.max, 220);
    }
}

//! Skill demand forecasting behind a pluggable [`Forecaster`].
//!
//! Default: `LinearTrendForecaster`, an ordinary least-squares line over the
//! day ordinal of each observation, projected onto month-end dates.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::queries::SeriesPoint;
use crate::errors::AppError;

/// Series shorter than this cannot be forecast.
pub const MIN_FORECAST_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Time series → forecast points.
///
/// Callers guarantee `series` is sorted ascending with at least
/// [`MIN_FORECAST_POINTS`] points.
#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn forecast(
        &self,
        series: &[SeriesPoint],
        periods: usize,
    ) -> Result<Vec<ForecastPoint>, AppError>;

    fn backend(&self) -> &'static str;
}

pub struct LinearTrendForecaster;

#[async_trait]
impl Forecaster for LinearTrendForecaster {
    async fn forecast(
        &self,
        series: &[SeriesPoint],
        periods: usize,
    ) -> Result<Vec<ForecastPoint>, AppError> {
        linear_trend(series, periods)
    }

    fn backend(&self) -> &'static str {
        "linear_trend"
    }
}

fn linear_trend(series: &[SeriesPoint], periods: usize) -> Result<Vec<ForecastPoint>, AppError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AppError::Analysis("cannot forecast an empty series".to_string()));
    };
    if series.len() < MIN_FORECAST_POINTS {
        return Err(AppError::Analysis(format!(
            "need at least {MIN_FORECAST_POINTS} points to forecast, got {}",
            series.len()
        )));
    }

    let origin = first.date;
    let xs: Vec<f64> = series
        .iter()
        .map(|p| (p.date - origin).num_days() as f64)
        .collect();
    let ys: Vec<f64> = series.iter().map(|p| p.count as f64).collect();

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (cov, var) = xs
        .iter()
        .zip(&ys)
        .fold((0.0, 0.0), |(cov, var), (x, y)| {
            (cov + (x - mean_x) * (y - mean_y), var + (x - mean_x).powi(2))
        });
    // distinct dates guarantee var > 0 for two or more points
    let slope = if var > 0.0 { cov / var } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let mut points = Vec::with_capacity(periods);
    let mut cursor = last.date;
    for _ in 0..periods {
        let Some(next) = next_month_end(cursor) else {
            break;
        };
        let x = (next - origin).num_days() as f64;
        points.push(ForecastPoint {
            date: next,
            value: (intercept + slope * x).max(0.0),
        });
        cursor = next;
    }
    Ok(points)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// First month-end strictly after `date`.
fn next_month_end(date: NaiveDate) -> Option<NaiveDate> {
    let end = month_end(date.year(), date.month())?;
    if end > date {
        return Some(end);
    }
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    month_end(year, month)
}

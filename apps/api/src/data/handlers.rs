//! Axum route handlers for dataset queries.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::models::Field;
use crate::data::queries::{
    compare_roles, filtered_salary_average, geo_points, skill_time_series, top_trending_skills,
    unique_values, GeoPoint, RoleComparison, SalaryEstimate, SeriesPoint, SkillCount,
};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_TRENDING: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub raw_rows: usize,
    pub dropped_invalid_salary: usize,
    pub source: Option<PathBuf>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Times the source has been read since startup.
    pub source_reads: usize,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SkillSeriesResponse {
    pub skill: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
pub struct SalaryQuery {
    pub role: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct SalaryResponse {
    pub role: String,
    pub city: String,
    pub estimate: SalaryEstimate,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub role_a: String,
    pub role_b: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/dataset/summary
pub async fn handle_summary(State(state): State<AppState>) -> Result<Json<DatasetSummary>, AppError> {
    let dataset = state.dataset().await?;
    let range = dataset.date_range();
    let stats = dataset.stats();
    Ok(Json(DatasetSummary {
        records: dataset.len(),
        raw_rows: stats.raw_rows,
        dropped_invalid_salary: stats.dropped_invalid_salary,
        source: stats.source.clone(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
        source_reads: state.store.load_count(),
    }))
}

/// POST /api/v1/dataset/reload
///
/// Drops the cache and re-reads the source. On failure the store stays
/// unloaded and the error is returned.
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<DatasetSummary>, AppError> {
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    handle_summary(State(state)).await
}

/// GET /api/v1/values/:field
///
/// Sorted distinct values for a selector (`role`, `city` or `skill`).
pub async fn handle_unique_values(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let field = match field.as_str() {
        "role" => Field::Role,
        "city" => Field::City,
        "skill" => Field::Skill,
        other => {
            return Err(AppError::NotFound(format!(
                "Unknown field '{other}' (expected role, city or skill)"
            )))
        }
    };
    let dataset = state.dataset().await?;
    Ok(Json(unique_values(&dataset, field)))
}

/// GET /api/v1/skills/trending?n=
pub async fn handle_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingQuery>,
) -> Result<Json<Vec<SkillCount>>, AppError> {
    let dataset = state.dataset().await?;
    let n = params.n.unwrap_or(DEFAULT_TRENDING);
    Ok(Json(top_trending_skills(&dataset, n)))
}

/// GET /api/v1/skills/:skill/series
pub async fn handle_skill_series(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Result<Json<SkillSeriesResponse>, AppError> {
    let dataset = state.dataset().await?;
    let points = skill_time_series(&dataset, &skill);
    Ok(Json(SkillSeriesResponse { skill, points }))
}

/// GET /api/v1/salary?role=&city=
///
/// Salary estimator. Returns `{"status": "unavailable"}` when nothing matches.
pub async fn handle_salary(
    State(state): State<AppState>,
    Query(params): Query<SalaryQuery>,
) -> Result<Json<SalaryResponse>, AppError> {
    let dataset = state.dataset().await?;
    let estimate = filtered_salary_average(&dataset, &params.role, &params.city);
    tracing::debug!(role = %params.role, city = %params.city, average = ?estimate.average(), "Salary estimate");
    Ok(Json(SalaryResponse {
        role: params.role,
        city: params.city,
        estimate,
    }))
}

/// GET /api/v1/geo
pub async fn handle_geo(State(state): State<AppState>) -> Result<Json<Vec<GeoPoint>>, AppError> {
    let dataset = state.dataset().await?;
    Ok(Json(geo_points(&dataset)))
}

/// GET /api/v1/compare?role_a=&role_b=
pub async fn handle_compare(
    State(state): State<AppState>,
    Query(params): Query<CompareQuery>,
) -> Result<Json<RoleComparison>, AppError> {
    let dataset = state.dataset().await?;
    Ok(Json(compare_roles(&dataset, &params.role_a, &params.role_b)))
}

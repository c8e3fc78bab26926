//! Axum route handlers for the forecasting and resume features.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::forecast::{ForecastPoint, MIN_FORECAST_POINTS};
use crate::analysis::resume::{analyze_resume, ResumeReport};
use crate::data::queries::{skill_time_series, SeriesPoint};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub skill: String,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub skill: String,
    pub history: Vec<SeriesPoint>,
    /// True when the series is too short to fit; `forecast` is then empty.
    pub insufficient_data: bool,
    pub forecast: Vec<ForecastPoint>,
    pub forecaster_backend: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResumeRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/forecast?skill=
///
/// Skill demand history plus projected monthly demand.
pub async fn handle_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let dataset = state.dataset().await?;
    let history = skill_time_series(&dataset, &params.skill);

    let insufficient_data = history.len() < MIN_FORECAST_POINTS;
    let forecast = if insufficient_data {
        Vec::new()
    } else {
        state
            .forecaster
            .forecast(&history, state.config.forecast_periods)
            .await?
    };

    Ok(Json(ForecastResponse {
        skill: params.skill,
        history,
        insufficient_data,
        forecast,
        forecaster_backend: state.forecaster.backend().to_string(),
    }))
}

/// POST /api/v1/resume/analyze
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<ResumeReport>, AppError> {
    run_analysis(&state, &request.text).await
}

/// POST /api/v1/resume/upload
///
/// Multipart upload with a single `.txt` or `.pdf` file field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeReport>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;

    let file_name = field.file_name().unwrap_or_default().to_lowercase();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

    let text = resume_text(&file_name, &bytes)?;
    run_analysis(&state, &text).await
}

async fn run_analysis(state: &AppState, text: &str) -> Result<Json<ResumeReport>, AppError> {
    let dataset = state.dataset().await?;
    let report = analyze_resume(
        text,
        &dataset,
        state.skill_extractor.as_ref(),
        state.config.trending_limit,
    )
    .await?;
    Ok(Json(report))
}

/// Decodes an uploaded resume by extension.
fn resume_text(file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    if file_name.ends_with(".txt") {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("Resume text must be UTF-8".to_string()))
    } else if file_name.ends_with(".pdf") {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))
    } else {
        Err(AppError::Validation(format!(
            "Unsupported resume file '{file_name}' (expected .txt or .pdf)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_text_decodes_utf8_txt() {
        let text = resume_text("cv.txt", "Python — SQL".as_bytes()).unwrap();
        assert_eq!(text, "Python — SQL");
    }

    #[test]
    fn test_resume_text_rejects_invalid_utf8() {
        let err = resume_text("cv.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resume_text_rejects_unknown_extension() {
        let err = resume_text("cv.docx", b"whatever").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resume_text_rejects_garbage_pdf() {
        let err = resume_text("cv.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

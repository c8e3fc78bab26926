use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_FEEDBACK_CHARS: usize = 5_000;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub receipt_id: Uuid,
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /api/v1/feedback
/// Feedback is logged, not persisted.
pub async fn handle_feedback(
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    let length = message.chars().count();
    if length > MAX_FEEDBACK_CHARS {
        return Err(AppError::Validation(format!(
            "message exceeds {MAX_FEEDBACK_CHARS} characters"
        )));
    }

    let receipt_id = Uuid::new_v4();
    info!(%receipt_id, length, feedback = message, "Feedback received");

    Ok(Json(FeedbackResponse {
        receipt_id,
        status: "received",
        message: "Thanks for your feedback!",
    }))
}

use crate::domain::risk::{self, RiskAssessment, Severity, MAX_SCORE};
use crate::error::{AppError, AppResult};
use crate::state::SharedState;
use axum::{routing::post, Json, Router};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ClassifyPayload {
    pub score: u16,
    pub severity: Option<Severity>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/classify", post(classify))
        .with_state(state)
}

async fn classify(Json(payload): Json<ClassifyPayload>) -> AppResult<Json<RiskAssessment>> {
    let score = u8::try_from(payload.score)
        .ok()
        .filter(|s| *s <= MAX_SCORE)
        .ok_or_else(|| AppError::BadRequest(format!("score {} is outside 0..=100", payload.score)))?;
    let assessment =
        risk::assess(score, payload.severity).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(assessment))
}

use axum::{
    extract::{Extension, State},
    response::Json,
};
use chrono::Utc;

use crate::dtos::prediction_dtos::{
    PredictionBoard, SubmitPredictionsRequest, SubmitPredictionsResponse,
};
use crate::errors::Result;
use crate::models::participant::Claims;
use crate::models::prediction::Prediction;
use crate::services::board_service::build_board;
use crate::state::AppState;

pub async fn get_board(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PredictionBoard>> {
    let games = state.catalog.games().await?;
    let saved = state.predictions.for_participant(&claims.sub).await?;

    Ok(Json(build_board(
        &claims.sub,
        &games,
        &saved,
        &state.deadlines,
        Utc::now(),
    )))
}

pub async fn get_my_predictions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Prediction>>> {
    let mut predictions = state.predictions.for_participant(&claims.sub).await?;
    predictions.sort_by_key(|p| p.match_id);
    Ok(Json(predictions))
}

pub async fn submit_predictions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitPredictionsRequest>,
) -> Result<Json<SubmitPredictionsResponse>> {
    tracing::info!(
        "🎯 {} submitting {} predictions",
        claims.sub,
        payload.predictions.len()
    );

    let saved = state
        .submissions
        .submit(&claims.sub, &payload.predictions, Utc::now())
        .await?;

    Ok(Json(SubmitPredictionsResponse {
        success: true,
        saved,
        message: format!("{} predictions saved", saved),
    }))
}

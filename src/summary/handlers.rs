use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::DailySummary, services};
use crate::{auth::AuthUser, dates, error::AppError, state::AppState};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary/:date", get(get_daily_summary))
}

#[instrument(skip(state))]
pub async fn get_daily_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>, AppError> {
    let date = dates::parse_day(&date)?;
    Ok(Json(services::daily_summary(&state.db, user_id, date).await?))
}

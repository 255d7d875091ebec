use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{ActiveGoalQuery, CreateGoalRequest, GoalResponse, UpdateGoalRequest},
    services,
};
use crate::{auth::AuthUser, dates, error::AppError, state::AppState};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/active", get(get_active_goal))
        .route("/goals/:id", patch(update_goal).delete(delete_goal))
}

#[instrument(skip(state))]
pub async fn get_active_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ActiveGoalQuery>,
) -> Result<Json<Option<GoalResponse>>, AppError> {
    let date = dates::parse_day_or_today(q.date.as_deref())?;
    let goal = services::get_active_goal(&state.db, user_id, date).await?;
    Ok(Json(goal))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GoalResponse>>, AppError> {
    Ok(Json(services::list_goals(&state.db, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), AppError> {
    let start_date = dates::parse_day_or_today(body.start_date.as_deref())?;
    let goal = services::create_goal(&state.db, user_id, body.targets, start_date).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

#[instrument(skip(state, body))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let goal = services::update_goal(&state.db, user_id, id, body.targets).await?;
    Ok(Json(goal))
}

#[instrument(skip(state))]
pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_goal(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

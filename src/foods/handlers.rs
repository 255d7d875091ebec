use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateFoodRequest, FoodResponse, ServingResponse},
    services,
};
use crate::{auth::AuthUser, error::AppError, nutrition::scaler::NutritionResult, state::AppState};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", post(create_food))
        .route("/foods/:id", get(get_food))
        .route("/servings/:id/nutrition", post(apply_nutrition))
}

#[instrument(skip(state, body))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), AppError> {
    let food = services::create_food(&state.db, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodResponse>, AppError> {
    Ok(Json(services::get_food(&state.db, user_id, id).await?))
}

#[instrument(skip(state, body))]
pub async fn apply_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<NutritionResult>,
) -> Result<Json<ServingResponse>, AppError> {
    let serving = services::apply_nutrition(&state.db, user_id, id, body).await?;
    Ok(Json(serving))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AddMealItemRequest, DeleteMealItemResponse, MealItemResponse, UpdateMealItemRequest},
    services,
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn meal_item_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-items", post(add_meal_item))
        .route("/meal-items/:id", patch(update_meal_item).delete(delete_meal_item))
}

#[instrument(skip(state, body))]
pub async fn add_meal_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddMealItemRequest>,
) -> Result<(StatusCode, Json<MealItemResponse>), AppError> {
    let item = services::add_item(&state.db, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, body))]
pub async fn update_meal_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealItemRequest>,
) -> Result<Json<MealItemResponse>, AppError> {
    Ok(Json(services::update_item(&state.db, user_id, id, body).await?))
}

#[instrument(skip(state))]
pub async fn delete_meal_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteMealItemResponse>, AppError> {
    Ok(Json(services::delete_item(&state.db, user_id, id).await?))
}

use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateFoodRequest, FoodResponse, NewServing, ServingResponse},
    repo,
};
use crate::error::{AppError, AppResult};
use crate::nutrition::scaler::{scale_for_serving, NutritionResult};

fn validate_serving(s: &NewServing) -> AppResult<()> {
    if !s.size.is_finite() || s.size <= 0.0 {
        return Err(AppError::validation("serving size must be a positive number"));
    }
    if s.unit.trim().is_empty() {
        return Err(AppError::validation("serving unit is required"));
    }
    s.nutrition
        .check_non_negative()
        .map_err(|n| AppError::validation(format!("{n} must be a non-negative number")))
}

pub async fn create_food(
    db: &PgPool,
    user_id: Uuid,
    req: CreateFoodRequest,
) -> AppResult<FoodResponse> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("food name is required"));
    }
    if req.servings.is_empty() {
        return Err(AppError::validation("at least one serving is required"));
    }
    req.servings.iter().try_for_each(validate_serving)?;

    let mut tx = db.begin().await.context("begin tx")?;
    let food = repo::insert_food(&mut *tx, user_id, name, req.brand.as_deref()).await?;
    let mut servings = Vec::with_capacity(req.servings.len());
    for s in &req.servings {
        servings.push(repo::insert_serving(&mut *tx, food.id, s).await?);
    }
    tx.commit().await.context("commit tx")?;

    info!(%user_id, food_id = %food.id, servings = servings.len(), "food created");
    Ok(FoodResponse::new(food, servings))
}

pub async fn get_food(db: &PgPool, user_id: Uuid, food_id: Uuid) -> AppResult<FoodResponse> {
    let food = repo::find_food_for_user(db, user_id, food_id)
        .await?
        .ok_or(AppError::NotFound("food"))?;
    let servings = repo::list_servings(db, food.id).await?;
    Ok(FoodResponse::new(food, servings))
}

/// Writes externally fetched nutrition onto a serving, rescaling it when the
/// provider reported a different amount of the same unit. Input that cannot
/// be scaled is applied unscaled; only lookup and storage errors fail.
pub async fn apply_nutrition(
    db: &PgPool,
    user_id: Uuid,
    serving_id: Uuid,
    result: NutritionResult,
) -> AppResult<ServingResponse> {
    let serving = repo::find_serving_for_user(db, user_id, serving_id)
        .await?
        .ok_or(AppError::NotFound("serving"))?;

    let scaled = scale_for_serving(serving.size, &serving.unit, &result);
    if scaled.degraded {
        warn!(
            %serving_id,
            serving_unit = %serving.unit,
            result_unit = ?result.result_serving_unit,
            "nutrition applied unscaled"
        );
    }

    let updated = repo::update_nutrition(db, serving.id, &scaled).await?;
    info!(
        %user_id,
        %serving_id,
        factor = scaled.factor,
        data_source = %scaled.data_source,
        "nutrition applied"
    );
    Ok(updated.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::scaler::NutritionFields;

    fn serving(size: f64, unit: &str) -> NewServing {
        NewServing {
            size,
            unit: unit.into(),
            nutrition: NutritionFields::default(),
            data_source: None,
            data_kind: None,
        }
    }

    #[test]
    fn serving_validation() {
        assert!(validate_serving(&serving(100.0, "g")).is_ok());
        assert!(matches!(validate_serving(&serving(0.0, "g")), Err(AppError::Validation(_))));
        assert!(matches!(validate_serving(&serving(f64::INFINITY, "g")), Err(AppError::Validation(_))));
        assert!(matches!(validate_serving(&serving(1.0, "  ")), Err(AppError::Validation(_))));
    }

    #[test]
    fn serving_nutrition_must_be_non_negative() {
        let mut s = serving(100.0, "g");
        s.nutrition.calories = Some(0.0);
        s.nutrition.cholesterol = Some(12.0);
        assert!(validate_serving(&s).is_ok());

        s.nutrition.saturated_fat = Some(-1.0);
        assert!(matches!(
            validate_serving(&s),
            Err(AppError::Validation(msg)) if msg.contains("saturated_fat")
        ));

        s.nutrition.saturated_fat = Some(f64::NAN);
        assert!(matches!(validate_serving(&s), Err(AppError::Validation(_))));
    }
}

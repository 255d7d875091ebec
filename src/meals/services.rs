use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AddMealItemRequest, DeleteMealItemResponse, MealItemResponse, UpdateMealItemRequest},
    lifecycle::{MealEffect, MealSlot},
    repo,
    repo_types::{Meal, MealItem},
};
use crate::dates;
use crate::error::{AppError, AppResult};
use crate::foods::{repo as foods_repo, repo_types::Serving};
use crate::nutrition::calculator::item_nutrition;

fn validate_quantity(q: f64) -> AppResult<()> {
    if q.is_finite() && q >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation("quantity must be a non-negative number"))
    }
}

async fn owned_serving(db: &PgPool, user_id: Uuid, serving_id: Uuid) -> AppResult<Serving> {
    foods_repo::find_serving_for_user(db, user_id, serving_id)
        .await?
        .ok_or(AppError::NotFound("serving"))
}

fn item_response(item: MealItem, meal: &Meal, serving: &Serving) -> MealItemResponse {
    MealItemResponse {
        nutrition: item_nutrition(&serving.macros(), item.quantity),
        id: item.id,
        meal_id: meal.id,
        date: meal.date,
        meal_type: meal.meal_type,
        serving_id: item.serving_id,
        quantity: item.quantity,
    }
}

pub async fn add_item(
    db: &PgPool,
    user_id: Uuid,
    req: AddMealItemRequest,
) -> AppResult<MealItemResponse> {
    validate_quantity(req.quantity)?;
    let date = dates::parse_day_or_today(req.date.as_deref())?;
    let serving = owned_serving(db, user_id, req.serving_id).await?;

    let mut tx = db.begin().await.context("begin tx")?;
    let existing = repo::lock_meal_slot(&mut tx, user_id, date, req.meal_type).await?;
    let slot = match &existing {
        Some(m) => MealSlot::from_count(repo::count_items(&mut *tx, m.id).await?),
        None => MealSlot::Absent,
    };

    let (next, effect) = slot.add_item();
    let meal = match (existing, effect) {
        (Some(m), MealEffect::KeepMeal) => m,
        _ => {
            let m = repo::insert_meal(&mut *tx, user_id, date, req.meal_type).await?;
            info!(%user_id, meal_id = %m.id, %date, meal_type = ?m.meal_type, "meal created");
            m
        }
    };

    let item = repo::insert_item(&mut *tx, meal.id, serving.id, req.quantity).await?;
    tx.commit().await.context("commit tx")?;

    info!(
        %user_id,
        item_id = %item.id,
        meal_id = %meal.id,
        items = next.item_count(),
        "meal item added"
    );
    Ok(item_response(item, &meal, &serving))
}

pub async fn update_item(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    req: UpdateMealItemRequest,
) -> AppResult<MealItemResponse> {
    if let Some(q) = req.quantity {
        validate_quantity(q)?;
    }
    let item = repo::find_item_for_user(db, user_id, item_id)
        .await?
        .ok_or(AppError::NotFound("meal item"))?;
    let serving =
        owned_serving(db, user_id, req.serving_id.unwrap_or(item.serving_id)).await?;

    let mut tx = db.begin().await.context("begin tx")?;
    let meal = repo::lock_meal(&mut tx, item.meal_id)
        .await?
        .ok_or(AppError::NotFound("meal item"))?;
    let updated = repo::update_item(&mut *tx, item.id, req.quantity, req.serving_id).await?;
    tx.commit().await.context("commit tx")?;

    info!(%user_id, %item_id, "meal item updated");
    Ok(item_response(updated, &meal, &serving))
}

/// Removes an item; the meal goes with its last item.
pub async fn delete_item(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
) -> AppResult<DeleteMealItemResponse> {
    let item = repo::find_item_for_user(db, user_id, item_id)
        .await?
        .ok_or(AppError::NotFound("meal item"))?;

    let mut tx = db.begin().await.context("begin tx")?;
    let meal = repo::lock_meal(&mut tx, item.meal_id)
        .await?
        .ok_or(AppError::NotFound("meal item"))?;
    let slot = MealSlot::from_count(repo::count_items(&mut *tx, meal.id).await?);
    let (rest, effect) = slot.remove_item().map_err(|e| {
        warn!(%user_id, %item_id, error = %e, "meal vanished before item delete");
        AppError::NotFound("meal item")
    })?;

    if !repo::delete_item(&mut *tx, item.id).await? {
        return Err(AppError::NotFound("meal item"));
    }
    let meal_deleted = effect == MealEffect::DeleteMeal;
    if meal_deleted {
        repo::delete_meal(&mut *tx, meal.id).await?;
    }
    tx.commit().await.context("commit tx")?;

    info!(
        %user_id,
        %item_id,
        meal_id = %meal.id,
        items_left = rest.item_count(),
        meal_deleted,
        "meal item deleted"
    );
    Ok(DeleteMealItemResponse { meal_deleted })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_finite_and_non_negative() {
        assert!(validate_quantity(0.0).is_ok());
        assert!(validate_quantity(2.5).is_ok());
        assert!(matches!(validate_quantity(-0.5), Err(AppError::Validation(_))));
        assert!(matches!(validate_quantity(f64::NAN), Err(AppError::Validation(_))));
    }
}

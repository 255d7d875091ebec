use anyhow::Context;
use sqlx::PgExecutor;
use uuid::Uuid;

use super::{
    dto::NewServing,
    repo_types::{Food, Serving},
};
use crate::nutrition::scaler::ScaledNutrition;

const SERVING_COLUMNS: &str = "s.id, s.food_id, s.size, s.unit, s.calories, s.protein, s.carbs, \
                               s.fat, s.saturated_fat, s.trans_fat, s.fiber, s.sugar, s.sodium, \
                               s.cholesterol, s.data_source, s.data_kind, s.updated_at";

pub async fn insert_food(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    name: &str,
    brand: Option<&str>,
) -> anyhow::Result<Food> {
    let food = sqlx::query_as::<_, Food>(
        r#"
        INSERT INTO foods (user_id, name, brand)
        VALUES ($1, $2, $3)
        RETURNING id, name, brand, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(brand)
    .fetch_one(db)
    .await
    .context("insert food")?;
    Ok(food)
}

pub async fn insert_serving(
    db: impl PgExecutor<'_>,
    food_id: Uuid,
    s: &NewServing,
) -> anyhow::Result<Serving> {
    let sql = format!(
        r#"
        INSERT INTO servings AS s
            (food_id, size, unit, calories, protein, carbs, fat, saturated_fat, trans_fat,
             fiber, sugar, sodium, cholesterol, data_source, data_kind)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING {SERVING_COLUMNS}
        "#
    );
    let n = &s.nutrition;
    let row = sqlx::query_as::<_, Serving>(&sql)
        .bind(food_id)
        .bind(s.size)
        .bind(s.unit.trim())
        .bind(n.calories)
        .bind(n.protein)
        .bind(n.carbs)
        .bind(n.fat)
        .bind(n.saturated_fat)
        .bind(n.trans_fat)
        .bind(n.fiber)
        .bind(n.sugar)
        .bind(n.sodium)
        .bind(n.cholesterol)
        .bind(s.data_source.as_deref())
        .bind(s.data_kind)
        .fetch_one(db)
        .await
        .context("insert serving")?;
    Ok(row)
}

pub async fn find_food_for_user(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    food_id: Uuid,
) -> anyhow::Result<Option<Food>> {
    let food = sqlx::query_as::<_, Food>(
        r#"
        SELECT id, name, brand, created_at
          FROM foods
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(food_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find food")?;
    Ok(food)
}

pub async fn list_servings(db: impl PgExecutor<'_>, food_id: Uuid) -> anyhow::Result<Vec<Serving>> {
    let sql = format!(
        "SELECT {SERVING_COLUMNS} FROM servings s WHERE s.food_id = $1 ORDER BY s.created_at ASC"
    );
    let rows = sqlx::query_as::<_, Serving>(&sql)
        .bind(food_id)
        .fetch_all(db)
        .await
        .context("list servings")?;
    Ok(rows)
}

/// A serving, but only if its food belongs to `user_id`.
pub async fn find_serving_for_user(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    serving_id: Uuid,
) -> anyhow::Result<Option<Serving>> {
    let sql = format!(
        r#"
        SELECT {SERVING_COLUMNS}
          FROM servings s
          JOIN foods f ON f.id = s.food_id
         WHERE s.id = $1 AND f.user_id = $2
        "#
    );
    let row = sqlx::query_as::<_, Serving>(&sql)
        .bind(serving_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find serving")?;
    Ok(row)
}

/// Overwrites the nutrition panel and its provenance.
pub async fn update_nutrition(
    db: impl PgExecutor<'_>,
    serving_id: Uuid,
    scaled: &ScaledNutrition,
) -> anyhow::Result<Serving> {
    let sql = format!(
        r#"
        UPDATE servings AS s
           SET calories = $2, protein = $3, carbs = $4, fat = $5, saturated_fat = $6,
               trans_fat = $7, fiber = $8, sugar = $9, sodium = $10, cholesterol = $11,
               data_source = $12, data_kind = $13, updated_at = now()
         WHERE s.id = $1
        RETURNING {SERVING_COLUMNS}
        "#
    );
    let n = &scaled.fields;
    let row = sqlx::query_as::<_, Serving>(&sql)
        .bind(serving_id)
        .bind(n.calories)
        .bind(n.protein)
        .bind(n.carbs)
        .bind(n.fat)
        .bind(n.saturated_fat)
        .bind(n.trans_fat)
        .bind(n.fiber)
        .bind(n.sugar)
        .bind(n.sodium)
        .bind(n.cholesterol)
        .bind(&scaled.data_source)
        .bind(scaled.data_kind)
        .fetch_one(db)
        .await
        .context("update serving nutrition")?;
    Ok(row)
}

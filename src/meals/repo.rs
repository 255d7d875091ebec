use anyhow::Context;
use sqlx::{PgConnection, PgExecutor};
use time::Date;
use uuid::Uuid;

use super::repo_types::{LoggedItemRow, Meal, MealItem, MealType};

/// The meal for a slot, row-locked until the transaction ends.
pub async fn lock_meal_slot(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    meal_type: MealType,
) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, date, meal_type
          FROM meals
         WHERE user_id = $1 AND date = $2 AND meal_type = $3
         FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(meal_type)
    .fetch_optional(conn)
    .await
    .context("lock meal slot")?;
    Ok(meal)
}

pub async fn lock_meal(conn: &mut PgConnection, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, date, meal_type
          FROM meals
         WHERE id = $1
         FOR UPDATE
        "#,
    )
    .bind(meal_id)
    .fetch_optional(conn)
    .await
    .context("lock meal")?;
    Ok(meal)
}

/// Creates the meal for a slot; a concurrent creator's row is returned instead.
pub async fn insert_meal(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    date: Date,
    meal_type: MealType,
) -> anyhow::Result<Meal> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        INSERT INTO meals (user_id, date, meal_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, date, meal_type) DO UPDATE SET meal_type = EXCLUDED.meal_type
        RETURNING id, date, meal_type
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(meal_type)
    .fetch_one(db)
    .await
    .context("insert meal")?;
    Ok(meal)
}

pub async fn delete_meal(db: impl PgExecutor<'_>, meal_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM meals WHERE id = $1")
        .bind(meal_id)
        .execute(db)
        .await
        .context("delete meal")?;
    Ok(())
}

pub async fn count_items(db: impl PgExecutor<'_>, meal_id: Uuid) -> anyhow::Result<u32> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meal_items WHERE meal_id = $1")
        .bind(meal_id)
        .fetch_one(db)
        .await
        .context("count meal items")?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

pub async fn insert_item(
    db: impl PgExecutor<'_>,
    meal_id: Uuid,
    serving_id: Uuid,
    quantity: f64,
) -> anyhow::Result<MealItem> {
    let item = sqlx::query_as::<_, MealItem>(
        r#"
        INSERT INTO meal_items (meal_id, serving_id, quantity)
        VALUES ($1, $2, $3)
        RETURNING id, meal_id, serving_id, quantity
        "#,
    )
    .bind(meal_id)
    .bind(serving_id)
    .bind(quantity)
    .fetch_one(db)
    .await
    .context("insert meal item")?;
    Ok(item)
}

/// An item, but only if its meal belongs to `user_id`.
pub async fn find_item_for_user(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Option<MealItem>> {
    let item = sqlx::query_as::<_, MealItem>(
        r#"
        SELECT i.id, i.meal_id, i.serving_id, i.quantity
          FROM meal_items i
          JOIN meals m ON m.id = i.meal_id
         WHERE i.id = $1 AND m.user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find meal item")?;
    Ok(item)
}

pub async fn update_item(
    db: impl PgExecutor<'_>,
    item_id: Uuid,
    quantity: Option<f64>,
    serving_id: Option<Uuid>,
) -> anyhow::Result<MealItem> {
    let item = sqlx::query_as::<_, MealItem>(
        r#"
        UPDATE meal_items
           SET quantity = COALESCE($2, quantity),
               serving_id = COALESCE($3, serving_id)
         WHERE id = $1
        RETURNING id, meal_id, serving_id, quantity
        "#,
    )
    .bind(item_id)
    .bind(quantity)
    .bind(serving_id)
    .fetch_one(db)
    .await
    .context("update meal item")?;
    Ok(item)
}

/// Returns whether a row was removed.
pub async fn delete_item(db: impl PgExecutor<'_>, item_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM meal_items WHERE id = $1")
        .bind(item_id)
        .execute(db)
        .await
        .context("delete meal item")?;
    Ok(res.rows_affected() > 0)
}

/// Every item the user logged on `date`, in meal then insertion order.
pub async fn list_day_items(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<LoggedItemRow>> {
    let rows = sqlx::query_as::<_, LoggedItemRow>(
        r#"
        SELECT i.id AS item_id, m.id AS meal_id, m.meal_type, i.serving_id, i.quantity,
               f.name AS food_name, s.size AS serving_size, s.unit AS serving_unit,
               s.calories, s.protein, s.carbs, s.fat, s.fiber, s.sugar, s.sodium
          FROM meals m
          JOIN meal_items i ON i.meal_id = m.id
          JOIN servings s ON s.id = i.serving_id
          JOIN foods f ON f.id = s.food_id
         WHERE m.user_id = $1 AND m.date = $2
         ORDER BY m.meal_type, i.created_at, i.id
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("list day items")?;
    Ok(rows)
}

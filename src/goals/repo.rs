use anyhow::Context;
use sqlx::{PgConnection, PgExecutor};
use time::Date;
use uuid::Uuid;

use super::repo_types::NutritionGoal;
use crate::nutrition::MacroSet;

const GOAL_COLUMNS: &str = "id, user_id, calories, protein, carbs, fat, fiber, sugar, sodium, \
                            start_date, end_date, created_at, updated_at";

/// Serializes goal mutations for one user until the surrounding transaction ends.
pub async fn lock_user(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(user_id.to_string())
        .execute(conn)
        .await
        .context("lock user goals")?;
    Ok(())
}

/// All goals of a user, newest first.
pub async fn list_by_user(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
) -> anyhow::Result<Vec<NutritionGoal>> {
    let sql = format!(
        "SELECT {GOAL_COLUMNS} FROM nutrition_goals WHERE user_id = $1 ORDER BY start_date DESC"
    );
    let rows = sqlx::query_as::<_, NutritionGoal>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list goals by user")?;
    Ok(rows)
}

pub async fn insert(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    targets: &MacroSet,
    start_date: Date,
) -> anyhow::Result<NutritionGoal> {
    let sql = format!(
        r#"
        INSERT INTO nutrition_goals
            (user_id, calories, protein, carbs, fat, fiber, sugar, sodium, start_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {GOAL_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, NutritionGoal>(&sql)
        .bind(user_id)
        .bind(targets.calories)
        .bind(targets.protein)
        .bind(targets.carbs)
        .bind(targets.fat)
        .bind(targets.fiber)
        .bind(targets.sugar)
        .bind(targets.sodium)
        .bind(start_date)
        .fetch_one(db)
        .await
        .context("insert goal")?;
    Ok(row)
}

pub async fn close(db: impl PgExecutor<'_>, id: Uuid, end_date: Date) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE nutrition_goals
           SET end_date = $2, updated_at = now()
         WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(end_date)
    .execute(db)
    .await
    .context("close goal")?;
    Ok(())
}

pub async fn update_targets(
    db: impl PgExecutor<'_>,
    id: Uuid,
    targets: &MacroSet,
) -> anyhow::Result<Option<NutritionGoal>> {
    let sql = format!(
        r#"
        UPDATE nutrition_goals
           SET calories = $2, protein = $3, carbs = $4, fat = $5,
               fiber = $6, sugar = $7, sodium = $8, updated_at = now()
         WHERE id = $1
        RETURNING {GOAL_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, NutritionGoal>(&sql)
        .bind(id)
        .bind(targets.calories)
        .bind(targets.protein)
        .bind(targets.carbs)
        .bind(targets.fat)
        .bind(targets.fiber)
        .bind(targets.sugar)
        .bind(targets.sodium)
        .fetch_optional(db)
        .await
        .context("update goal targets")?;
    Ok(row)
}

pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM nutrition_goals WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete goal")?;
    Ok(())
}

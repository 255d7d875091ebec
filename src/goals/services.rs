use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::GoalResponse, repo, repo_types::NutritionGoal, timeline};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::nutrition::MacroSet;

/// The goal active on `date` together with its history, or `None`.
pub async fn active_goal(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> AppResult<Option<(NutritionGoal, bool)>> {
    let goals = repo::list_by_user(db, user_id).await?;
    Ok(timeline::active_on(&goals, date).map(|g| (g.clone(), timeline::is_latest(g, &goals))))
}

pub async fn get_active_goal(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> AppResult<Option<GoalResponse>> {
    let active = active_goal(db, user_id, date).await?;
    Ok(active.map(|(g, latest)| GoalResponse::new(g, latest)))
}

pub async fn list_goals(db: &PgPool, user_id: Uuid) -> AppResult<Vec<GoalResponse>> {
    let goals = repo::list_by_user(db, user_id).await?;
    let latest_id = timeline::latest(&goals).map(|g| g.id);
    Ok(goals
        .into_iter()
        .map(|g| {
            let is_latest = Some(g.id) == latest_id;
            GoalResponse::new(g, is_latest)
        })
        .collect())
}

pub async fn create_goal(
    db: &PgPool,
    user_id: Uuid,
    targets: MacroSet,
    start_date: Date,
) -> AppResult<GoalResponse> {
    timeline::validate_targets(&targets, true)?;

    let mut tx = db.begin().await.context("begin tx")?;
    repo::lock_user(&mut tx, user_id).await?;

    let goals = repo::list_by_user(&mut *tx, user_id).await?;
    let plan = match timeline::plan_create(&goals, start_date) {
        Ok(p) => p,
        Err(e) => {
            warn!(%user_id, error = %e, "goal create rejected");
            return Err(e);
        }
    };

    if let Some(prev) = plan.close {
        repo::close(&mut *tx, prev, plan.start_date).await?;
        info!(%user_id, goal_id = %prev, end_date = %plan.start_date, "goal closed");
    }

    let goal = match repo::insert(&mut *tx, user_id, &targets, plan.start_date).await {
        Ok(g) => g,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("a goal with this start date already exists".into()))
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await.context("commit tx")?;

    info!(%user_id, goal_id = %goal.id, start_date = %goal.start_date, "goal created");
    Ok(GoalResponse::new(goal, true))
}

pub async fn update_goal(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: MacroSet,
) -> AppResult<GoalResponse> {
    timeline::validate_targets(&patch, false)?;

    let mut tx = db.begin().await.context("begin tx")?;
    repo::lock_user(&mut tx, user_id).await?;

    let goals = repo::list_by_user(&mut *tx, user_id).await?;
    let goal = timeline::find_owned(&goals, user_id, id)?;
    let is_latest = timeline::is_latest(goal, &goals);

    let mut targets = goal.targets;
    targets.patch(&patch);
    let updated = repo::update_targets(&mut *tx, id, &targets)
        .await?
        .ok_or(AppError::NotFound("goal"))?;
    tx.commit().await.context("commit tx")?;

    info!(%user_id, goal_id = %id, "goal targets updated");
    Ok(GoalResponse::new(updated, is_latest))
}

pub async fn delete_goal(db: &PgPool, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    repo::lock_user(&mut tx, user_id).await?;

    let goals = repo::list_by_user(&mut *tx, user_id).await?;
    let goal = timeline::find_owned(&goals, user_id, id)?;
    if let Err(e) = timeline::ensure_deletable(goal, &goals) {
        warn!(%user_id, goal_id = %id, "refusing to delete a past goal");
        return Err(e);
    }

    repo::delete(&mut *tx, id).await?;
    tx.commit().await.context("commit tx")?;

    // The previous goal keeps its end date; the user is goal-less from here on.
    info!(%user_id, goal_id = %id, "goal deleted");
    Ok(())
}

//! Rules over one user's goal history.
//!
//! Goals form a chain of half-open intervals `[start_date, end_date)` with at
//! most one open-ended goal, which is always the one with the latest start.
//! Everything here works on a snapshot of the user's goals; callers hold the
//! per-user lock while acting on a plan.

use time::Date;
use uuid::Uuid;

use super::repo_types::NutritionGoal;
use crate::error::AppError;
use crate::nutrition::MacroSet;

/// The goal with the greatest start date.
pub fn latest(goals: &[NutritionGoal]) -> Option<&NutritionGoal> {
    goals.iter().max_by_key(|g| g.start_date)
}

pub fn is_latest(goal: &NutritionGoal, goals: &[NutritionGoal]) -> bool {
    latest(goals).is_some_and(|l| l.id == goal.id)
}

/// Looks a goal up in a user's history. A goal owned by someone else is
/// reported exactly like one that does not exist.
pub fn find_owned(
    goals: &[NutritionGoal],
    user_id: Uuid,
    id: Uuid,
) -> Result<&NutritionGoal, AppError> {
    goals
        .iter()
        .find(|g| g.id == id && g.user_id == user_id)
        .ok_or(AppError::NotFound("goal"))
}

/// The goal whose interval contains `date`, if any.
pub fn active_on(goals: &[NutritionGoal], date: Date) -> Option<&NutritionGoal> {
    goals.iter().find(|g| g.contains(date))
}

pub fn validate_targets(targets: &MacroSet, require_any: bool) -> Result<(), AppError> {
    if require_any && targets.is_empty() {
        return Err(AppError::validation("at least one nutrition target is required"));
    }
    targets
        .check_non_negative()
        .map_err(|n| AppError::validation(format!("{n} target must be a non-negative number")))
}

/// Writes needed to add a goal starting on `start_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub start_date: Date,
    /// Open goal to close with `end_date = start_date`.
    pub close: Option<Uuid>,
}

/// Targets are validated by the caller before the user lock is taken.
pub fn plan_create(goals: &[NutritionGoal], start_date: Date) -> Result<CreatePlan, AppError> {
    if goals.iter().any(|g| g.start_date == start_date) {
        return Err(AppError::Conflict(format!(
            "a goal starting on {} already exists",
            crate::dates::format_day(start_date)
        )));
    }

    // The new goal must start after every existing interval, or it would
    // overlap history or leave two open goals.
    let mut close = None;
    for g in goals {
        match g.end_date {
            None if g.start_date < start_date => close = Some(g.id),
            None => {
                return Err(AppError::Conflict(format!(
                    "start date must be after the current goal's start ({})",
                    crate::dates::format_day(g.start_date)
                )))
            }
            Some(end) if end > start_date => {
                return Err(AppError::Conflict(format!(
                    "start date overlaps a past goal ending {}",
                    crate::dates::format_day(end)
                )))
            }
            Some(_) => {}
        }
    }

    Ok(CreatePlan { start_date, close })
}

/// Only the open, latest goal may be deleted; removing an older interval
/// would punch a hole in the history.
pub fn ensure_deletable(goal: &NutritionGoal, goals: &[NutritionGoal]) -> Result<(), AppError> {
    if goal.is_open() && is_latest(goal, goals) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the current goal can be deleted".into(),
        ))
    }
}

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::NutritionGoal;
use crate::dates::iso_day;
use crate::nutrition::MacroSet;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    #[serde(flatten)]
    pub targets: MacroSet,
    /// `YYYY-MM-DD` or RFC 3339; defaults to today (UTC).
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Partial target update; dates cannot be changed.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    #[serde(flatten)]
    pub targets: MacroSet,
}

#[derive(Debug, Deserialize)]
pub struct ActiveGoalQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: Uuid,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
    #[serde(serialize_with = "iso_day::serialize")]
    pub start_date: Date,
    #[serde(serialize_with = "iso_day::serialize_opt")]
    pub end_date: Option<Date>,
    pub is_latest: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GoalResponse {
    pub fn new(goal: NutritionGoal, is_latest: bool) -> Self {
        let t = goal.targets;
        Self {
            id: goal.id,
            calories: t.calories,
            protein: t.protein,
            carbs: t.carbs,
            fat: t.fat,
            fiber: t.fiber,
            sugar: t.sugar,
            sodium: t.sodium,
            start_date: goal.start_date,
            end_date: goal.end_date,
            is_latest,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_request_reads_targets_and_optional_start() {
        let body = serde_json::json!({ "calories": 2200.0, "protein": 140.0 });
        let req: CreateGoalRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.targets.calories, Some(2200.0));
        assert_eq!(req.targets.fat, None);
        assert!(req.start_date.is_none());

        let body = serde_json::json!({ "sodium": 2300.0, "start_date": "2024-06-01" });
        let req: CreateGoalRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.start_date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn response_writes_plain_dates_and_null_targets() {
        let goal = NutritionGoal {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            targets: MacroSet {
                calories: Some(2000.0),
                ..Default::default()
            },
            start_date: date!(2024 - 06 - 01),
            end_date: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(GoalResponse::new(goal, true)).unwrap();
        assert_eq!(json["start_date"], "2024-06-01");
        assert!(json["end_date"].is_null());
        assert!(json["protein"].is_null());
        assert_eq!(json["calories"], 2000.0);
        assert_eq!(json["is_latest"], true);
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    }
}

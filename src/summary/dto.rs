use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::dates::iso_day;
use crate::meals::repo_types::MealType;
use crate::nutrition::{calculator::NutritionTotals, progress::GoalProgress, MacroSet};

#[derive(Debug, Serialize)]
pub struct SummaryItem {
    pub id: Uuid,
    pub serving_id: Uuid,
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub quantity: f64,
    pub nutrition: MacroSet,
}

#[derive(Debug, Serialize)]
pub struct SummaryMeal {
    pub id: Uuid,
    pub meal_type: MealType,
    pub items: Vec<SummaryItem>,
    pub totals: NutritionTotals,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    #[serde(serialize_with = "iso_day::serialize")]
    pub date: Date,
    pub meals: Vec<SummaryMeal>,
    pub totals: NutritionTotals,
    /// Omitted entirely when no goal is active on `date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_progress: Option<GoalProgress>,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use crate::nutrition::MacroSet;

/// Declaration order is display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub date: Date,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, FromRow)]
pub struct MealItem {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub serving_id: Uuid,
    pub quantity: f64,
}

/// One logged item joined with its meal and serving, for daily reads.
#[derive(Debug, Clone, FromRow)]
pub struct LoggedItemRow {
    pub item_id: Uuid,
    pub meal_id: Uuid,
    pub meal_type: MealType,
    pub serving_id: Uuid,
    pub quantity: f64,
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: String,
    #[sqlx(flatten)]
    pub per_serving: MacroSet,
}

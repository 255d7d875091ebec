use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::MealType;
use crate::dates::iso_day;
use crate::nutrition::MacroSet;

#[derive(Debug, Deserialize)]
pub struct AddMealItemRequest {
    /// `YYYY-MM-DD` or RFC 3339; defaults to today (UTC).
    #[serde(default)]
    pub date: Option<String>,
    pub meal_type: MealType,
    pub serving_id: Uuid,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealItemRequest {
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub serving_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MealItemResponse {
    pub id: Uuid,
    pub meal_id: Uuid,
    #[serde(serialize_with = "iso_day::serialize")]
    pub date: Date,
    pub meal_type: MealType,
    pub serving_id: Uuid,
    pub quantity: f64,
    pub nutrition: MacroSet,
}

#[derive(Debug, Serialize)]
pub struct DeleteMealItemResponse {
    pub meal_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_parses_meal_type() {
        let body = serde_json::json!({
            "meal_type": "breakfast",
            "serving_id": Uuid::nil(),
            "quantity": 1.5
        });
        let req: AddMealItemRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.meal_type, MealType::Breakfast);
        assert_eq!(req.quantity, 1.5);
        assert!(req.date.is_none());
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        let body = serde_json::json!({
            "meal_type": "brunch",
            "serving_id": Uuid::nil(),
            "quantity": 1.0
        });
        assert!(serde_json::from_value::<AddMealItemRequest>(body).is_err());
    }
}

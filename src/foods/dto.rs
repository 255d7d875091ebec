use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Food, Serving};
use crate::nutrition::scaler::{DataKind, NutritionFields};

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub servings: Vec<NewServing>,
}

#[derive(Debug, Deserialize)]
pub struct NewServing {
    pub size: f64,
    pub unit: String,
    #[serde(flatten)]
    pub nutrition: NutritionFields,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub data_kind: Option<DataKind>,
}

#[derive(Debug, Serialize)]
pub struct ServingResponse {
    pub id: Uuid,
    pub food_id: Uuid,
    pub size: f64,
    pub unit: String,
    #[serde(flatten)]
    pub nutrition: NutritionFields,
    pub data_source: Option<String>,
    pub data_kind: Option<DataKind>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Serving> for ServingResponse {
    fn from(s: Serving) -> Self {
        Self {
            id: s.id,
            food_id: s.food_id,
            size: s.size,
            unit: s.unit,
            nutrition: s.nutrition,
            data_source: s.data_source,
            data_kind: s.data_kind,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub servings: Vec<ServingResponse>,
}

impl FoodResponse {
    pub fn new(food: Food, servings: Vec<Serving>) -> Self {
        Self {
            id: food.id,
            name: food.name,
            brand: food.brand,
            created_at: food.created_at,
            servings: servings.into_iter().map(Into::into).collect(),
        }
    }
}

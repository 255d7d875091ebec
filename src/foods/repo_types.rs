use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{
    scaler::{DataKind, NutritionFields},
    MacroSet,
};

#[derive(Debug, Clone, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Nutrition for one `size` + `unit` portion of a food.
#[derive(Debug, Clone, FromRow)]
pub struct Serving {
    pub id: Uuid,
    pub food_id: Uuid,
    pub size: f64,
    pub unit: String,
    #[sqlx(flatten)]
    pub nutrition: NutritionFields,
    pub data_source: Option<String>,
    pub data_kind: Option<DataKind>,
    pub updated_at: OffsetDateTime,
}

impl Serving {
    /// The subset of the panel that goals track.
    pub fn macros(&self) -> MacroSet {
        let n = &self.nutrition;
        MacroSet {
            calories: n.calories,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
            fiber: n.fiber,
            sugar: n.sugar,
            sodium: n.sodium,
        }
    }
}

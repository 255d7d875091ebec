use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::MacroSet;

/// A versioned set of daily targets, active on `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct NutritionGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(flatten)]
    pub targets: MacroSet,
    pub start_date: Date,
    /// `None` while the goal is open-ended.
    pub end_date: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NutritionGoal {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end > date)
    }
}

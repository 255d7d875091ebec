use sqlx::PgPool;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::dto::{DailySummary, SummaryItem, SummaryMeal};
use crate::error::AppResult;
use crate::goals::services::active_goal;
use crate::meals::{repo as meals_repo, repo_types::LoggedItemRow};
use crate::nutrition::{
    calculator::{daily_totals, item_nutrition, meal_totals},
    progress::progress,
    MacroSet,
};

pub async fn daily_summary(db: &PgPool, user_id: Uuid, date: Date) -> AppResult<DailySummary> {
    let rows = meals_repo::list_day_items(db, user_id, date).await?;
    let goal = active_goal(db, user_id, date).await?;
    debug!(%user_id, %date, items = rows.len(), has_goal = goal.is_some(), "daily summary");
    Ok(build_summary(date, rows, goal.as_ref().map(|(g, _)| &g.targets)))
}

/// Groups rows (already in meal order) into meals and rolls up totals.
pub fn build_summary(
    date: Date,
    rows: Vec<LoggedItemRow>,
    targets: Option<&MacroSet>,
) -> DailySummary {
    let mut meals: Vec<SummaryMeal> = Vec::new();
    for row in rows {
        let item = SummaryItem {
            id: row.item_id,
            serving_id: row.serving_id,
            nutrition: item_nutrition(&row.per_serving, row.quantity),
            food_name: row.food_name,
            serving_size: row.serving_size,
            serving_unit: row.serving_unit,
            quantity: row.quantity,
        };
        match meals.last_mut() {
            Some(m) if m.id == row.meal_id => m.items.push(item),
            _ => meals.push(SummaryMeal {
                id: row.meal_id,
                meal_type: row.meal_type,
                items: vec![item],
                totals: Default::default(),
            }),
        }
    }

    for m in &mut meals {
        m.totals = meal_totals(m.items.iter().map(|i| &i.nutrition));
    }
    let totals = daily_totals(meals.iter().map(|m| &m.totals));

    DailySummary {
        date,
        goal_progress: progress(&totals, targets),
        meals,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::MealType;
    use time::macros::date;

    fn row(meal_id: Uuid, meal_type: MealType, calories: Option<f64>, quantity: f64) -> LoggedItemRow {
        LoggedItemRow {
            item_id: Uuid::new_v4(),
            meal_id,
            meal_type,
            serving_id: Uuid::new_v4(),
            quantity,
            food_name: "oats".into(),
            serving_size: 40.0,
            serving_unit: "g".into(),
            per_serving: MacroSet {
                calories,
                protein: Some(5.0),
                ..Default::default()
            },
        }
    }

    #[test]
    fn groups_items_into_meals_and_sums() {
        let breakfast = Uuid::new_v4();
        let dinner = Uuid::new_v4();
        let rows = vec![
            row(breakfast, MealType::Breakfast, Some(150.0), 1.0),
            row(breakfast, MealType::Breakfast, None, 1.0),
            row(dinner, MealType::Dinner, Some(130.0), 2.0),
        ];
        let s = build_summary(date!(2024 - 06 - 01), rows, None);

        assert_eq!(s.meals.len(), 2);
        assert_eq!(s.meals[0].meal_type, MealType::Breakfast);
        assert_eq!(s.meals[0].items.len(), 2);
        assert_eq!(s.meals[0].items[1].nutrition.calories, None);
        assert_eq!(s.meals[0].totals.calories, 150.0);
        assert_eq!(s.meals[1].items[0].nutrition.calories, Some(260.0));
        assert_eq!(s.meals[1].totals.calories, 260.0);
        assert_eq!(s.totals.calories, 410.0);
        assert_eq!(s.totals.protein, 20.0);
        assert!(s.goal_progress.is_none());
    }

    #[test]
    fn progress_present_when_goal_active() {
        let meal = Uuid::new_v4();
        let targets = MacroSet {
            calories: Some(200.0),
            ..Default::default()
        };
        let s = build_summary(
            date!(2024 - 06 - 01),
            vec![row(meal, MealType::Lunch, Some(50.0), 1.0)],
            Some(&targets),
        );
        let p = s.goal_progress.expect("goal is active");
        assert_eq!(p.calories.actual, 50.0);
        assert_eq!(p.calories.percentage, Some(25.0));
        assert_eq!(p.protein.target, None);
        assert_eq!(p.protein.percentage, None);
    }

    #[test]
    fn empty_day_with_goal_reports_zero_progress() {
        let targets = MacroSet {
            protein: Some(120.0),
            ..Default::default()
        };
        let s = build_summary(date!(2024 - 06 - 01), Vec::new(), Some(&targets));
        assert!(s.meals.is_empty());
        assert_eq!(s.goal_progress.unwrap().protein.percentage, Some(0.0));
    }

    #[test]
    fn goal_progress_is_omitted_from_json_without_goal() {
        let s = build_summary(date!(2024 - 06 - 01), Vec::new(), None);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["date"], "2024-06-01");
        assert!(json.get("goal_progress").is_none());
        assert_eq!(json["totals"]["calories"], 0.0);
    }
}

use serde::Serialize;

use super::{round_to, MacroSet, Nutrient};

/// Nutrition of one logged item: each known per-serving value times the
/// quantity, rounded to one decimal. Unknown values stay unknown.
pub fn item_nutrition(per_serving: &MacroSet, quantity: f64) -> MacroSet {
    per_serving.map(|v| round_to(v * quantity, 1))
}

/// Aggregated nutrition; unknown item values count as zero here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
}

impl NutritionTotals {
    pub fn get(&self, n: Nutrient) -> f64 {
        match n {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
            Nutrient::Sodium => self.sodium,
        }
    }

    fn add_item(mut self, item: &MacroSet) -> Self {
        let v = |n| item.get(n).unwrap_or(0.0);
        self.calories += v(Nutrient::Calories);
        self.protein += v(Nutrient::Protein);
        self.carbs += v(Nutrient::Carbs);
        self.fat += v(Nutrient::Fat);
        self.fiber += v(Nutrient::Fiber);
        self.sugar += v(Nutrient::Sugar);
        self.sodium += v(Nutrient::Sodium);
        self
    }

    fn rounded(self) -> Self {
        Self {
            calories: round_to(self.calories, 1),
            protein: round_to(self.protein, 1),
            carbs: round_to(self.carbs, 1),
            fat: round_to(self.fat, 1),
            fiber: round_to(self.fiber, 1),
            sugar: round_to(self.sugar, 1),
            sodium: round_to(self.sodium, 1),
        }
    }
}

impl std::ops::Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
            sugar: self.sugar + rhs.sugar,
            sodium: self.sodium + rhs.sodium,
        }
    }
}

/// Sum of already-computed item nutrition for one meal.
pub fn meal_totals<'a>(items: impl IntoIterator<Item = &'a MacroSet>) -> NutritionTotals {
    items
        .into_iter()
        .fold(NutritionTotals::default(), NutritionTotals::add_item)
        .rounded()
}

/// Sum of meal totals for one user and date.
pub fn daily_totals<'a>(meals: impl IntoIterator<Item = &'a NutritionTotals>) -> NutritionTotals {
    meals
        .into_iter()
        .fold(NutritionTotals::default(), |acc, m| acc + *m)
        .rounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kcal(v: Option<f64>) -> MacroSet {
        MacroSet {
            calories: v,
            ..Default::default()
        }
    }

    #[test]
    fn item_nutrition_multiplies_by_quantity() {
        let out = item_nutrition(&kcal(Some(130.0)), 2.0);
        assert_eq!(out.calories, Some(260.0));
    }

    #[test]
    fn item_nutrition_keeps_unknown_as_unknown() {
        let out = item_nutrition(&kcal(None), 2.0);
        assert_eq!(out.calories, None);
        assert!(out.is_empty());
    }

    #[test]
    fn item_nutrition_rounds_to_one_decimal() {
        let serving = MacroSet {
            protein: Some(3.33),
            fat: Some(0.0),
            ..Default::default()
        };
        let out = item_nutrition(&serving, 1.5);
        assert_eq!(out.protein, Some(5.0));
        assert_eq!(out.fat, Some(0.0));
    }

    #[test]
    fn zero_quantity_yields_zero_for_known_values() {
        let out = item_nutrition(&kcal(Some(250.0)), 0.0);
        assert_eq!(out.calories, Some(0.0));
    }

    #[test]
    fn meal_totals_treat_unknown_as_zero() {
        let items = [kcal(Some(150.0)), kcal(None)];
        let totals = meal_totals(&items);
        assert_eq!(totals.calories, 150.0);
        assert_eq!(totals.protein, 0.0);
    }

    #[test]
    fn meal_totals_of_no_items_is_zero() {
        let totals = meal_totals(&[] as &[MacroSet]);
        assert_eq!(totals, NutritionTotals::default());
    }

    #[test]
    fn daily_totals_sum_meals_without_float_noise() {
        let breakfast = meal_totals(&[MacroSet {
            calories: Some(0.1),
            fat: Some(10.0),
            ..Default::default()
        }]);
        let lunch = meal_totals(&[MacroSet {
            calories: Some(0.2),
            sodium: Some(400.0),
            ..Default::default()
        }]);
        let day = daily_totals([&breakfast, &lunch]);
        assert_eq!(day.calories, 0.3);
        assert_eq!(day.fat, 10.0);
        assert_eq!(day.sodium, 400.0);
    }
}

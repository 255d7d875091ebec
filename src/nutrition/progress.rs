use serde::Serialize;

use super::{calculator::NutritionTotals, round_to, MacroSet, Nutrient};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroProgress {
    pub target: Option<f64>,
    pub actual: f64,
    /// Percent of target with one decimal; `None` when there is no positive target.
    pub percentage: Option<f64>,
}

impl MacroProgress {
    pub fn evaluate(actual: f64, target: Option<f64>) -> Self {
        let actual = round_to(actual, 1);
        let percentage = match target {
            Some(t) if t > 0.0 => Some((actual / t * 1000.0).round() / 10.0),
            _ => None,
        };
        Self {
            target,
            actual,
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
    pub fiber: MacroProgress,
    pub sugar: MacroProgress,
    pub sodium: MacroProgress,
}

/// Compares daily totals to the active goal's targets. No active goal means
/// no progress at all, which callers must keep distinct from 0%.
pub fn progress(totals: &NutritionTotals, targets: Option<&MacroSet>) -> Option<GoalProgress> {
    let targets = targets?;
    let p = |n: Nutrient| MacroProgress::evaluate(totals.get(n), targets.get(n));
    Some(GoalProgress {
        calories: p(Nutrient::Calories),
        protein: p(Nutrient::Protein),
        carbs: p(Nutrient::Carbs),
        fat: p(Nutrient::Fat),
        fiber: p(Nutrient::Fiber),
        sugar: p(Nutrient::Sugar),
        sodium: p(Nutrient::Sodium),
    })
}

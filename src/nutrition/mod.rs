//! Pure nutrition arithmetic: per-item and aggregate totals, goal progress,
//! and rescaling of imported nutrition facts onto a serving.

pub mod calculator;
pub mod progress;
pub mod scaler;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Nutrients that goals can target and that meal totals report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
    Sodium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Sodium,
    ];
}

/// One value per [`Nutrient`]; `None` means unknown (on a serving) or
/// untargeted (on a goal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MacroSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}

impl MacroSet {
    pub fn get(&self, n: Nutrient) -> Option<f64> {
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

    fn slot(&mut self, n: Nutrient) -> &mut Option<f64> {
        match n {
            Nutrient::Calories => &mut self.calories,
            Nutrient::Protein => &mut self.protein,
            Nutrient::Carbs => &mut self.carbs,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Fiber => &mut self.fiber,
            Nutrient::Sugar => &mut self.sugar,
            Nutrient::Sodium => &mut self.sodium,
        }
    }

    pub fn set(&mut self, n: Nutrient, value: Option<f64>) {
        *self.slot(n) = value;
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> MacroSet {
        let mut out = MacroSet::default();
        for n in Nutrient::ALL {
            out.set(n, self.get(n).map(&f));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        Nutrient::ALL.iter().all(|n| self.get(*n).is_none())
    }

    /// Overwrites the fields that are present in `patch`, leaving the rest.
    pub fn patch(&mut self, patch: &MacroSet) {
        for n in Nutrient::ALL {
            if let Some(v) = patch.get(n) {
                self.set(n, Some(v));
            }
        }
    }

    /// Rejects negative, NaN or infinite values.
    pub fn check_non_negative(&self) -> Result<(), Nutrient> {
        for n in Nutrient::ALL {
            if let Some(v) = self.get(n) {
                if !v.is_finite() || v < 0.0 {
                    return Err(n);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::Sodium => "sodium",
        };
        f.write_str(name)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_one_and_two_decimals() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(12.36, 1), 12.4);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(260.0, 1), 260.0);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut base = MacroSet {
            calories: Some(2000.0),
            protein: Some(120.0),
            ..Default::default()
        };
        base.patch(&MacroSet {
            protein: Some(150.0),
            fiber: Some(30.0),
            ..Default::default()
        });
        assert_eq!(base.calories, Some(2000.0));
        assert_eq!(base.protein, Some(150.0));
        assert_eq!(base.fiber, Some(30.0));
        assert_eq!(base.sugar, None);
    }

    #[test]
    fn empty_and_negative_detection() {
        assert!(MacroSet::default().is_empty());
        let bad = MacroSet {
            sodium: Some(-1.0),
            ..Default::default()
        };
        assert!(!bad.is_empty());
        assert_eq!(bad.check_non_negative(), Err(Nutrient::Sodium));
        let nan = MacroSet {
            fat: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(nan.check_non_negative(), Err(Nutrient::Fat));
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let m = MacroSet {
            calories: Some(130.0),
            ..Default::default()
        };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json, serde_json::json!({ "calories": 130.0 }));
    }
}

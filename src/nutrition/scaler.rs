//! Adapting externally reported nutrition facts onto a stored serving.
//!
//! Providers often report values for a reference amount ("per 100g") that
//! differs from the serving they are applied to. When both amounts share a
//! unit the values are scaled proportionally; anything else is applied as-is.
//! Applying never fails.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "nutrition_data_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Measured,
    Estimated,
}

/// Full nutrition panel of a serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NutritionFields {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub trans_fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
    pub cholesterol: Option<f64>,
}

impl NutritionFields {
    /// Name of the first negative, NaN or infinite field, if any.
    pub fn check_non_negative(&self) -> Result<(), &'static str> {
        let named = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("saturated_fat", self.saturated_fat),
            ("trans_fat", self.trans_fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
            ("sodium", self.sodium),
            ("cholesterol", self.cholesterol),
        ];
        match named
            .into_iter()
            .find(|(_, v)| v.is_some_and(|v| !v.is_finite() || v < 0.0))
        {
            Some((name, _)) => Err(name),
            None => Ok(()),
        }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: self.calories.map(&f),
            protein: self.protein.map(&f),
            carbs: self.carbs.map(&f),
            fat: self.fat.map(&f),
            saturated_fat: self.saturated_fat.map(&f),
            trans_fat: self.trans_fat.map(&f),
            fiber: self.fiber.map(&f),
            sugar: self.sugar.map(&f),
            sodium: self.sodium.map(&f),
            cholesterol: self.cholesterol.map(&f),
        }
    }
}

/// Nutrition facts as delivered by an external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionResult {
    /// Provider label recorded as the serving's data source, e.g. "usda".
    pub source: String,
    pub data_kind: DataKind,
    #[serde(default)]
    pub result_serving_size: Option<f64>,
    #[serde(default)]
    pub result_serving_unit: Option<String>,
    #[serde(flatten)]
    pub fields: NutritionFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scaling {
    pub factor: f64,
    /// Provenance note, only set when values were actually rescaled.
    pub note: Option<String>,
    /// The provider's reference amount could not be used.
    pub degraded: bool,
}

impl Scaling {
    fn unscaled() -> Self {
        Self {
            factor: 1.0,
            note: None,
            degraded: false,
        }
    }

    fn unusable() -> Self {
        Self {
            degraded: true,
            ..Self::unscaled()
        }
    }
}

pub fn resolve_scaling(
    stored_size: f64,
    stored_unit: &str,
    result_size: Option<f64>,
    result_unit: Option<&str>,
) -> Scaling {
    let (Some(result_size), Some(result_unit)) = (result_size, result_unit) else {
        return Scaling::unscaled();
    };

    // Cross-unit conversion would need density data.
    if !stored_unit.trim().eq_ignore_ascii_case(result_unit.trim()) {
        return Scaling::unusable();
    }

    if result_size == stored_size {
        return Scaling::unscaled();
    }

    let usable = |s: f64| s.is_finite() && s > 0.0;
    if !usable(result_size) || !usable(stored_size) {
        return Scaling::unusable();
    }

    Scaling {
        factor: stored_size / result_size,
        note: Some(format!(
            "scaled from {}{} to {}{}",
            result_size,
            result_unit.trim(),
            stored_size,
            stored_unit.trim()
        )),
        degraded: false,
    }
}

/// Multiplies every present field by `factor`, rounding to two decimals.
pub fn apply_scaling(fields: &NutritionFields, factor: f64) -> NutritionFields {
    fields.map(|v| round_to(v * factor, 2))
}

/// What gets written onto a serving when nutrition is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledNutrition {
    pub fields: NutritionFields,
    pub data_source: String,
    pub data_kind: DataKind,
    pub factor: f64,
    pub degraded: bool,
}

pub fn scale_for_serving(size: f64, unit: &str, result: &NutritionResult) -> ScaledNutrition {
    let scaling = resolve_scaling(
        size,
        unit,
        result.result_serving_size,
        result.result_serving_unit.as_deref(),
    );
    let data_source = match &scaling.note {
        Some(note) => format!("{} ({})", result.source, note),
        None => result.source.clone(),
    };
    ScaledNutrition {
        fields: apply_scaling(&result.fields, scaling.factor),
        data_source,
        data_kind: result.data_kind,
        factor: scaling.factor,
        degraded: scaling.degraded,
    }
}

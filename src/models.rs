//! Data models and structures
//!
//! Defines the nutrition record exchanged between the facade and the
//! interactive client, plus the small JSON envelopes of the HTTP surface.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Body of a successful `POST /recognize-food/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Predictions {
    #[serde(default)]
    pub predictions: Vec<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

/// Error body returned by the facade for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Nutrition facts for one standard serving of a food.
///
/// Every quantity is a finite number >= 0. Fields the oracle could not supply
/// are 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionRecord {
    #[serde(default)]
    pub food_name: String,
    #[serde(default, with = "quantity")]
    pub serving_size_grams: f64,
    #[serde(default, with = "quantity")]
    pub calories: f64,
    #[serde(default, with = "quantity")]
    pub protein_grams: f64,
    #[serde(default, with = "quantity")]
    pub carbohydrates_grams: f64,
    #[serde(default, with = "quantity")]
    pub fat_grams: f64,
    #[serde(default, with = "quantity")]
    pub fiber_grams: f64,
    #[serde(default, with = "quantity")]
    pub sugar_grams: f64,
}

impl NutritionRecord {
    /// Normalize the raw object produced by the oracle.
    ///
    /// Returns `None` when the map is empty or carries no positive calorie
    /// count. Missing or unusable quantities default to 0 and a missing
    /// `food_name` falls back to `requested_name`.
    pub fn from_oracle_fields(fields: &Map<String, Value>, requested_name: &str) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }

        let number = |key: &str| fields.get(key).map(quantity::from_value).unwrap_or(0.0);

        let calories = number("calories");
        if calories <= 0.0 {
            return None;
        }

        let food_name = fields
            .get("food_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(requested_name)
            .to_string();

        Some(Self {
            food_name,
            serving_size_grams: number("serving_size_grams"),
            calories,
            protein_grams: number("protein_grams"),
            carbohydrates_grams: number("carbohydrates_grams"),
            fat_grams: number("fat_grams"),
            fiber_grams: number("fiber_grams"),
            sugar_grams: number("sugar_grams"),
        })
    }
}

/// Lenient (de)serialization for nutrition quantities.
///
/// Accepts numbers and numeric strings; anything else, negative or non-finite
/// becomes 0. Whole values are written back as JSON integers.
pub(crate) mod quantity {
    use super::*;

    pub fn from_value(value: &Value) -> f64 {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && *value >= 0.0 && *value < u64::MAX as f64 {
            serializer.serialize_u64(*value as u64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(from_value(&value))
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deserialize_date;

/// Dated body-measurement snapshot. Every save creates a new row; snapshots
/// are never edited in place.
///
/// Lengths are centimetres, masses kilograms, body fat a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: i64,
    pub user_email: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub body_fat: Option<f64>,
    #[serde(default)]
    pub muscle_mass: Option<f64>,
    #[serde(default)]
    pub chest: Option<f64>,
    #[serde(default)]
    pub waist: Option<f64>,
    #[serde(default)]
    pub hip: Option<f64>,
    #[serde(default)]
    pub arm: Option<f64>,
    #[serde(default)]
    pub thigh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewBodyMeasurement {
    pub user_email: String,
    pub date: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub arm: Option<f64>,
    pub thigh: Option<f64>,
}

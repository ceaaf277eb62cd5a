//! Body-measurement progress between snapshots.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::BodyMeasurement;

/// Body-mass index from centimetres and kilograms.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let (h, w) = (height_cm?, weight_kg?);
    if h <= 0.0 || w <= 0.0 {
        return None;
    }
    let meters = h / 100.0;
    Some(w / (meters * meters))
}

pub fn latest(snapshots: &[BodyMeasurement]) -> Option<&BodyMeasurement> {
    snapshots.iter().max_by_key(|s| (s.date, s.id))
}

pub fn earliest(snapshots: &[BodyMeasurement]) -> Option<&BodyMeasurement> {
    snapshots.iter().min_by_key(|s| (s.date, s.id))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementProgress {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub arm: Option<f64>,
    pub thigh: Option<f64>,
    /// BMI of the latest snapshot. Height is carried forward from older
    /// snapshots when the latest one does not record it.
    pub current_bmi: Option<f64>,
}

fn delta(from: Option<f64>, to: Option<f64>) -> Option<f64> {
    Some(to? - from?)
}

impl MeasurementProgress {
    /// Change from the earliest to the latest snapshot, `None` without
    /// snapshots.
    pub fn between(snapshots: &[BodyMeasurement]) -> Option<Self> {
        let first = earliest(snapshots)?;
        let last = latest(snapshots)?;
        let height = last.height.or_else(|| {
            let mut dated: Vec<&BodyMeasurement> = snapshots.iter().collect();
            dated.sort_by_key(|s| std::cmp::Reverse((s.date, s.id)));
            dated.into_iter().find_map(|s| s.height)
        });
        Some(Self {
            from: first.date,
            to: last.date,
            weight: delta(first.weight, last.weight),
            body_fat: delta(first.body_fat, last.body_fat),
            muscle_mass: delta(first.muscle_mass, last.muscle_mass),
            chest: delta(first.chest, last.chest),
            waist: delta(first.waist, last.waist),
            hip: delta(first.hip, last.hip),
            arm: delta(first.arm, last.arm),
            thigh: delta(first.thigh, last.thigh),
            current_bmi: bmi(height, last.weight),
        })
    }
}

use chrono::NaiveDate;

use crate::auth::{Access, AuthUser, Role, Route};
use crate::models::{self, NewBodyMeasurement, NewDropset, NewSeries};
use crate::progress::MeasurementProgress;
use crate::stats::{self, ExerciseReport};
use crate::uniffi_interface::errors::GymtrackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum UserRole {
    Logued,
    Premium,
    Gym,
    Admin,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Logued => UserRole::Logued,
            Role::Premium => UserRole::Premium,
            Role::Gym => UserRole::Gym,
            Role::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Logued => Role::Logued,
            UserRole::Premium => Role::Premium,
            UserRole::Gym => Role::Gym,
            UserRole::Admin => Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ScreenAccess {
    Granted,
    RedirectToLogin,
    RedirectToHome,
}

impl From<Access> for ScreenAccess {
    fn from(access: Access) -> Self {
        match access {
            Access::Granted => ScreenAccess::Granted,
            Access::Redirect(Route::Login) => ScreenAccess::RedirectToLogin,
            Access::Redirect(Route::Home) => ScreenAccess::RedirectToHome,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct SignedInUser {
    pub email: String,
    pub role: UserRole,
}

impl From<AuthUser> for SignedInUser {
    fn from(user: AuthUser) -> Self {
        SignedInUser {
            email: user.email,
            role: user.role.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseInfo {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<models::Exercise> for ExerciseInfo {
    fn from(e: models::Exercise) -> Self {
        ExerciseInfo {
            id: e.id,
            name: e.name,
            description: e.description,
            video_url: e.video_url,
            image_url: e.image_url,
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, GymtrackError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| GymtrackError::Validation {
            message: format!("invalid input: date {}", e),
        })
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct SessionStats {
    pub history_id: i64,
    pub date: String,
    pub series_count: u32,
    pub total_reps: u64,
    pub max_weight: f64,
    pub volume: f64,
    pub one_rep_max: f64,
    pub best_series_volume: f64,
}

impl From<stats::SessionSummary> for SessionStats {
    fn from(s: stats::SessionSummary) -> Self {
        SessionStats {
            history_id: s.history_id,
            date: format_date(s.date),
            series_count: s.series_count as u32,
            total_reps: s.total_reps,
            max_weight: s.max_weight,
            volume: s.volume,
            one_rep_max: s.one_rep_max,
            best_series_volume: s.best_series_volume,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct RecordMark {
    pub value: f64,
    pub date: String,
}

impl From<stats::Record> for RecordMark {
    fn from(r: stats::Record) -> Self {
        RecordMark {
            value: r.value,
            date: format_date(r.date),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct BestSeriesRow {
    pub reps: u32,
    pub weight: f64,
    pub date: String,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct HistoryReport {
    pub exercise_id: i64,
    pub window: String,
    pub sessions: Vec<SessionStats>,
    pub max_weight: Option<RecordMark>,
    pub one_rep_max: Option<RecordMark>,
    pub best_series_volume: Option<RecordMark>,
    pub best_series: Vec<BestSeriesRow>,
    pub window_volume: f64,
}

impl From<ExerciseReport> for HistoryReport {
    fn from(r: ExerciseReport) -> Self {
        HistoryReport {
            exercise_id: r.exercise_id,
            window: r.window,
            sessions: r.sessions.into_iter().map(Into::into).collect(),
            max_weight: r.records.max_weight.map(Into::into),
            one_rep_max: r.records.one_rep_max.map(Into::into),
            best_series_volume: r.records.best_series_volume.map(Into::into),
            best_series: r
                .best_series
                .into_iter()
                .map(|b| BestSeriesRow {
                    reps: b.reps,
                    weight: b.weight,
                    date: format_date(b.date),
                })
                .collect(),
            window_volume: r.window_volume,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct DropsetEntry {
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct SetEntry {
    pub reps: u32,
    pub weight: f64,
    pub rpe: Option<f32>,
    pub dropsets: Vec<DropsetEntry>,
}

impl From<SetEntry> for NewSeries {
    fn from(s: SetEntry) -> Self {
        NewSeries {
            reps: s.reps,
            weight: s.weight,
            rpe: s.rpe,
            dropsets: s
                .dropsets
                .into_iter()
                .map(|d| NewDropset {
                    reps: d.reps,
                    weight: d.weight,
                })
                .collect(),
        }
    }
}

/// One body-measurement form. `date` is `YYYY-MM-DD`; today when absent.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct MeasurementEntry {
    pub date: Option<String>,
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

impl TryFrom<MeasurementEntry> for NewBodyMeasurement {
    type Error = GymtrackError;

    fn try_from(m: MeasurementEntry) -> Result<Self, GymtrackError> {
        let date = m.date.as_deref().map(parse_date).transpose()?;
        Ok(NewBodyMeasurement {
            user_email: String::new(),
            date,
            height: m.height,
            weight: m.weight,
            body_fat: m.body_fat,
            muscle_mass: m.muscle_mass,
            chest: m.chest,
            waist: m.waist,
            hip: m.hip,
            arm: m.arm,
            thigh: m.thigh,
        })
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct MeasurementDelta {
    pub from: String,
    pub to: String,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub waist: Option<f64>,
    pub current_bmi: Option<f64>,
}

impl From<MeasurementProgress> for MeasurementDelta {
    fn from(p: MeasurementProgress) -> Self {
        MeasurementDelta {
            from: format_date(p.from),
            to: format_date(p.to),
            weight: p.weight,
            body_fat: p.body_fat,
            muscle_mass: p.muscle_mass,
            waist: p.waist,
            current_bmi: p.current_bmi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_both_ways() {
        for role in Role::ALL {
            assert_eq!(Role::from(UserRole::from(role)), role);
        }
    }

    #[test]
    fn measurement_entry_dates_are_checked() {
        let entry = MeasurementEntry {
            date: Some("2025-02-30".into()),
            weight: Some(80.0),
            ..MeasurementEntry::default()
        };
        assert!(NewBodyMeasurement::try_from(entry).is_err());

        let entry = MeasurementEntry {
            date: Some("2025-02-03".into()),
            weight: Some(80.0),
            ..MeasurementEntry::default()
        };
        let new = NewBodyMeasurement::try_from(entry).unwrap();
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2025, 2, 3));
    }
}

//! Client-side form checks. A failing check blocks the request and reports
//! a message per field.

use chrono::NaiveTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use crate::models::{
    ChangePasswordRequest, LoginRequest, NewBodyMeasurement, NewExerciseConfiguration,
    NewExerciseMuscle, NewGym, NewHistoryPRExercise, NewTrainingPlan, NewUserGym, RegisterRequest,
    ResetPasswordRequest,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

pub const PASSWORD_LEN: RangeInclusive<usize> = 8..=64;
pub const PERSON_NAME_LEN: RangeInclusive<usize> = 2..=50;
pub const TITLE_LEN: RangeInclusive<usize> = 1..=100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first message for a field; later ones are dropped.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "is required");
        }
    }

    fn length(&mut self, field: &str, value: &str, bounds: RangeInclusive<usize>) {
        let len = value.trim().chars().count();
        if len == 0 {
            self.add(field, "is required");
        } else if !bounds.contains(&len) {
            self.add(
                field,
                format!(
                    "must be between {} and {} characters",
                    bounds.start(),
                    bounds.end()
                ),
            );
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "is required");
        } else if !is_email(value.trim()) {
            self.add(field, "is not a valid email address");
        }
    }

    fn range<T>(&mut self, field: &str, value: T, bounds: RangeInclusive<T>)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if !bounds.contains(&value) {
            self.add(
                field,
                format!("must be between {} and {}", bounds.start(), bounds.end()),
            );
        }
    }

    fn optional_range(&mut self, field: &str, value: Option<f64>, bounds: RangeInclusive<f64>) {
        if let Some(v) = value {
            if !v.is_finite() {
                self.add(field, "must be a number");
            } else {
                self.range(field, v, bounds);
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, msg)| format!("{} {}", field, msg))
            .collect();
        write!(f, "invalid input: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &self.email);
        if self.password.is_empty() {
            errors.add("password", "is required");
        }
        errors.into_result()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.length("name", &self.name, PERSON_NAME_LEN);
        errors.length("last_name", &self.last_name, PERSON_NAME_LEN);
        errors.email("email", &self.email);
        password_rules(&mut errors, "password", &self.password);
        if self.password != self.password_confirmation {
            errors.add("password_confirmation", "does not match the password");
        }
        errors.into_result()
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("old_password", &self.old_password);
        password_rules(&mut errors, "new_password", &self.new_password);
        if !self.old_password.is_empty() && self.old_password == self.new_password {
            errors.add("new_password", "must differ from the current password");
        }
        errors.into_result()
    }
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &self.email);
        errors.required("code", &self.code);
        password_rules(&mut errors, "new_password", &self.new_password);
        errors.into_result()
    }
}

fn password_rules(errors: &mut ValidationErrors, field: &str, password: &str) {
    let len = password.chars().count();
    if len == 0 {
        errors.add(field, "is required");
    } else if !PASSWORD_LEN.contains(&len) {
        errors.add(
            field,
            format!(
                "must be between {} and {} characters",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            ),
        );
    }
}

impl Validate for NewExerciseConfiguration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.range("sets", self.sets, 1..=20);
        errors.range("reps_low", self.reps_low, 1..=100);
        errors.range("reps_high", self.reps_high, 1..=100);
        if self.reps_low > self.reps_high {
            errors.add("reps_low", "must not exceed reps_high");
        }
        errors.range("rest", self.rest, 0..=900);
        errors.into_result()
    }
}

impl Validate for NewExerciseMuscle {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.range("rate", self.rate, 1..=10);
        errors.into_result()
    }
}

impl Validate for NewHistoryPRExercise {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.series.is_empty() {
            errors.add("series", "at least one series is required");
        }
        for (i, s) in self.series.iter().enumerate() {
            let prefix = format!("series[{}]", i);
            errors.range(&format!("{}.reps", prefix), s.reps, 1..=100);
            errors.optional_range(&format!("{}.weight", prefix), Some(s.weight), 0.0..=1000.0);
            if let Some(rpe) = s.rpe {
                errors.range(&format!("{}.rpe", prefix), rpe, 1.0..=10.0);
            }
            for (j, d) in s.dropsets.iter().enumerate() {
                let prefix = format!("series[{}].dropsets[{}]", i, j);
                errors.range(&format!("{}.reps", prefix), d.reps, 1..=100);
                errors.optional_range(&format!("{}.weight", prefix), Some(d.weight), 0.0..=1000.0);
                if d.weight > s.weight {
                    errors.add(
                        format!("{}.weight", prefix),
                        "must not exceed the weight of its series",
                    );
                }
            }
        }
        errors.into_result()
    }
}

impl Validate for NewBodyMeasurement {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let circumferences = [
            ("chest", self.chest),
            ("waist", self.waist),
            ("hip", self.hip),
            ("arm", self.arm),
            ("thigh", self.thigh),
        ];
        let any_set = [
            self.height,
            self.weight,
            self.body_fat,
            self.muscle_mass,
        ]
        .iter()
        .chain(circumferences.iter().map(|(_, v)| v))
        .any(Option::is_some);
        if !any_set {
            errors.add("measurement", "at least one value is required");
        }
        errors.optional_range("height", self.height, 50.0..=260.0);
        errors.optional_range("weight", self.weight, 20.0..=400.0);
        errors.optional_range("body_fat", self.body_fat, 0.0..=70.0);
        errors.optional_range("muscle_mass", self.muscle_mass, 0.0..=400.0);
        for (field, value) in circumferences {
            errors.optional_range(field, value, 0.0..=300.0);
        }
        errors.into_result()
    }
}

impl Validate for NewUserGym {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("user_email", &self.user_email);
        if self.start_date >= self.end_date {
            errors.add("end_date", "must be after the start date");
        }
        errors.into_result()
    }
}

impl Validate for NewGym {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.length("name", &self.name, TITLE_LEN);
        errors.required("address", &self.address);
        if !self.price.is_finite() || self.price < 0.0 {
            errors.add("price", "must be zero or more");
        }
        if self.capacity < 1 {
            errors.add("capacity", "must be at least 1");
        }
        let opening = parse_time(&mut errors, "opening_time", self.opening_time.as_deref());
        let closing = parse_time(&mut errors, "closing_time", self.closing_time.as_deref());
        if let (Some(open), Some(close)) = (opening, closing) {
            if open >= close {
                errors.add("closing_time", "must be after the opening time");
            }
        }
        errors.into_result()
    }
}

fn parse_time(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<NaiveTime> {
    let value = value?.trim();
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add(field, "must be a time like 07:30");
            None
        }
    }
}

impl Validate for NewTrainingPlan {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.length("name", &self.name, TITLE_LEN);
        if self.user_email.is_none() && self.gym_id.is_none() {
            errors.add("owner", "a routine belongs to a user or a gym");
        }
        errors.into_result()
    }
}

/// Names of catalog entries (muscles, machines, difficulties, tags).
pub fn validate_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.length("name", name, TITLE_LEN);
    errors.into_result()
}

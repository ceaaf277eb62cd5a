use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deserialize_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    #[serde(default)]
    pub address: String,
    /// `HH:MM`, local time of the gym.
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGym {
    pub name: String,
    pub owner_email: String,
    pub address: String,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub price: f64,
    pub capacity: u32,
    pub phone: Option<String>,
}

/// Membership of a user in a gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGym {
    pub id: i64,
    pub user_email: String,
    pub gym_id: i64,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub can_edit_routines: bool,
    #[serde(default)]
    pub can_manage_members: bool,
}

impl UserGym {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserGym {
    pub user_email: String,
    pub gym_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_premium: bool,
    pub can_edit_routines: bool,
    pub can_manage_members: bool,
}

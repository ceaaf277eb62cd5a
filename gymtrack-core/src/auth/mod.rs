//! Roles, token claims and the role gate.

pub mod gate;

pub use gate::{Access, AuthState, AuthUser, RoleGate, Route};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Account role. Declaration order is the privilege order, so `Ord`
/// compares privileges and never the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    Logued,
    Premium,
    Gym,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Logued, Role::Premium, Role::Gym, Role::Admin];

    pub fn code(self) -> u8 {
        match self {
            Role::Logued => 1,
            Role::Premium => 2,
            Role::Gym => 3,
            Role::Admin => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Logued => "logued",
            Role::Premium => "premium",
            Role::Gym => "gym",
            Role::Admin => "admin",
        }
    }

    /// True when this role may enter a screen that needs `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> u8 {
        role.code()
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Role::from_code(code).ok_or_else(|| format!("unknown role code: {}", code))
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Role::try_from(code);
        }
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// Claims carried in the backend's access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Reads the payload segment of a JWT. The signature is the backend's
    /// business and is not checked here.
    pub fn decode(token: &str) -> Result<Claims> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidToken);
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| Error::InvalidToken)?;
        serde_json::from_slice(&bytes).map_err(|_| Error::InvalidToken)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

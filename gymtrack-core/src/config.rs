use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "GYMTRACK_API_URL";
pub const DB_PATH_VAR: &str = "GYMTRACK_DB_PATH";
pub const TIMEOUT_VAR: &str = "GYMTRACK_HTTP_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DB_PATH: &str = "gymtrack.sqlite3";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub db_path: PathBuf,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);
        let db_path = lookup(DB_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("ignoring {}={:?}, using {:?}", TIMEOUT_VAR, raw, defaults.timeout);
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };
        Self {
            api_url,
            db_path,
            timeout,
        }
    }
}

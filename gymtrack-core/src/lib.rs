pub mod api;
pub mod auth;
pub mod cancel;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod validation;

pub use error::{Error, Result};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
#[cfg(feature = "uniffi")]
pub mod uniffi_interface;

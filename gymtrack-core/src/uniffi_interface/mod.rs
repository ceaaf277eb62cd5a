//! Bindings consumed by the mobile shell.

pub mod errors;
pub mod logging;
pub mod objects;
pub mod session;

#[uniffi::export]
fn core_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! The auth context and everything the app does on behalf of the signed-in
//! user.
//!
//! `Session` owns the injected `ApiClient`, the device-local store and the
//! current `AuthState`. Screens talk to the backend through it so that a
//! rejected token always clears the stored credentials.

mod catalog;
mod gyms;
mod history;
mod routines;
mod session;

pub use session::Session;

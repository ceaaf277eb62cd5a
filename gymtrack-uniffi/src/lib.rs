//! Static library the mobile build links. All bindings live in the core
//! crate; this only re-exports its scaffolding under one library name.

pub use gymtrack::uniffi_interface::*;

gymtrack::uniffi_reexport_scaffolding!();

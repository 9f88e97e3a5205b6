//! # rampart-core
//!
//! Configuration types shared by the Rampart crates.
//!
//! The host node owns the reloadable settings machinery; Rampart only ever
//! consumes immutable [`Settings`] values handed to it on activation and on
//! every configuration reload.

pub mod config;

pub use config::{AuditSinkSettings, Settings};

//! Wooting keyboard driver
//!
//! The device layers live in the `wooting-transport` and `wooting-keyboard`
//! crates; this crate holds the configuration shared by the command-line
//! front end.

pub mod config;

pub use config::{DemoConfig, DriverConfig};

//! CLI command handlers

pub mod commands;

pub use commands::{bundle, init, label, latest, sheets, show, stamp, version};

//! CLI command implementations

pub mod board;
pub mod completions;
pub mod config;
pub mod mechanics;
pub mod open;
pub mod parts;
pub mod session;
pub mod units;
pub mod wo;

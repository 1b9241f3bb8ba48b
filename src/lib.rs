//! shopdesk: a terminal dashboard for a fleet maintenance shop
//!
//! Talks to the shop's REST API to list and create work orders, move them
//! through their lifecycle, and manage notes, parts and the fleet roster.

pub mod cli;
pub mod core;
pub mod entities;
pub mod views;

//! First-person navigation controller.
//!
//! # Invariants
//! - Each tick runs orientation, then movement, then the collision gate, in that order.
//! - Pitch stays within [-π/2, π/2].
//! - Diagonal movement is no faster than straight movement.
//! - A move that would overlap any obstacle is rejected whole; the camera stays put.
//! - The controller only reads the obstacle set.

pub mod config;
pub mod controller;

pub use config::NavigationConfig;
pub use controller::{NavigationController, TickOutcome};

pub fn crate_info() -> &'static str {
    "roomscene-navigation v0.1.0"
}

//! Input: raw key and pointer events mapped to the actions the navigation
//! controller consumes.
//!
//! # Invariants
//! - The controller sees actions, never raw key codes.
//! - Key matching is case-insensitive.

pub mod action;
pub mod bindings;

pub use action::{Action, MoveDirection};
pub use bindings::KeyBindings;

pub fn crate_info() -> &'static str {
    "roomscene-input v0.1.0"
}

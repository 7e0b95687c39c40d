//! Scene object composition: a flat arena of transform nodes linked by
//! non-owning associations.
//!
//! # Invariants
//! - An operation applied to a node reaches every associated descendant exactly once.
//! - Association never changes the child's current transform.
//! - The association graph is acyclic; `associate` refuses edges that would close a loop.

pub mod graph;

pub use graph::{SceneError, SceneGraph, TransformNode};

pub fn crate_info() -> &'static str {
    "roomscene-scene v0.1.0"
}

//! Collision volumes: axis-aligned boxes derived once from mesh extents.
//!
//! # Invariants
//! - Volumes are read-only after construction; they do not follow later transform edits.
//! - A degenerate volume (no vertices) never intersects anything.
//! - The obstacle set is populated at scene-build time and only queried afterwards.

mod obstacles;
mod volume;

pub use obstacles::{Obstacle, ObstacleSet};
pub use volume::{Aabb, CollisionError, CollisionVolume};

pub fn crate_info() -> &'static str {
    "roomscene-collision v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("collision"));
    }
}

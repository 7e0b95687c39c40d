//! Surface Builder: smooth curved meshes from sparse weighted control grids.
//!
//! # Invariants
//! - Knot vectors are clamped, non-decreasing, and `count + degree + 1` long.
//! - Degenerate parameters fail with `InvalidSurfaceParameters`; no partial mesh is returned.
//! - Built meshes are immutable; changing control points means rebuilding.

mod grid;
mod knots;
mod tessellate;

pub use grid::ControlPointGrid;
pub use knots::knot_vector;
pub use tessellate::{
    DEFAULT_SAMPLES, SurfaceSpec, build_double_sided_surface, build_surface, evaluate,
};

/// Errors from surface construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("invalid surface parameters: {0}")]
    InvalidSurfaceParameters(String),
}

pub fn crate_info() -> &'static str {
    "roomscene-surface v0.1.0"
}

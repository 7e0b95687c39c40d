//! Shared types for the roomscene workspace.
//!
//! # Invariants
//! - `MeshData` attribute arrays are index-aligned: one uv and one normal per position.
//! - Sanitizers never return non-finite values.

pub mod geometry;
pub mod sanitize;
pub mod types;

pub use geometry::{MeshData, Sidedness};
pub use types::{NodeId, Transform};

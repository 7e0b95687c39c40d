//! Developer Tooling: runtime tunables and a scene inspector.
//!
//! # Invariants
//! - Tunable numbers always lie within their declared range.
//! - The inspector only reads the scene.

mod inspector;
mod tunables;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use tunables::{Knob, TunableError, Tunables};

pub fn crate_info() -> &'static str {
    "roomscene-tools v0.1.0"
}

//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - The renderer never mutates scene state; it receives meshes, world
//!   matrices and lights and draws them.
//! - A drawable keeps its handle for the lifetime of the renderer.
//!
//! A debug text renderer implements the trait for the CLI and tests; a GPU
//! backend plugs in behind the same trait, packing meshes with [`GpuVertex`].

mod light;
mod renderer;
mod vertex;

pub use light::Light;
pub use renderer::{DebugTextRenderer, DrawableHandle, Projection, RenderError, Renderer};
pub use vertex::{GpuVertex, pack_vertices};

pub fn crate_info() -> &'static str {
    "roomscene-render v0.1.0"
}

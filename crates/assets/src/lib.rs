//! Resources: textures, models and materials behind content-addressed handles.
//!
//! Objects hold handles, never raw file data. Loading happens through an
//! [`AssetSource`] that the cache polls once per frame, so a missing or slow
//! file never blocks scene construction.
//!
//! # Invariants
//! - Requesting the same path twice returns the same handle and loads once.
//! - A failed load is recorded in the resource state; nothing panics.
//! - A material whose texture is not `Ready` renders untextured.

pub mod cache;
pub mod formats;
pub mod handles;
pub mod material;

pub use cache::{AssetSource, FsSource, ResourceCache, ResourceState, UpdateStats};
pub use formats::{ModelInfo, TextureFormat, TextureInfo};
pub use handles::{MaterialId, ModelHandle, TextureHandle};
pub use material::Material;

/// Why a resource could not be loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceLoadError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("{path}: unrecognized format")]
    UnrecognizedFormat { path: String },
    #[error("{path}: malformed data: {reason}")]
    Malformed { path: String, reason: String },
}

pub fn crate_info() -> &'static str {
    "roomscene-assets v0.1.0"
}

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::task::Poll;

use crate::{
    Material, MaterialId, ModelHandle, ModelInfo, ResourceLoadError, TextureHandle, TextureInfo,
};

/// Where resource bytes come from. `Poll::Pending` means "ask again next frame".
pub trait AssetSource {
    fn poll_load(&mut self, path: &str) -> Poll<Result<Vec<u8>, ResourceLoadError>>;
}

/// Reads resources from a directory on disk. Every poll completes immediately.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsSource {
    fn poll_load(&mut self, path: &str) -> Poll<Result<Vec<u8>, ResourceLoadError>> {
        let full = self.root.join(path);
        Poll::Ready(std::fs::read(&full).map_err(|e| ResourceLoadError::Io {
            path: path.to_string(),
            message: e.to_string(),
        }))
    }
}

/// Load state of one resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Pending,
    Ready(T),
    Failed(ResourceLoadError),
}

impl<T> ResourceState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResourceState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ResourceState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    path: String,
    state: ResourceState<T>,
}

/// What one [`ResourceCache::update`] call resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub loaded: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Explicit resource cache, passed to whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    textures: BTreeMap<TextureHandle, Entry<TextureInfo>>,
    models: BTreeMap<ModelHandle, Entry<ModelInfo>>,
    materials: BTreeMap<MaterialId, Material>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a texture load. Repeated requests for a path share one handle.
    pub fn request_texture(&mut self, path: &str) -> TextureHandle {
        let handle = TextureHandle::for_path(path);
        self.textures.entry(handle).or_insert_with(|| {
            tracing::debug!(path, %handle, "texture requested");
            Entry {
                path: path.to_string(),
                state: ResourceState::Pending,
            }
        });
        handle
    }

    /// Queue a glTF model load.
    pub fn request_model(&mut self, path: &str) -> ModelHandle {
        let handle = ModelHandle::for_path(path);
        self.models.entry(handle).or_insert_with(|| {
            tracing::debug!(path, %handle, "model requested");
            Entry {
                path: path.to_string(),
                state: ResourceState::Pending,
            }
        });
        handle
    }

    pub fn texture_state(&self, handle: TextureHandle) -> Option<&ResourceState<TextureInfo>> {
        self.textures.get(&handle).map(|e| &e.state)
    }

    pub fn model_state(&self, handle: ModelHandle) -> Option<&ResourceState<ModelInfo>> {
        self.models.get(&handle).map(|e| &e.state)
    }

    pub fn texture_path(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(&handle).map(|e| e.path.as_str())
    }

    /// Register a material, returning its content-addressed id.
    pub fn register_material(&mut self, material: Material) -> MaterialId {
        let id = material.id();
        self.materials.entry(id).or_insert(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// The texture a material should be drawn with right now: only one that
    /// has finished loading.
    pub fn resolved_texture(&self, id: MaterialId) -> Option<TextureHandle> {
        let texture = self.materials.get(&id)?.texture?;
        self.texture_state(texture)?.ready().map(|_| texture)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Poll every pending resource once.
    pub fn update(&mut self, source: &mut dyn AssetSource) -> UpdateStats {
        let mut stats = UpdateStats::default();
        for entry in self.textures.values_mut() {
            poll_entry(entry, source, TextureInfo::parse, &mut stats);
        }
        for entry in self.models.values_mut() {
            poll_entry(entry, source, ModelInfo::parse, &mut stats);
        }
        if stats.loaded + stats.failed > 0 {
            tracing::debug!(
                loaded = stats.loaded,
                failed = stats.failed,
                pending = stats.pending,
                "resource cache updated"
            );
        }
        stats
    }

    /// True once nothing is pending.
    pub fn is_settled(&self) -> bool {
        self.textures.values().all(|e| !e.state.is_pending())
            && self.models.values().all(|e| !e.state.is_pending())
    }
}

fn poll_entry<T>(
    entry: &mut Entry<T>,
    source: &mut dyn AssetSource,
    parse: fn(&str, &[u8]) -> Result<T, ResourceLoadError>,
    stats: &mut UpdateStats,
) {
    if !entry.state.is_pending() {
        return;
    }
    let result = match source.poll_load(&entry.path) {
        Poll::Pending => {
            stats.pending += 1;
            return;
        }
        Poll::Ready(bytes) => bytes.and_then(|bytes| parse(&entry.path, &bytes)),
    };
    entry.state = match result {
        Ok(value) => {
            stats.loaded += 1;
            ResourceState::Ready(value)
        }
        Err(err) => {
            tracing::warn!(path = %entry.path, error = %err, "resource failed to load");
            stats.failed += 1;
            ResourceState::Failed(err)
        }
    };
}

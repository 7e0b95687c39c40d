use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// First 8 bytes of a SHA-256 over the kind tag and the given parts.
fn content_hash(kind: &str, parts: &[&[u8]]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}

/// Texture identified by the hash of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

impl TextureHandle {
    pub fn for_path(path: &str) -> Self {
        Self(content_hash("texture", &[path.as_bytes()]))
    }
}

/// Model identified by the hash of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelHandle(pub u64);

impl ModelHandle {
    pub fn for_path(path: &str) -> Self {
        Self(content_hash("model", &[path.as_bytes()]))
    }
}

/// Material identified by the hash of its full description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u64);

impl MaterialId {
    pub(crate) fn from_parts(parts: &[&[u8]]) -> Self {
        Self(content_hash("material", parts))
    }
}

impl std::fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tex:{:016x}", self.0)
    }
}

impl std::fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "model:{:016x}", self.0)
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mat:{:016x}", self.0)
    }
}

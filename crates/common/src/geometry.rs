use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Which faces of a mesh the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sidedness {
    /// Back faces are culled.
    #[default]
    Front,
    /// Both faces are drawn. Used for thin sheets such as cloth and paper.
    Double,
}

/// Triangle mesh data ready to be handed to a renderer.
///
/// An empty `indices` list means the mesh is a point cloud.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    /// Counter-clockwise triangle list.
    pub indices: Vec<u32>,
    pub sidedness: Sidedness,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn with_sidedness(mut self, sidedness: Sidedness) -> Self {
        self.sidedness = sidedness;
        self
    }

    /// Bake a transform into positions and normals.
    pub fn transformed(&self, matrix: Mat4) -> Self {
        let normal_matrix = matrix.inverse().transpose();
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point3(*p))
                .collect(),
            uvs: self.uvs.clone(),
            normals: self
                .normals
                .iter()
                .map(|n| normal_matrix.transform_vector3(*n).normalize_or_zero())
                .collect(),
            indices: self.indices.clone(),
            sidedness: self.sidedness,
        }
    }

    /// Recompute smooth vertex normals by accumulating area-weighted face normals.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }
}

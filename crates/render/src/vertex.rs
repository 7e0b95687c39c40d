use bytemuck::{Pod, Zeroable};
use roomscene_common::MeshData;

/// Interleaved vertex layout shared by GPU backends.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Interleave a mesh's attribute arrays. Missing normals or uvs are zero.
pub fn pack_vertices(mesh: &MeshData) -> Vec<GpuVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| GpuVertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).map_or([0.0; 3], |n| n.to_array()),
            uv: mesh.uvs.get(i).map_or([0.0; 2], |uv| uv.to_array()),
        })
        .collect()
}

use glam::Mat4;
use roomscene_assets::{Material, MaterialId, ModelHandle, ResourceCache, TextureHandle};
use roomscene_collision::{Aabb, CollisionVolume, ObstacleSet};
use roomscene_common::{MeshData, NodeId, Transform};
use roomscene_scene::{SceneError, SceneGraph};
use roomscene_surface::SurfaceError;

/// Failure to build one room object.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// One drawable piece of an object: a mesh placed relative to its node.
#[derive(Debug, Clone)]
pub struct Part {
    pub node: NodeId,
    pub mesh: MeshData,
    pub material: MaterialId,
    /// Placement inside the node, applied before the node's own transform.
    pub offset: Transform,
}

impl Part {
    /// World matrix of this part under the current scene state.
    pub fn world_matrix(&self, scene: &SceneGraph) -> Result<Mat4, SceneError> {
        Ok(scene.world_matrix(self.node)? * self.offset.matrix())
    }
}

/// Everything an object needs while it builds itself.
pub struct BuildContext<'a> {
    pub scene: SceneGraph,
    pub resources: &'a mut ResourceCache,
    pub parts: Vec<Part>,
    pub obstacles: ObstacleSet,
}

impl<'a> BuildContext<'a> {
    pub fn new(resources: &'a mut ResourceCache) -> Self {
        Self {
            scene: SceneGraph::new(),
            resources,
            parts: Vec::new(),
            obstacles: ObstacleSet::new(),
        }
    }

    pub fn spawn(&mut self, name: &str, transform: Transform) -> NodeId {
        self.scene.spawn(name, transform)
    }

    pub fn material(&mut self, material: Material) -> MaterialId {
        self.resources.register_material(material)
    }

    pub fn texture(&mut self, path: &str) -> TextureHandle {
        self.resources.request_texture(path)
    }

    pub fn model(&mut self, path: &str) -> ModelHandle {
        self.resources.request_model(path)
    }

    pub fn add_part(&mut self, node: NodeId, mesh: MeshData, material: MaterialId, offset: Transform) {
        self.parts.push(Part {
            node,
            mesh,
            material,
            offset,
        });
    }

    pub fn parts_of(&self, node: NodeId) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(move |p| p.node == node)
    }

    /// Bounds of the parts owned by `node` at their current placement.
    /// Associated nodes are not included.
    pub fn volume_of(&self, node: NodeId) -> Result<CollisionVolume, SceneError> {
        let mut bounds: Option<Aabb> = None;
        for part in self.parts_of(node) {
            let volume = CollisionVolume::from_mesh(&part.mesh, part.world_matrix(&self.scene)?);
            if let Some(aabb) = volume.bounds() {
                bounds = Some(bounds.map_or(*aabb, |b| b.union(*aabb)));
            }
        }
        Ok(bounds.map_or_else(CollisionVolume::degenerate, CollisionVolume::from_aabb))
    }

    /// Freeze the current extents of `node` into a named obstacle.
    pub fn register_obstacle(&mut self, name: &str, node: NodeId) -> Result<(), SceneError> {
        let volume = self.volume_of(node)?;
        self.obstacles.register(name, volume);
        Ok(())
    }

    pub fn finish(self) -> (SceneGraph, Vec<Part>, ObstacleSet) {
        (self.scene, self.parts, self.obstacles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;
    use glam::Vec3;

    #[test]
    fn part_world_matrix_composes_node_and_offset() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = ctx.spawn("table", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let mat = ctx.material(Material::default());
        ctx.add_part(
            node,
            box_mesh(Vec3::ONE),
            mat,
            Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
        );
        let part = ctx.parts_of(node).next().unwrap();
        let origin = part.world_matrix(&ctx.scene).unwrap().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn volume_covers_own_parts_only() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let mat = ctx.material(Material::default());
        let table = ctx.spawn("table", Transform::default());
        let jar = ctx.spawn("jar", Transform::from_position(Vec3::new(3.0, 0.0, 0.0)));
        ctx.scene.associate(table, jar).unwrap();
        ctx.add_part(table, box_mesh(Vec3::splat(2.0)), mat, Transform::default());
        ctx.add_part(jar, box_mesh(Vec3::splat(2.0)), mat, Transform::default());

        let volume = ctx.volume_of(table).unwrap();
        let bounds = volume.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(1.0));

        ctx.scene.translate(table, Vec3::new(0.0, 5.0, 0.0)).unwrap();
        let moved = ctx.volume_of(jar).unwrap();
        assert_eq!(moved.bounds().unwrap().min, Vec3::new(2.0, 4.0, -1.0));

        let empty = ctx.spawn("empty", Transform::default());
        assert!(ctx.volume_of(empty).unwrap().is_degenerate());

        ctx.register_obstacle("table", table).unwrap();
        let (_, parts, obstacles) = ctx.finish();
        assert_eq!(parts.len(), 2);
        assert_eq!(obstacles.len(), 1);
    }
}

use glam::{Mat4, Vec3};
use roomscene_common::MeshData;
use serde::{Deserialize, Serialize};

/// Errors from collision volume construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollisionError {
    #[error("collision volume has no extent: source mesh has no vertices")]
    DegenerateCollisionVolume,
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing every point, or `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter().filter(|p| p.is_finite());
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| acc.grow(p)))
    }

    pub fn grow(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive overlap on all three axes: touching faces count as a hit.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }
}

/// A box used for overlap queries. Computed once; later transform edits to
/// the source object do not move it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionVolume {
    bounds: Option<Aabb>,
}

impl CollisionVolume {
    /// Bounds of every mesh vertex after applying `world`.
    ///
    /// An empty mesh yields a degenerate volume that never intersects.
    pub fn from_mesh(mesh: &MeshData, world: Mat4) -> Self {
        let bounds = Aabb::from_points(mesh.positions.iter().map(|p| world.transform_point3(*p)));
        if bounds.is_none() {
            tracing::debug!("degenerate collision volume from empty mesh");
        }
        Self { bounds }
    }

    /// Like [`CollisionVolume::from_mesh`] but reports a degenerate result.
    pub fn try_from_mesh(mesh: &MeshData, world: Mat4) -> Result<Self, CollisionError> {
        let volume = Self::from_mesh(mesh, world);
        if volume.is_degenerate() {
            return Err(CollisionError::DegenerateCollisionVolume);
        }
        Ok(volume)
    }

    pub fn centered(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            bounds: Some(Aabb::new(center - half, center + half)),
        }
    }

    pub fn from_aabb(aabb: Aabb) -> Self {
        Self { bounds: Some(aabb) }
    }

    /// A volume with no extent.
    pub fn degenerate() -> Self {
        Self { bounds: None }
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    pub fn is_degenerate(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn intersects(&self, other: &Self) -> bool {
        match (&self.bounds, &other.bounds) {
            (Some(a), Some(b)) => a.intersects(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn unit_cube_mesh() -> MeshData {
        let mut mesh = MeshData::new();
        for x in [-0.5, 0.5] {
            for y in [-0.5, 0.5] {
                for z in [-0.5, 0.5] {
                    mesh.positions.push(Vec3::new(x, y, z));
                }
            }
        }
        mesh
    }

    #[test]
    fn volume_from_mesh_applies_world_transform() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(10.0, 0.0, 0.0),
        );
        let volume = CollisionVolume::from_mesh(&unit_cube_mesh(), world);
        let bounds = volume.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(9.0, -0.5, -0.5));
        assert_eq!(bounds.max, Vec3::new(11.0, 0.5, 0.5));
    }

    #[test]
    fn rotated_mesh_grows_bounds() {
        let world = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let volume = CollisionVolume::from_mesh(&unit_cube_mesh(), world);
        let half = volume.bounds().unwrap().half_extents();
        assert!((half.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((half.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn empty_mesh_is_degenerate() {
        let empty = MeshData::new();
        let volume = CollisionVolume::from_mesh(&empty, Mat4::IDENTITY);
        assert!(volume.is_degenerate());
        assert_eq!(
            CollisionVolume::try_from_mesh(&empty, Mat4::IDENTITY),
            Err(CollisionError::DegenerateCollisionVolume)
        );
        let everything = CollisionVolume::centered(Vec3::ZERO, Vec3::splat(1e6));
        assert!(!volume.intersects(&everything));
        assert!(!everything.intersects(&volume));
    }

    #[test]
    fn touching_faces_intersect() {
        let a = CollisionVolume::centered(Vec3::ZERO, Vec3::splat(0.5));
        let b = CollisionVolume::centered(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
        let c = CollisionVolume::centered(Vec3::new(1.01, 0.0, 0.0), Vec3::splat(0.5));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn separation_on_one_axis_is_enough() {
        let a = CollisionVolume::centered(Vec3::ZERO, Vec3::splat(1.0));
        let b = CollisionVolume::centered(Vec3::new(0.0, 0.0, 3.0), Vec3::splat(1.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn aabb_helpers() {
        let a = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(a.min, Vec3::ZERO);
        assert_eq!(a.center(), Vec3::splat(0.5));
        assert!(a.contains(Vec3::splat(1.0)));
        let b = a.union(Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0)));
        assert_eq!(b.max, Vec3::splat(3.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }
}

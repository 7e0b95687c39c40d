use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

use glam::{Quat, Vec2, Vec3};
use roomscene_assets::Material;
use roomscene_common::{NodeId, Transform};

use super::{RoomObject, placed, spawn_object};
use crate::context::{BuildContext, BuildError};
use crate::primitives::{CylinderShape, catmull_rom, cylinder_mesh, sphere_mesh, tube_mesh};

/// Segments along every arc of the beetle outline.
const ARC_SEGMENTS: usize = 50;

/// One circular arc of the beetle outline, in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineArc {
    pub center: Vec2,
    pub radius: f32,
    pub start: f32,
    /// Signed: negative sweeps clockwise.
    pub sweep: f32,
}

impl OutlineArc {
    /// Points along the arc relative to its center.
    pub fn points(&self) -> Vec<Vec3> {
        (0..=ARC_SEGMENTS)
            .map(|i| {
                let angle = self.start + self.sweep * i as f32 / ARC_SEGMENTS as f32;
                let (s, c) = angle.sin_cos();
                Vec3::new(c * self.radius, s * self.radius, 0.0)
            })
            .collect()
    }
}

/// Side profile of a beetle car drawn with bent tubes, centered on its node.
#[derive(Debug, Clone, PartialEq)]
pub struct BeetleTubes {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    /// Tube radius.
    pub radius: f32,
}

impl Default for BeetleTubes {
    fn default() -> Self {
        Self {
            name: "beetle".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            radius: 0.05,
        }
    }
}

impl BeetleTubes {
    pub const TOTAL_LENGTH: f32 = 16.0 / 3.0;
    pub const TOTAL_HEIGHT: f32 = 8.0 / 3.0;

    /// Wheels, rear section, hood and windshield.
    pub fn arcs() -> [OutlineArc; 5] {
        let offset = Vec2::new(-Self::TOTAL_LENGTH / 2.0 + 1.0, -Self::TOTAL_HEIGHT / 2.0);
        let arc = |x: f32, y: f32, radius: f32, start: f32, sweep: f32| OutlineArc {
            center: offset + Vec2::new(x, y),
            radius,
            start,
            sweep,
        };
        [
            arc(0.0, 0.0, 1.0, 0.0, PI),
            arc(10.0 / 3.0, 0.0, 1.0, 0.0, PI),
            arc(5.0 / 3.0, 0.0, 8.0 / 3.0, PI, -FRAC_PI_2),
            arc(3.0, 0.0, 4.0 / 3.0, 0.0, FRAC_PI_2),
            arc(5.0 / 3.0, 4.0 / 3.0, 4.0 / 3.0, 0.0, FRAC_PI_2),
        ]
    }
}

impl RoomObject for BeetleTubes {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let material = ctx.material(Material::named("beetle").with_color(0x404040));
        for arc in Self::arcs() {
            ctx.add_part(
                node,
                tube_mesh(&arc.points(), self.radius, 8),
                material,
                Transform::from_position(arc.center.extend(0.0)),
            );
        }
        Ok(node)
    }
}

/// Coiled wire lying along +X with a ball on each end.
#[derive(Debug, Clone, PartialEq)]
pub struct HelicalSpring {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    /// Added to `coil_radius` to give the helix radius.
    pub radius: f32,
    pub length: f32,
    /// Sets the angular step: each path point turns `TAU / coils`.
    pub coils: u32,
    /// Wire radius.
    pub coil_radius: f32,
}

impl Default for HelicalSpring {
    fn default() -> Self {
        Self {
            name: "spring".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            radius: 0.01,
            length: 1.0,
            coils: 50,
            coil_radius: 0.1,
        }
    }
}

impl HelicalSpring {
    /// Centerline of the wire: two points per coil.
    pub fn coil_path(&self) -> Vec<Vec3> {
        let coils = self.coils.max(1);
        let total = coils * 2;
        let step = TAU / coils as f32;
        let helix = self.radius + self.coil_radius;
        (0..total)
            .map(|i| {
                let (s, c) = (i as f32 * step).sin_cos();
                Vec3::new(i as f32 / total as f32 * self.length, c * helix, s * helix)
            })
            .collect()
    }
}

impl RoomObject for HelicalSpring {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let material = ctx.material(
            Material::named("spring")
                .with_color(0x1a1a1a)
                .with_specular(0xeeeeee, 10.0),
        );
        let path = self.coil_path();
        ctx.add_part(node, tube_mesh(&path, self.coil_radius, 8), material, Transform::default());
        let cap = sphere_mesh(self.coil_radius, 10, 10);
        for end in [path.first(), path.last()].into_iter().flatten() {
            ctx.add_part(node, cap.clone(), material, Transform::from_position(*end));
        }
        Ok(node)
    }
}

/// Curved stem with a round center and six petals.
#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    pub name: String,
    pub position: Vec3,
}

impl Default for Flower {
    fn default() -> Self {
        Self {
            name: "flower".into(),
            position: Vec3::ZERO,
        }
    }
}

impl Flower {
    pub const HEAD: Vec3 = Vec3::new(0.0, 1.0, 0.3);

    pub fn stem_points() -> [Vec3; 4] {
        [
            Vec3::ZERO,
            Vec3::new(0.0, 0.3, 0.0),
            Vec3::new(0.0, 0.8, 0.1),
            Self::HEAD,
        ]
    }
}

impl RoomObject for Flower {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let stem = ctx.material(Material::named("flower_stem").with_color(0x228b22));
        let petal = ctx.material(Material::named("flower_petal").with_color(0xff69b4));
        let center = ctx.material(Material::named("flower_center").with_color(0xffff00));

        let path = catmull_rom(&Self::stem_points(), 20);
        ctx.add_part(node, tube_mesh(&path, 0.02, 8), stem, Transform::default());
        ctx.add_part(node, sphere_mesh(0.15, 16, 16), center, Transform::from_position(Self::HEAD));
        let petal_mesh = cylinder_mesh(CylinderShape::tapered(0.1, 0.05, 0.5, 8));
        for i in 0..6 {
            ctx.add_part(
                node,
                petal_mesh.clone(),
                petal,
                placed(Self::HEAD, Quat::from_rotation_z(FRAC_PI_6 * i as f32)),
            );
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_assets::ResourceCache;
    use roomscene_collision::Aabb;

    fn bounds(ctx: &BuildContext<'_>, node: NodeId) -> Aabb {
        *ctx.volume_of(node).unwrap().bounds().unwrap()
    }

    #[test]
    fn beetle_outline_is_centered() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let beetle = BeetleTubes::default().build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(beetle).count(), 5);

        let b = bounds(&ctx, beetle);
        let r = 0.05 + 1e-3;
        assert!((b.min.x + BeetleTubes::TOTAL_LENGTH / 2.0).abs() < r);
        assert!((b.max.x - BeetleTubes::TOTAL_LENGTH / 2.0).abs() < r);
        assert!((b.min.y + BeetleTubes::TOTAL_HEIGHT / 2.0).abs() < r);
        assert!((b.max.y - BeetleTubes::TOTAL_HEIGHT / 2.0).abs() < r);
    }

    #[test]
    fn beetle_arcs_join_up() {
        let arcs = BeetleTubes::arcs();
        let end = |a: &OutlineArc| a.center.extend(0.0) + *a.points().last().unwrap();
        let start = |a: &OutlineArc| a.center.extend(0.0) + a.points()[0];
        // Rear section and windshield meet at the roof.
        assert!(end(&arcs[2]).distance(end(&arcs[4])) < 1e-4);
        assert!(end(&arcs[4]).distance(Vec3::new(0.0, 4.0 / 3.0, 0.0)) < 1e-4);
        // Hood rises to where the windshield starts.
        assert!(end(&arcs[3]).distance(start(&arcs[4])) < 1e-4);
    }

    #[test]
    fn spring_path_turns_twice() {
        let spring = HelicalSpring::default();
        let path = spring.coil_path();
        assert_eq!(path.len(), 100);
        assert!(path[0].distance(Vec3::new(0.0, 0.11, 0.0)) < 1e-6);
        assert!(path[50].distance(Vec3::new(0.5, 0.11, 0.0)) < 1e-4);
        assert!(path.iter().all(|p| (p.y.hypot(p.z) - 0.11).abs() < 1e-5));
    }

    #[test]
    fn spring_has_capped_ends() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let spring = HelicalSpring::default().build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(spring).count(), 3);
        let b = bounds(&ctx, spring);
        // Caps reach one wire radius past the path ends at 0 and 0.99.
        assert!(b.min.x < -0.09);
        assert!(b.max.x > 1.07);
    }

    #[test]
    fn flower_head_sits_on_the_stem() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let flower = Flower::default().build(&mut ctx).unwrap();
        // Stem, center and six petals.
        assert_eq!(ctx.parts_of(flower).count(), 8);
        let b = bounds(&ctx, flower);
        assert!(b.min.y.abs() < 0.03);
        assert!((b.max.y - 1.25).abs() < 0.05);
    }
}

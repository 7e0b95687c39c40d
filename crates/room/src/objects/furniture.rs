use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use roomscene_assets::Material;
use roomscene_common::{NodeId, Sidedness, Transform};

use super::{RoomObject, placed, spawn_object};
use crate::context::{BuildContext, BuildError};
use crate::flame::{FlameParticles, FlameSettings};
use crate::primitives::{CylinderShape, box_mesh, catmull_rom, cylinder_mesh, plane_mesh, tube_mesh};

/// Box top on four cylindrical legs. The node sits at floor level.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub width: f32,
    pub length: f32,
    pub thickness: f32,
    pub leg_height: f32,
    pub leg_radius: f32,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            name: "table".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            width: 3.5,
            length: 3.5,
            thickness: 0.2,
            leg_height: 2.9,
            leg_radius: 0.1,
        }
    }
}

impl Table {
    /// Height of the table's upper surface above its node.
    pub fn top_height(&self) -> f32 {
        self.leg_height + self.thickness
    }
}

impl RoomObject for Table {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let metal = ctx.texture("textures/anodizedmetal.jpg");

        let top = ctx.material(
            Material::named("table_top")
                .with_color(0x808080)
                .with_specular(0x555555, 60.0)
                .with_texture(metal),
        );
        ctx.add_part(
            node,
            box_mesh(Vec3::new(self.width, self.thickness, self.length)),
            top,
            Transform::from_position(Vec3::new(0.0, self.leg_height + self.thickness / 2.0, 0.0)),
        );

        let leg_material = ctx.material(
            Material::named("table_leg")
                .with_color(0xffffff)
                .with_specular(0x555555, 100.0)
                .with_texture(metal),
        );
        let leg = cylinder_mesh(CylinderShape::new(self.leg_radius, self.leg_height, 16));
        let (x, z) = (self.width / 2.5, self.length / 2.5);
        for (sx, sz) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            ctx.add_part(
                node,
                leg.clone(),
                leg_material,
                Transform::from_position(Vec3::new(sx * x, self.leg_height / 2.0, sz * z)),
            );
        }
        Ok(node)
    }
}

/// Shallow dish, narrower at the base.
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub name: String,
    pub position: Vec3,
    pub radius: f32,
    pub thickness: f32,
}

impl Default for Plate {
    fn default() -> Self {
        Self {
            name: "plate".into(),
            position: Vec3::ZERO,
            radius: 0.8,
            thickness: 0.075,
        }
    }
}

impl RoomObject for Plate {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let material = ctx.material(Material::named("plate").with_color(0xfaf9f6).double_sided());
        let shape = CylinderShape::tapered(self.radius, self.radius / 1.5, self.thickness, 64);
        ctx.add_part(
            node,
            cylinder_mesh(shape).with_sidedness(Sidedness::Double),
            material,
            Transform::default(),
        );
        Ok(node)
    }
}

/// Round cake with a slice taken out. Both cut faces are closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cake {
    pub name: String,
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Angle of cake left, radians.
    pub sweep: f32,
}

impl Default for Cake {
    fn default() -> Self {
        Self {
            name: "cake".into(),
            position: Vec3::ZERO,
            radius: 0.5,
            height: 0.25,
            sweep: 1.8 * PI,
        }
    }
}

impl RoomObject for Cake {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let texture = ctx.texture("textures/cake.jpg");
        let material = ctx.material(
            Material::named("cake")
                .with_color(0x8b4513)
                .with_texture(texture)
                .double_sided(),
        );
        let body = CylinderShape::new(self.radius, self.height, 32).sweep(self.sweep);
        ctx.add_part(node, cylinder_mesh(body), material, Transform::default());

        // The sweep starts at +Z; each cut face runs from the axis to the rim.
        let face = plane_mesh(self.radius, self.height).with_sidedness(Sidedness::Double);
        for edge in [0.0, body.sweep] {
            let direction = Vec3::new(edge.sin(), 0.0, edge.cos());
            ctx.add_part(
                node,
                face.clone(),
                material,
                placed(direction * (self.radius / 2.0), Quat::from_rotation_y(edge - FRAC_PI_2)),
            );
        }
        Ok(node)
    }
}

/// Wax column with a wick on top. The node sits at the wax's mid-height.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub name: String,
    pub position: Vec3,
    pub wax_height: f32,
    pub wax_radius: f32,
}

impl Default for Candle {
    fn default() -> Self {
        Self {
            name: "candle".into(),
            position: Vec3::ZERO,
            wax_height: 0.2,
            wax_radius: 0.015,
        }
    }
}

impl Candle {
    pub fn wick_height(&self) -> f32 {
        self.wax_height * 0.1
    }

    /// Total height, wax plus wick.
    pub fn height(&self) -> f32 {
        self.wax_height + self.wick_height()
    }

    /// Top of the wick, relative to the candle node.
    pub fn wick_tip(&self) -> Vec3 {
        Vec3::new(0.0, self.wax_height / 2.0 + self.wick_height(), 0.0)
    }
}

impl RoomObject for Candle {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let wax = ctx.material(Material::named("candle_wax").with_color(0xffff99));
        let wick = ctx.material(Material::named("candle_wick").with_color(0x000000));

        let r = self.wax_radius;
        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::tapered(r * 0.95, r, self.wax_height, 16)),
            wax,
            Transform::default(),
        );
        let wick_height = self.wick_height();
        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::new(r * 0.05, wick_height, 8)),
            wick,
            Transform::from_position(Vec3::new(0.0, (self.wax_height + wick_height) / 2.0, 0.0)),
        );
        Ok(node)
    }
}

/// Point-particle flame. Its single part is the particle cloud, which the
/// room refreshes every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Flame {
    pub name: String,
    pub position: Vec3,
    pub settings: FlameSettings,
}

impl Default for Flame {
    fn default() -> Self {
        Self {
            name: "flame".into(),
            position: Vec3::ZERO,
            settings: FlameSettings::default(),
        }
    }
}

impl RoomObject for Flame {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let material = ctx.material(Material::named("flame").with_color(0xff4500));
        let particles = FlameParticles::new(self.settings.clone());
        ctx.add_part(node, particles.mesh(), material, Transform::default());
        Ok(node)
    }
}

/// Round seat on two crossed, bent tube legs.
#[derive(Debug, Clone, PartialEq)]
pub struct Stool {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub seat_radius: f32,
    pub seat_thickness: f32,
    pub leg_height: f32,
    pub leg_radius: f32,
}

impl Default for Stool {
    fn default() -> Self {
        Self {
            name: "stool".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            seat_radius: 0.6,
            seat_thickness: 0.1,
            leg_height: 2.0,
            leg_radius: 0.05,
        }
    }
}

impl Stool {
    /// Centerlines of the two legs: each an arch from floor to floor,
    /// peaking under the seat's center.
    pub fn leg_paths(&self) -> [[Vec3; 5]; 2] {
        let (r, h) = (self.seat_radius, self.leg_height);
        let shoulder = h - self.leg_radius;
        let arch = |axis: Vec3| {
            [
                -axis * r,
                -axis * (r / 1.7) + Vec3::Y * shoulder,
                Vec3::Y * h,
                axis * (r / 1.7) + Vec3::Y * shoulder,
                axis * r,
            ]
        };
        [arch(Vec3::X), arch(Vec3::Z)]
    }
}

impl RoomObject for Stool {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let seat = ctx.material(
            Material::named("stool_seat")
                .with_color(0x262626)
                .with_specular(0x555555, 30.0),
        );
        let leg = ctx.material(
            Material::named("stool_leg")
                .with_color(0x3d3d3d)
                .with_specular(0x555555, 30.0),
        );
        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::new(self.seat_radius, self.seat_thickness, 32)),
            seat,
            Transform::from_position(Vec3::new(0.0, self.leg_height + self.seat_thickness / 2.0, 0.0)),
        );
        for path in self.leg_paths() {
            let curve = catmull_rom(&path, 32);
            ctx.add_part(node, tube_mesh(&curve, self.leg_radius, 8), leg, Transform::default());
        }
        Ok(node)
    }
}

/// Low frame on four legs with a mattress and a pillow at the -X end.
#[derive(Debug, Clone, PartialEq)]
pub struct Bed {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
}

impl Default for Bed {
    fn default() -> Self {
        Self {
            name: "bed".into(),
            position: Vec3::ZERO,
            angle: 0.0,
        }
    }
}

impl Bed {
    pub const FRAME: Vec3 = Vec3::new(5.5, 0.15, 2.3);
    pub const LEG_HEIGHT: f32 = 0.6;
    const LEG_RADIUS: f32 = 0.05;
    const MATTRESS_HEIGHT: f32 = 0.35;
    const PILLOW: Vec3 = Vec3::new(0.7, 0.2, 1.7);

    /// Height of the mattress top above the node.
    pub fn mattress_top(&self) -> f32 {
        Self::LEG_HEIGHT + Self::FRAME.y + Self::MATTRESS_HEIGHT
    }
}

impl RoomObject for Bed {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let frame = ctx.material(Material::named("bed_frame").with_color(0x555555));
        let mattress = ctx.material(Material::named("bed_mattress").with_color(0xeeeeee));
        let pillow = ctx.material(Material::named("bed_pillow").with_color(0xffffff));
        let (f, lh, lr) = (Self::FRAME, Self::LEG_HEIGHT, Self::LEG_RADIUS);

        ctx.add_part(node, box_mesh(f), frame, Transform::from_position(Vec3::new(0.0, lh + f.y / 2.0, 0.0)));
        let leg = cylinder_mesh(CylinderShape::new(lr, lh, 16));
        let (x, z) = (f.x / 2.0 - lr, f.z / 2.0 - lr);
        for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            ctx.add_part(node, leg.clone(), frame, Transform::from_position(Vec3::new(sx * x, lh / 2.0, sz * z)));
        }

        let mattress_size = Vec3::new(f.x - 0.2, Self::MATTRESS_HEIGHT, f.z - 0.1);
        ctx.add_part(
            node,
            box_mesh(mattress_size),
            mattress,
            Transform::from_position(Vec3::new(0.0, lh + f.y + mattress_size.y / 2.0, 0.0)),
        );
        let p = Self::PILLOW;
        ctx.add_part(
            node,
            box_mesh(p),
            pillow,
            Transform::from_position(Vec3::new(
                -mattress_size.x / 2.0 + 0.2 + p.x / 2.0,
                self.mattress_top() + p.y / 2.0,
                0.0,
            )),
        );
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscene_assets::ResourceCache;

    #[test]
    fn table_top_rests_on_legs() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let table = Table::default();
        let node = table.build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(node).count(), 5);

        let bounds = *ctx.volume_of(node).unwrap().bounds().unwrap();
        assert!(bounds.min.y.abs() < 1e-5);
        assert!((bounds.max.y - table.top_height()).abs() < 1e-5);
        assert!((bounds.max.x - 1.75).abs() < 1e-5);
        // Top and legs share the metal texture but not a material.
        assert_eq!(ctx.resources.texture_count(), 1);
        assert_eq!(ctx.resources.material_count(), 2);
    }

    #[test]
    fn plate_is_double_sided_and_tapered() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = Plate::default().build(&mut ctx).unwrap();
        let part = ctx.parts_of(node).next().unwrap();
        assert_eq!(part.mesh.sidedness, Sidedness::Double);

        let bottom = part
            .mesh
            .positions
            .iter()
            .filter(|p| p.y < 0.0)
            .map(|p| (p.x * p.x + p.z * p.z).sqrt())
            .fold(0.0f32, f32::max);
        assert!((bottom - 0.8 / 1.5).abs() < 1e-5);
    }

    #[test]
    fn cake_cut_faces_close_the_gap() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let cake = Cake::default();
        let node = cake.build(&mut ctx).unwrap();
        let parts: Vec<_> = ctx.parts_of(node).collect();
        assert_eq!(parts.len(), 3);

        // Each face's outer edge lands on the rim at its sweep angle.
        for (part, edge) in parts[1..].iter().zip([0.0f32, cake.sweep]) {
            let world = part.world_matrix(&ctx.scene).unwrap();
            let rim = world.transform_point3(Vec3::new(cake.radius / 2.0, 0.0, 0.0));
            let expected = Vec3::new(edge.sin(), 0.0, edge.cos()) * cake.radius;
            assert!(rim.distance(expected) < 1e-5, "{rim} vs {expected}");
            let axis = world.transform_point3(Vec3::new(-cake.radius / 2.0, 0.0, 0.0));
            assert!(axis.length() < 1e-5);
        }
    }

    #[test]
    fn candle_wick_sits_on_wax() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let candle = Candle::default();
        let node = candle.build(&mut ctx).unwrap();
        assert!((candle.height() - 0.22).abs() < 1e-6);

        let bounds = *ctx.volume_of(node).unwrap().bounds().unwrap();
        assert!((bounds.min.y + 0.1).abs() < 1e-5);
        assert!((bounds.max.y - candle.wick_tip().y).abs() < 1e-5);
    }

    #[test]
    fn flame_part_is_particle_cloud() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = Flame::default().build(&mut ctx).unwrap();
        let part = ctx.parts_of(node).next().unwrap();
        assert_eq!(part.mesh.vertex_count(), 100);
        assert!(part.mesh.indices.is_empty());
    }

    #[test]
    fn stool_legs_arch_under_the_seat() {
        let stool = Stool::default();
        for path in stool.leg_paths() {
            assert_eq!(path[0].y, 0.0);
            assert_eq!(path[4].y, 0.0);
            assert_eq!(path[2], Vec3::new(0.0, 2.0, 0.0));
            assert!((path[0].length() - 0.6).abs() < 1e-6);
        }

        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = stool.build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(node).count(), 3);
        let bounds = *ctx.volume_of(node).unwrap().bounds().unwrap();
        assert!((bounds.max.y - 2.1).abs() < 1e-5);
    }

    #[test]
    fn bed_layers_stack_up() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let bed = Bed::default();
        let node = bed.build(&mut ctx).unwrap();
        // Frame, four legs, mattress, pillow.
        assert_eq!(ctx.parts_of(node).count(), 7);
        assert!((bed.mattress_top() - 1.1).abs() < 1e-6);

        let bounds = *ctx.volume_of(node).unwrap().bounds().unwrap();
        assert!(bounds.min.y.abs() < 1e-5);
        assert!((bounds.max.y - 1.3).abs() < 1e-5);
        assert!((bounds.max.x - 2.75).abs() < 1e-5);
        assert!((bounds.max.z - 1.15).abs() < 1e-5);
    }
}

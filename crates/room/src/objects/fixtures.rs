use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec2, Vec3};
use roomscene_assets::Material;
use roomscene_common::{MeshData, NodeId, Sidedness, Transform};

use super::structure::add_frame;
use super::{RoomObject, placed, spawn_object};
use crate::context::{BuildContext, BuildError};
use crate::primitives::{
    CylinderShape, box_mesh, catmull_rom, cylinder_mesh, dome_mesh, holed_slab_mesh, plane_mesh,
    tube_mesh,
};

/// Wall with a barred doorway cut out of its left side.
#[derive(Debug, Clone, PartialEq)]
pub struct JailWall {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
    pub bar_radius: f32,
    pub bar_spacing: f32,
    pub texture: String,
}

impl Default for JailWall {
    fn default() -> Self {
        Self {
            name: "jail wall".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            width: 10.0,
            height: 10.0,
            bar_radius: 0.1,
            bar_spacing: 0.4,
            texture: "textures/wall.jpg".into(),
        }
    }
}

const CASING_WIDTH: f32 = 0.15;
const CASING_THICKNESS: f32 = 0.2;

impl JailWall {
    pub fn door_height(&self) -> f32 {
        self.height / 1.25
    }

    /// Left and right edges of the doorway along the wall's local X.
    pub fn door_span(&self) -> (f32, f32) {
        (-self.width / 2.0 + 1.0, -2.0)
    }

    /// Bars run edge to edge, one every `bar_spacing`.
    pub fn bar_count(&self) -> usize {
        let (left, right) = self.door_span();
        let spacing = self.bar_spacing.abs().max(1e-3);
        ((right - left) / spacing + 1e-4).floor().max(0.0) as usize + 1
    }

    /// One rectangle of the wall with texture coordinates taken from the
    /// whole wall, so the pieces line up.
    fn piece(&self, x: (f32, f32), y: (f32, f32)) -> (MeshData, Vec3) {
        let center = Vec3::new((x.0 + x.1) / 2.0, (y.0 + y.1) / 2.0, 0.0);
        let mut mesh = plane_mesh(x.1 - x.0, y.1 - y.0);
        for (uv, p) in mesh.uvs.iter_mut().zip(&mesh.positions) {
            let local = *p + center;
            *uv = Vec2::new(local.x / self.width + 0.5, local.y / self.height + 0.5);
        }
        (mesh, center)
    }
}

impl RoomObject for JailWall {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let texture = ctx.texture(&self.texture);
        let wall = ctx.material(
            Material::named("jail_wall")
                .with_color(0xffffff)
                .with_specular(0x222222, 10.0)
                .with_texture(texture)
                .double_sided(),
        );
        let metal = ctx.material(Material::named("jail_bars").with_color(0x333333));

        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let (left, right) = self.door_span();
        let door_height = self.door_height();
        let door_top = -hh + door_height;
        for (x, y) in [
            ((-hw, left), (-hh, hh)),
            ((right, hw), (-hh, hh)),
            ((left, right), (door_top, hh)),
        ] {
            let (mesh, center) = self.piece(x, y);
            ctx.add_part(node, mesh.with_sidedness(Sidedness::Double), wall, Transform::from_position(center));
        }

        // Casing on both faces of the wall.
        let r = self.bar_radius;
        let head = box_mesh(Vec3::new(right - left + r, CASING_WIDTH, CASING_THICKNESS));
        let jamb = box_mesh(Vec3::new(CASING_WIDTH, door_height + CASING_WIDTH, CASING_THICKNESS));
        let jamb_y = -(self.height - door_height) / 2.0 + CASING_WIDTH / 2.0;
        for z in [CASING_THICKNESS / 2.0, -CASING_THICKNESS / 2.0] {
            ctx.add_part(
                node,
                head.clone(),
                metal,
                Transform::from_position(Vec3::new((left + right) / 2.0, door_top + CASING_WIDTH / 2.0, z)),
            );
            for x in [
                left - r / 2.0 - CASING_WIDTH / 2.0,
                right + r / 2.0 + CASING_WIDTH / 2.0,
            ] {
                ctx.add_part(node, jamb.clone(), metal, Transform::from_position(Vec3::new(x, jamb_y, z)));
            }
        }

        let bar = cylinder_mesh(CylinderShape::new(r, door_height, 32));
        for i in 0..self.bar_count() {
            let x = left + i as f32 * self.bar_spacing;
            ctx.add_part(
                node,
                bar.clone(),
                metal,
                Transform::from_position(Vec3::new(x, -(self.height - door_height) / 2.0, 0.0)),
            );
        }
        Ok(node)
    }
}

/// Square wash basin with a curved faucet and a drain pipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Sink {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
}

impl Default for Sink {
    fn default() -> Self {
        Self {
            name: "sink".into(),
            position: Vec3::ZERO,
            angle: 0.0,
        }
    }
}

impl Sink {
    pub const BASE_SIZE: f32 = 1.3;
    pub const BASE_HEIGHT: f32 = 0.04;
    pub const BASE_Y: f32 = 0.85;
    pub const BASIN_RADIUS: f32 = 0.6;
    /// Faucet and pipe are raised by this much.
    const PLUMBING_Y: f32 = 0.2;

    const FAUCET: [Vec3; 4] = [
        Vec3::new(0.5, 0.65, 0.4),
        Vec3::new(0.5, 1.2, 0.4),
        Vec3::new(0.35, 1.2, 0.3),
        Vec3::new(0.35, 1.1, 0.3),
    ];
    const PIPE: [Vec3; 3] = [
        Vec3::new(0.0, 0.046, 0.0),
        Vec3::new(-0.1, -0.6, 0.0),
        Vec3::new(0.65, -0.6, 0.0),
    ];
}

impl RoomObject for Sink {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let base = ctx.material(Material::named("sink_base").with_color(0xcccccc).with_specular(0x111111, 100.0));
        let basin = ctx.material(Material::named("sink_basin").with_color(0xffffff).with_specular(0x111111, 100.0));
        let faucet = ctx.material(Material::named("sink_faucet").with_color(0x888888).with_specular(0x111111, 150.0));
        let pipe = ctx.material(Material::named("sink_pipe").with_color(0x555555).with_specular(0x111111, 100.0));

        ctx.add_part(
            node,
            holed_slab_mesh(Self::BASE_SIZE, Self::BASIN_RADIUS, Self::BASE_HEIGHT, 64),
            base,
            Transform::from_position(Vec3::new(0.0, Self::BASE_Y - Self::BASE_HEIGHT / 2.0, 0.0)),
        );

        // Bowls hang from the slab; the inner one is seen from inside.
        let hanging = placed(Vec3::new(0.0, Self::BASE_Y, 0.0), Quat::from_rotation_x(PI));
        ctx.add_part(node, dome_mesh(Self::BASIN_RADIUS * 1.05, 64, 32), basin, hanging);
        ctx.add_part(
            node,
            dome_mesh(Self::BASIN_RADIUS, 64, 32).with_sidedness(Sidedness::Double),
            basin,
            hanging,
        );

        let raised = Transform::from_position(Vec3::new(0.0, Self::PLUMBING_Y, 0.0));
        ctx.add_part(node, tube_mesh(&catmull_rom(&Self::FAUCET, 64), 0.02, 8), faucet, raised);
        ctx.add_part(node, tube_mesh(&catmull_rom(&Self::PIPE, 20), 0.05, 8), pipe, raised);
        Ok(node)
    }
}

/// Node carrying an external glTF model. The model's meshes belong to the
/// rendering backend; the room only requests the file and places the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Toilet {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub model: String,
    pub scale: f32,
}

impl Default for Toilet {
    fn default() -> Self {
        Self {
            name: "toilet".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            model: "models/toilet.glb".into(),
            scale: 2.7,
        }
    }
}

impl RoomObject for Toilet {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let model = ctx.model(&self.model);
        ctx.scene.scale_uniform(node, self.scale)?;
        tracing::debug!(name = %self.name, %model, "model attached");
        Ok(node)
    }
}

/// Framed tinted glass with a decal in front of it. Nothing is reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub inner_width: f32,
    pub inner_height: f32,
    pub frame_width: f32,
    pub frame_thickness: f32,
    pub decal: String,
}

impl Default for Mirror {
    fn default() -> Self {
        Self {
            name: "mirror".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            inner_width: 2.0,
            inner_height: 1.0,
            frame_width: 0.1,
            frame_thickness: 0.05,
            decal: "textures/mirror_decal.png".into(),
        }
    }
}

impl RoomObject for Mirror {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let (iw, ih, ft) = (self.inner_width, self.inner_height, self.frame_thickness);
        let frame = ctx.material(Material::named("mirror_frame").with_color(0x333333).with_specular(0x222222, 100.0));
        add_frame(ctx, node, Vec2::new(iw, ih), self.frame_width, ft, frame);

        let glass = ctx.material(Material::named("mirror_glass").with_color(0xc1cbcb).with_specular(0xffffff, 100.0));
        ctx.add_part(
            node,
            plane_mesh(iw, ih),
            glass,
            Transform::from_position(Vec3::new(0.0, 0.0, ft / 2.0 + 0.001)),
        );
        let texture = ctx.texture(&self.decal);
        let decal = ctx.material(Material::named("mirror_decal").with_color(0xffffff).with_texture(texture));
        ctx.add_part(
            node,
            plane_mesh(iw * 0.8, ih * 0.8),
            decal,
            Transform::from_position(Vec3::new(0.0, 0.0, ft / 2.0 + 0.01)),
        );
        Ok(node)
    }
}

/// Box housing with a glowing panel underneath, hung from its node.
#[derive(Debug, Clone, PartialEq)]
pub struct CeilingLight {
    pub name: String,
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl Default for CeilingLight {
    fn default() -> Self {
        Self {
            name: "ceiling light".into(),
            position: Vec3::ZERO,
            width: 2.0,
            height: 0.3,
            length: 2.0,
        }
    }
}

impl CeilingLight {
    /// Where the fixture's point light sits: at the housing's underside.
    pub fn light_position(&self) -> Vec3 {
        self.position - Vec3::new(0.0, self.height, 0.0)
    }
}

impl RoomObject for CeilingLight {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let (w, h, l) = (self.width, self.height, self.length);
        let housing = ctx.material(Material::named("light_housing").with_color(0x333333));
        let panel = ctx.material(Material::named("light_panel").with_color(0xffffff));
        ctx.add_part(
            node,
            box_mesh(Vec3::new(w, h, l)),
            housing,
            Transform::from_position(Vec3::new(0.0, -h / 2.0, 0.0)),
        );
        ctx.add_part(
            node,
            box_mesh(Vec3::new(w * 0.85, l * 0.85, h * 0.3)),
            panel,
            placed(Vec3::new(0.0, -h - h * 0.1, 0.0), Quat::from_rotation_x(-FRAC_PI_2)),
        );
        Ok(node)
    }
}

/// Wall-mounted spotlight: base plate, curved arm and a head aimed at
/// `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spotlight {
    pub name: String,
    pub position: Vec3,
    /// World point the head faces.
    pub target: Vec3,
}

impl Default for Spotlight {
    fn default() -> Self {
        Self {
            name: "spotlight".into(),
            position: Vec3::ZERO,
            target: Vec3::new(5.0, 0.0, 5.0),
        }
    }
}

impl Spotlight {
    /// Head position relative to the mount.
    pub const HEAD: Vec3 = Vec3::new(0.0, 1.0, 1.0);

    pub fn head_position(&self) -> Vec3 {
        self.position + Self::HEAD
    }

    /// Turns the head's +Y axis toward the target.
    pub fn head_rotation(&self) -> Quat {
        (self.target - self.head_position())
            .try_normalize()
            .map_or(Quat::IDENTITY, |dir| Quat::from_rotation_arc(Vec3::Y, dir))
    }
}

impl RoomObject for Spotlight {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let base = ctx.material(Material::named("spotlight_base").with_color(0x333333));
        let arm = ctx.material(Material::named("spotlight_arm").with_color(0xaaaaaa));
        let casing = ctx.material(Material::named("spotlight_casing").with_color(0x333333).double_sided());
        let lens = ctx.material(Material::named("spotlight_lens").with_color(0xffff00));

        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::new(0.2, 0.1, 32)),
            base,
            placed(Vec3::new(0.0, 0.0, 0.1), Quat::from_rotation_x(-FRAC_PI_2)),
        );
        let arm_path = [Vec3::new(0.0, 0.0, 0.1), Vec3::new(0.0, 0.6, 0.4), Self::HEAD];
        ctx.add_part(node, tube_mesh(&catmull_rom(&arm_path, 20), 0.04, 8), arm, Transform::default());

        let turn = self.head_rotation();
        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::new(0.14, 0.7, 32)).with_sidedness(Sidedness::Double),
            casing,
            placed(Self::HEAD, turn),
        );
        ctx.add_part(
            node,
            cylinder_mesh(CylinderShape::new(0.1, 0.4, 8)),
            lens,
            placed(Self::HEAD + turn * Vec3::new(0.0, 0.2, 0.0), turn),
        );
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

    fn room_jail_wall() -> JailWall {
        JailWall {
            width: 15.0,
            bar_radius: 0.05,
            bar_spacing: 0.3,
            ..JailWall::default()
        }
    }

    #[test]
    fn jail_wall_doorway_is_barred() {
        let wall = room_jail_wall();
        assert_eq!(wall.door_span(), (-6.5, -2.0));
        assert_eq!(wall.bar_count(), 16);

        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = wall.build(&mut ctx).unwrap();
        // Three wall pieces, six casing boxes, sixteen bars.
        assert_eq!(ctx.parts_of(node).count(), 3 + 6 + 16);

        let b = bounds(&ctx, node);
        assert!((b.min.x + 7.5).abs() < 1e-4 && (b.max.x - 7.5).abs() < 1e-4);
        assert!((b.min.y + 5.0).abs() < 1e-4 && (b.max.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn jail_wall_texture_is_continuous() {
        let wall = room_jail_wall();
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = wall.build(&mut ctx).unwrap();
        for part in ctx.parts_of(node).take(3) {
            for (p, uv) in part.mesh.positions.iter().zip(&part.mesh.uvs) {
                let local = *p + part.offset.position;
                assert!((uv.x - (local.x / 15.0 + 0.5)).abs() < 1e-5);
                assert!((uv.y - (local.y / 10.0 + 0.5)).abs() < 1e-5);
            }
        }
        // The top piece starts at the door's top edge.
        let top = ctx.parts_of(node).nth(2).unwrap();
        let lowest = top.mesh.positions.iter().map(|p| p.y + top.offset.position.y).fold(f32::MAX, f32::min);
        assert!((lowest - 3.0).abs() < 1e-5);
    }

    #[test]
    fn sink_bowl_hangs_below_the_slab() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = Sink::default().build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(node).count(), 5);

        let outer = ctx.parts_of(node).nth(1).unwrap();
        let world = outer.world_matrix(&ctx.scene).unwrap();
        let lowest = outer.mesh.positions.iter().map(|p| world.transform_point3(*p).y).fold(f32::MAX, f32::min);
        assert!((lowest - (0.85 - 0.63)).abs() < 1e-4);
        assert_eq!(ctx.parts_of(node).nth(2).unwrap().mesh.sidedness, Sidedness::Double);

        let slab = ctx.parts_of(node).next().unwrap();
        let widest = slab.mesh.positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((widest - 0.65).abs() < 1e-5);
    }

    #[test]
    fn toilet_requests_its_model_and_scales() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = Toilet::default().build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(node).count(), 0);
        assert_eq!(ctx.scene.transform(node).unwrap().scale, Vec3::splat(2.7));
        assert_eq!(ctx.resources.model_count(), 1);
    }

    #[test]
    fn mirror_glass_sits_inside_its_frame() {
        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = Mirror {
            inner_width: 1.5,
            inner_height: 2.5,
            ..Mirror::default()
        }
        .build(&mut ctx)
        .unwrap();
        // Four frame boxes, glass, decal.
        assert_eq!(ctx.parts_of(node).count(), 6);
        let b = bounds(&ctx, node);
        assert!((b.max.x - 0.85).abs() < 1e-5);
        assert!((b.max.y - 1.35).abs() < 1e-5);
        assert_eq!(ctx.resources.texture_count(), 1);
    }

    #[test]
    fn ceiling_light_hangs_below_its_mount() {
        let light = CeilingLight {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..CeilingLight::default()
        };
        assert_eq!(light.light_position(), Vec3::new(0.0, 9.7, 0.0));

        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = light.build(&mut ctx).unwrap();
        let b = bounds(&ctx, node);
        assert!((b.max.y - 10.0).abs() < 1e-5);
        // Panel thickness 0.09 centered 0.33 below the mount.
        assert!((b.min.y - (10.0 - 0.375)).abs() < 1e-5);
        assert!((b.max.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn spotlight_head_faces_its_target() {
        let spot = Spotlight {
            position: Vec3::new(5.65, 7.0, -7.54),
            ..Spotlight::default()
        };
        assert!(spot.head_position().distance(Vec3::new(5.65, 8.0, -6.54)) < 1e-5);
        let facing = spot.head_rotation() * Vec3::Y;
        let expected = (spot.target - spot.head_position()).normalize();
        assert!(facing.distance(expected) < 1e-5);

        let mut resources = ResourceCache::new();
        let mut ctx = BuildContext::new(&mut resources);
        let node = spot.build(&mut ctx).unwrap();
        assert_eq!(ctx.parts_of(node).count(), 4);
        let lens = ctx.parts_of(node).nth(3).unwrap();
        assert!(lens.offset.position.distance(Spotlight::HEAD + expected * 0.2) < 1e-5);
    }
}

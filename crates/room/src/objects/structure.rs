use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use roomscene_assets::{Material, MaterialId};
use roomscene_common::{NodeId, Transform};

use super::{RoomObject, placed, spawn_object};
use crate::context::{BuildContext, BuildError};
use crate::primitives::{box_mesh, plane_mesh};

/// Horizontal textured plane. Faces up, or down when used as a ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub name: String,
    pub position: Vec3,
    pub width: f32,
    pub length: f32,
    pub facing_down: bool,
    pub texture: String,
}

impl Default for Floor {
    fn default() -> Self {
        Self {
            name: "floor".into(),
            position: Vec3::ZERO,
            width: 10.0,
            length: 10.0,
            facing_down: false,
            texture: "textures/floor.jpg".into(),
        }
    }
}

impl Floor {
    pub fn ceiling(position: Vec3, width: f32, length: f32) -> Self {
        Self {
            name: "ceiling".into(),
            position,
            width,
            length,
            facing_down: true,
            ..Self::default()
        }
    }
}

impl RoomObject for Floor {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let tilt = if self.facing_down { FRAC_PI_2 } else { -FRAC_PI_2 };
        ctx.scene.rotate(node, Vec3::X, tilt)?;

        let texture = ctx.texture(&self.texture);
        let material = ctx.material(
            Material::named(&self.name)
                .with_color(0xffffff)
                .with_specular(0x555555, 60.0)
                .with_texture(texture),
        );
        ctx.add_part(node, plane_mesh(self.width, self.length), material, Transform::default());
        Ok(node)
    }
}

/// Vertical textured plane, centered on its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub name: String,
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    /// Turn about +Y. Zero faces +Z.
    pub angle: f32,
    pub texture: String,
}

impl Default for Wall {
    fn default() -> Self {
        Self {
            name: "wall".into(),
            position: Vec3::ZERO,
            width: 10.0,
            height: 10.0,
            angle: 0.0,
            texture: "textures/wall.jpg".into(),
        }
    }
}

impl RoomObject for Wall {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let texture = ctx.texture(&self.texture);
        let material = ctx.material(
            Material::named("wall")
                .with_color(0xffffff)
                .with_specular(0x000000, 0.0)
                .with_texture(texture),
        );
        ctx.add_part(node, plane_mesh(self.width, self.height), material, Transform::default());
        Ok(node)
    }
}

/// Framed picture hung flat against a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Painting {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub inner_width: f32,
    pub inner_height: f32,
    pub frame_width: f32,
    pub frame_thickness: f32,
    pub image: String,
}

impl Default for Painting {
    fn default() -> Self {
        Self {
            name: "painting".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            inner_width: 2.0,
            inner_height: 1.0,
            frame_width: 0.1,
            frame_thickness: 0.05,
            image: "textures/painting.jpg".into(),
        }
    }
}

impl RoomObject for Painting {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let (iw, ih) = (self.inner_width, self.inner_height);
        let wood = ctx.texture("textures/wood_frame.jpg");
        let frame = ctx.material(
            Material::named("painting_frame")
                .with_color(0x8b4513)
                .with_specular(0x222222, 30.0)
                .with_texture(wood),
        );
        add_frame(ctx, node, Vec2::new(iw, ih), self.frame_width, self.frame_thickness, frame);

        let image = ctx.texture(&self.image);
        let canvas = ctx.material(
            Material::named("painting_canvas")
                .with_color(0xffffff)
                .with_specular(0x222222, 1.0)
                .with_texture(image),
        );
        ctx.add_part(
            node,
            plane_mesh(iw, ih),
            canvas,
            Transform::from_position(Vec3::new(0.0, 0.0, 0.001)),
        );
        Ok(node)
    }
}

/// Four boxes around an `inner` sized opening, just proud of the node's
/// XY plane.
pub(super) fn add_frame(
    ctx: &mut BuildContext<'_>,
    node: NodeId,
    inner: Vec2,
    width: f32,
    thickness: f32,
    material: MaterialId,
) {
    let z = thickness / 2.0 + 0.0011;
    let rail = box_mesh(Vec3::new(inner.x, width, thickness));
    for y in [inner.y / 2.0 + width / 2.0, -(inner.y / 2.0 + width / 2.0)] {
        ctx.add_part(node, rail.clone(), material, Transform::from_position(Vec3::new(0.0, y, z)));
    }
    let stile = box_mesh(Vec3::new(inner.y + 2.0 * width, width, thickness));
    for x in [inner.x / 2.0 + width / 2.0, -(inner.x / 2.0 + width / 2.0)] {
        ctx.add_part(
            node,
            stile.clone(),
            material,
            placed(Vec3::new(x, 0.0, z), Quat::from_rotation_z(FRAC_PI_2)),
        );
    }
}

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use roomscene_assets::Material;
use roomscene_common::{NodeId, Transform};
use roomscene_surface::{ControlPointGrid, DEFAULT_SAMPLES, SurfaceSpec};

use super::{RoomObject, placed, spawn_object};
use crate::context::{BuildContext, BuildError};

/// Draped cloth: one double-sided surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Blanket {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    /// Extra turn about +X after placement.
    pub tilt: f32,
    pub samples: usize,
}

impl Default for Blanket {
    fn default() -> Self {
        Self {
            name: "blanket".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            tilt: 0.0,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Blanket {
    pub fn control_points() -> Vec<Vec<[f32; 3]>> {
        [-1.8, -1.0, 2.9, 2.2]
            .into_iter()
            .enumerate()
            .map(|(i, x)| {
                // Inner rows hang slightly further out.
                let z = if i == 0 || i == 3 { 1.4 } else { 1.6 };
                vec![[x, -2.1, z], [x, -3.0, 0.6], [x, 0.35, 0.8]]
            })
            .collect()
    }
}

impl RoomObject for Blanket {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let grid = ControlPointGrid::from_points(&Self::control_points())?;
        let mesh = SurfaceSpec::new(grid, 3, 2)
            .samples(self.samples, self.samples)
            .double_sided()
            .build()?;

        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        ctx.scene.rotate(node, Vec3::X, self.tilt)?;
        let texture = ctx.texture("textures/blanket.jpg");
        let material = ctx.material(
            Material::named("blanket")
                .with_color(0xffffff)
                .with_specular(0xdddddd, 30.0)
                .with_texture(texture)
                .double_sided(),
        );
        ctx.add_part(node, mesh, material, Transform::default());
        Ok(node)
    }
}

/// Two folded sheets lying side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Newspaper {
    pub name: String,
    pub position: Vec3,
    pub angle: f32,
    pub samples: usize,
}

impl Default for Newspaper {
    fn default() -> Self {
        Self {
            name: "newspaper".into(),
            position: Vec3::ZERO,
            angle: 0.0,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Newspaper {
    /// Gap between the two sheets along local X.
    pub const SHEET_OFFSET: f32 = 0.4;

    pub fn control_points() -> Vec<Vec<[f32; 4]>> {
        vec![
            vec![[-0.2, -0.3, 0.0, 1.0], [-0.2, 0.3, 0.0, 1.0]],
            vec![[0.0, -0.3, 0.2, 1.0], [0.0, 0.3, 0.2, 1.3]],
            vec![[0.2, -0.3, 0.0, 1.0], [0.2, 0.3, 0.0, 1.0]],
        ]
    }
}

impl RoomObject for Newspaper {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let grid = ControlPointGrid::from_weighted(&Self::control_points())?;
        let mesh = SurfaceSpec::new(grid, 2, 1)
            .samples(self.samples, self.samples)
            .double_sided()
            .build()?;

        let node = spawn_object(ctx, &self.name, self.position, self.angle)?;
        let pages = ["textures/newspaper.jpg", "textures/newspaper1.jpg"];
        for (i, page) in pages.into_iter().enumerate() {
            let texture = ctx.texture(page);
            let material = ctx.material(
                Material::named("newspaper")
                    .with_color(0xffffff)
                    .with_specular(0xffffff, 30.0)
                    .with_texture(texture)
                    .double_sided(),
            );
            let offset = Vec3::new(Self::SHEET_OFFSET * i as f32, 0.0, 0.0);
            ctx.add_part(
                node,
                mesh.clone(),
                material,
                placed(offset, Quat::from_rotation_x(-FRAC_PI_2)),
            );
        }
        Ok(node)
    }
}

/// Vase made of two mirrored surface halves. The node sits at its base.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowerJar {
    pub name: String,
    pub position: Vec3,
    pub body_height: f32,
    pub body_min_width: f32,
    pub body_max_width: f32,
    pub head_height: f32,
    pub head_min_width: f32,
    pub mouth_width: f32,
    pub samples: usize,
}

impl Default for FlowerJar {
    fn default() -> Self {
        Self {
            name: "flower jar".into(),
            position: Vec3::ZERO,
            body_height: 1.0,
            body_min_width: 0.1667,
            body_max_width: 0.3333,
            head_height: 0.5,
            head_min_width: 0.1,
            mouth_width: 0.1667,
            samples: 20,
        }
    }
}

impl FlowerJar {
    pub fn height(&self) -> f32 {
        self.body_height + self.head_height
    }

    /// Half-width of each control row, bottom to top, with its height.
    fn profile(&self) -> [(f32, f32); 5] {
        let h = self.body_height;
        [
            (self.body_min_width, 0.0),
            (self.body_max_width, h / 3.0),
            ((self.body_max_width + self.body_min_width) / 2.0, 2.0 * h / 3.0),
            (self.head_min_width, h),
            (self.mouth_width, self.height()),
        ]
    }

    /// Control points of one half. The other half is this one turned half
    /// a revolution about +Y.
    pub fn half_control_points(&self, mirrored: bool) -> Vec<Vec<[f32; 3]>> {
        let s = if mirrored { -1.0 } else { 1.0 };
        self.profile()
            .into_iter()
            .map(|(w, y)| {
                let (x, z) = (s * w, s * -w);
                vec![[-x, y, 0.0], [-x, y, z], [x, y, z], [x, y, 0.0]]
            })
            .collect()
    }
}

impl RoomObject for FlowerJar {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError> {
        let mut halves = Vec::with_capacity(2);
        for mirrored in [false, true] {
            let grid = ControlPointGrid::from_points(&self.half_control_points(mirrored))?;
            halves.push(
                SurfaceSpec::new(grid, 3, 3)
                    .samples(self.samples, self.samples)
                    .double_sided()
                    .build()?,
            );
        }

        let node = spawn_object(ctx, &self.name, self.position, 0.0)?;
        let material = ctx.material(Material::named("flower_jar").with_color(0x8b4513).double_sided());
        for mesh in halves {
            ctx.add_part(node, mesh, material, Transform::default());
        }
        Ok(node)
    }
}

use std::fmt::Write as _;

use glam::{Mat4, Vec3};
use roomscene_assets::MaterialId;
use roomscene_common::{MeshData, Sidedness};
use serde::{Deserialize, Serialize};

use crate::Light;

/// Opaque id of a mesh uploaded to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawableHandle(pub u32);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown drawable {0:?}")]
    UnknownDrawable(DrawableHandle),
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The scene uploads each mesh once, then pushes world matrices every frame.
pub trait Renderer {
    /// The output type produced by one frame.
    type Output;

    fn create_mesh(&mut self, mesh: &MeshData, material: MaterialId) -> DrawableHandle;

    /// Replace the geometry of an existing drawable.
    fn update_mesh(&mut self, handle: DrawableHandle, mesh: &MeshData) -> Result<(), RenderError>;

    fn set_world_transform(&mut self, handle: DrawableHandle, world: Mat4) -> Result<(), RenderError>;

    fn set_lights(&mut self, lights: &[Light]);

    /// Draw everything with the given world-to-camera matrix.
    fn render_frame(&mut self, view: Mat4, projection: &Projection) -> Self::Output;
}

#[derive(Debug, Clone)]
struct TextDrawable {
    vertices: usize,
    triangles: usize,
    sidedness: Sidedness,
    material: MaterialId,
    world: Mat4,
}

/// Debug text renderer.
///
/// Produces a human-readable summary of what a GPU backend would draw.
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    drawables: Vec<TextDrawable>,
    lights: Vec<Light>,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    pub fn world_transform(&self, handle: DrawableHandle) -> Option<Mat4> {
        self.drawables.get(handle.0 as usize).map(|d| d.world)
    }

    fn drawable_mut(&mut self, handle: DrawableHandle) -> Result<&mut TextDrawable, RenderError> {
        self.drawables
            .get_mut(handle.0 as usize)
            .ok_or(RenderError::UnknownDrawable(handle))
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn create_mesh(&mut self, mesh: &MeshData, material: MaterialId) -> DrawableHandle {
        let handle = DrawableHandle(self.drawables.len() as u32);
        self.drawables.push(TextDrawable {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            sidedness: mesh.sidedness,
            material,
            world: Mat4::IDENTITY,
        });
        tracing::debug!(
            handle = handle.0,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "drawable created"
        );
        handle
    }

    fn update_mesh(&mut self, handle: DrawableHandle, mesh: &MeshData) -> Result<(), RenderError> {
        let drawable = self.drawable_mut(handle)?;
        drawable.vertices = mesh.vertex_count();
        drawable.triangles = mesh.triangle_count();
        drawable.sidedness = mesh.sidedness;
        Ok(())
    }

    fn set_world_transform(&mut self, handle: DrawableHandle, world: Mat4) -> Result<(), RenderError> {
        self.drawable_mut(handle)?.world = world;
        Ok(())
    }

    fn set_lights(&mut self, lights: &[Light]) {
        tracing::debug!(count = lights.len(), "lights replaced");
        self.lights = lights.to_vec();
    }

    fn render_frame(&mut self, view: Mat4, projection: &Projection) -> String {
        self.frames += 1;
        let eye = view.inverse().transform_point3(Vec3::ZERO);
        let triangles: usize = self.drawables.iter().map(|d| d.triangles).sum();
        tracing::debug!(
            frame = self.frames,
            drawables = self.drawables.len(),
            triangles,
            "frame rendered"
        );

        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ===", self.frames);
        let _ = writeln!(
            out,
            "Drawables: {} ({} triangles), Lights: {}",
            self.drawables.len(),
            triangles,
            self.lights.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) fov={:.0}",
            eye.x, eye.y, eye.z, projection.fov_y_degrees
        );
        for (i, d) in self.drawables.iter().enumerate() {
            let p = d.world.transform_point3(Vec3::ZERO);
            let sides = match d.sidedness {
                Sidedness::Front => "front",
                Sidedness::Double => "double",
            };
            let _ = writeln!(
                out,
                "  [{i}] pos=({:.2}, {:.2}, {:.2}) verts={} tris={} {sides} {}",
                p.x, p.y, p.z, d.vertices, d.triangles, d.material
            );
        }
        for light in &self.lights {
            let _ = writeln!(out, "  light {} intensity={:.2}", light.kind(), light.intensity());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            sidedness: Sidedness::Front,
        }
    }

    #[test]
    fn debug_renderer_empty_frame() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render_frame(Mat4::IDENTITY, &Projection::default());
        assert!(output.contains("Frame 1"));
        assert!(output.contains("Drawables: 0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_lists_drawables() {
        let mut renderer = DebugTextRenderer::new();
        let h = renderer.create_mesh(&triangle(), MaterialId(7));
        renderer
            .set_world_transform(h, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        renderer.set_lights(&[Light::Ambient {
            color: [0.33; 3],
            intensity: 1.0,
        }]);
        let view = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)).inverse();
        let output = renderer.render_frame(view, &Projection::default());

        assert!(output.contains("Drawables: 1 (1 triangles), Lights: 1"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("eye=(0.00, 5.00, 0.00)"));
        assert!(output.contains("light ambient"));
    }

    #[test]
    fn update_mesh_replaces_counts() {
        let mut renderer = DebugTextRenderer::new();
        let h = renderer.create_mesh(&MeshData::new(), MaterialId(1));
        renderer
            .update_mesh(h, &triangle().with_sidedness(Sidedness::Double))
            .unwrap();
        let output = renderer.render_frame(Mat4::IDENTITY, &Projection::default());
        assert!(output.contains("verts=3 tris=1 double"));
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let mut renderer = DebugTextRenderer::new();
        assert!(matches!(
            renderer.set_world_transform(DrawableHandle(3), Mat4::IDENTITY),
            Err(RenderError::UnknownDrawable(DrawableHandle(3)))
        ));
        assert!(renderer.update_mesh(DrawableHandle(0), &triangle()).is_err());
    }

    #[test]
    fn projection_default_matches_room_camera() {
        let projection = Projection::default();
        assert_eq!(projection.fov_y_degrees, 75.0);
        assert_eq!(projection.near, 0.1);
        assert_eq!(projection.far, 2000.0);
        assert!(projection.matrix().is_finite());
    }
}

use glam::{Vec2, Vec3, Vec4};
use roomscene_common::{MeshData, Sidedness};
use serde::{Deserialize, Serialize};

use crate::SurfaceError;
use crate::grid::ControlPointGrid;
use crate::knots::{basis_functions, find_span, knot_vector};

/// Samples per axis used when a caller does not choose.
pub const DEFAULT_SAMPLES: usize = 10;

/// A rational B-spline surface bound to its clamped knot vectors.
struct NurbsSurface<'a> {
    grid: &'a ControlPointGrid,
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f32>,
    knots_v: Vec<f32>,
}

impl<'a> NurbsSurface<'a> {
    fn new(
        grid: &'a ControlPointGrid,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self, SurfaceError> {
        Ok(Self {
            grid,
            degree_u,
            degree_v,
            knots_u: knot_vector(grid.rows(), degree_u)?,
            knots_v: knot_vector(grid.cols(), degree_v)?,
        })
    }

    /// Surface point at `(u, v)` in [0, 1]^2.
    fn point_at(&self, u: f32, v: f32) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let span_u = find_span(self.grid.rows() - 1, self.degree_u, u, &self.knots_u);
        let span_v = find_span(self.grid.cols() - 1, self.degree_v, v, &self.knots_v);
        let nu = basis_functions(span_u, u, self.degree_u, &self.knots_u);
        let nv = basis_functions(span_v, v, self.degree_v, &self.knots_v);

        let mut sum = Vec4::ZERO;
        for (k, bu) in nu.iter().enumerate() {
            let row = span_u - self.degree_u + k;
            for (l, bv) in nv.iter().enumerate() {
                let col = span_v - self.degree_v + l;
                sum += self.grid.homogeneous(row, col) * (bu * bv);
            }
        }
        // Weights are validated positive, so w is too.
        sum.truncate() / sum.w
    }
}

/// Evaluate a single surface point.
pub fn evaluate(
    grid: &ControlPointGrid,
    degree_u: usize,
    degree_v: usize,
    u: f32,
    v: f32,
) -> Result<Vec3, SurfaceError> {
    Ok(NurbsSurface::new(grid, degree_u, degree_v)?.point_at(u, v))
}

/// Tessellate the surface on a regular `samples_u x samples_v` parameter grid.
///
/// Vertex `i * samples_v + j` sits at `u = i / (samples_u - 1)`,
/// `v = j / (samples_v - 1)` and carries that `(u, v)` as its texture
/// coordinate. Each grid cell becomes two triangles.
pub fn build_surface(
    grid: &ControlPointGrid,
    degree_u: usize,
    degree_v: usize,
    samples_u: usize,
    samples_v: usize,
) -> Result<MeshData, SurfaceError> {
    if samples_u < 2 || samples_v < 2 {
        return Err(SurfaceError::InvalidSurfaceParameters(format!(
            "need at least 2 samples per axis, got {samples_u}x{samples_v}"
        )));
    }
    let surface = NurbsSurface::new(grid, degree_u, degree_v)?;

    let mut mesh = MeshData::new();
    mesh.positions.reserve(samples_u * samples_v);
    mesh.uvs.reserve(samples_u * samples_v);
    for i in 0..samples_u {
        let u = i as f32 / (samples_u - 1) as f32;
        for j in 0..samples_v {
            let v = j as f32 / (samples_v - 1) as f32;
            mesh.positions.push(surface.point_at(u, v));
            mesh.uvs.push(Vec2::new(u, v));
        }
    }

    let stride = samples_v as u32;
    for i in 0..samples_u as u32 - 1 {
        for j in 0..stride - 1 {
            let a = i * stride + j;
            let b = a + 1;
            let d = a + stride;
            let c = d + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh.recompute_normals();

    tracing::debug!(
        rows = grid.rows(),
        cols = grid.cols(),
        degree_u,
        degree_v,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "tessellated surface"
    );
    Ok(mesh)
}

/// Same evaluation as [`build_surface`], tagged to be drawn from both sides.
pub fn build_double_sided_surface(
    grid: &ControlPointGrid,
    degree_u: usize,
    degree_v: usize,
    samples_u: usize,
    samples_v: usize,
) -> Result<MeshData, SurfaceError> {
    build_surface(grid, degree_u, degree_v, samples_u, samples_v)
        .map(|mesh| mesh.with_sidedness(Sidedness::Double))
}

/// Everything needed to build one surface mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub grid: ControlPointGrid,
    pub degree_u: usize,
    pub degree_v: usize,
    pub samples_u: usize,
    pub samples_v: usize,
    pub double_sided: bool,
}

impl SurfaceSpec {
    pub fn new(grid: ControlPointGrid, degree_u: usize, degree_v: usize) -> Self {
        Self {
            grid,
            degree_u,
            degree_v,
            samples_u: DEFAULT_SAMPLES,
            samples_v: DEFAULT_SAMPLES,
            double_sided: false,
        }
    }

    pub fn samples(mut self, samples_u: usize, samples_v: usize) -> Self {
        self.samples_u = samples_u;
        self.samples_v = samples_v;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn build(&self) -> Result<MeshData, SurfaceError> {
        let mesh = build_surface(
            &self.grid,
            self.degree_u,
            self.degree_v,
            self.samples_u,
            self.samples_v,
        )?;
        Ok(if self.double_sided {
            mesh.with_sidedness(Sidedness::Double)
        } else {
            mesh
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_quad() -> ControlPointGrid {
        ControlPointGrid::from_weighted(&[
            vec![[-1.0, 0.0, 0.0, 1.0], [-1.0, 1.0, 0.0, 1.0]],
            vec![[1.0, 0.0, 0.0, 1.0], [1.0, 1.0, 0.0, 1.0]],
        ])
        .unwrap()
    }

    fn blanket() -> ControlPointGrid {
        ControlPointGrid::from_points(&[
            vec![[-1.8, -2.1, 1.4], [-1.8, -3.0, 0.6], [-1.8, 0.35, 0.8]],
            vec![[-1.0, -2.1, 1.6], [-1.0, -3.0, 0.6], [-1.0, 0.35, 0.8]],
            vec![[2.9, -2.1, 1.6], [2.9, -3.0, 0.6], [2.9, 0.35, 0.8]],
            vec![[2.2, -2.1, 1.4], [2.2, -3.0, 0.6], [2.2, 0.35, 0.8]],
        ])
        .unwrap()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn bilinear_patch_reproduces_its_corners() {
        let mesh = build_surface(&flat_quad(), 1, 1, 2, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(
            mesh.positions,
            vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]
        );
        assert_eq!(
            mesh.uvs,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ]
        );
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(mesh.sidedness, Sidedness::Front);
    }

    #[test]
    fn corner_parameter_hits_corner_control_point() {
        let grid = blanket();
        let p = evaluate(&grid, 3, 2, 0.0, 0.0).unwrap();
        assert!(approx(p, Vec3::new(-1.8, -2.1, 1.4)));
        let q = evaluate(&grid, 3, 2, 1.0, 1.0).unwrap();
        assert!(approx(q, Vec3::new(2.2, 0.35, 0.8)));
    }

    #[test]
    fn weight_pulls_surface_toward_point() {
        let rows = |w: f32| {
            vec![
                vec![[-0.2, -0.3, 0.0, 1.0], [-0.2, 0.3, 0.0, 1.0]],
                vec![[0.0, -0.3, 0.2, 1.0], [0.0, 0.3, 0.2, w]],
                vec![[0.2, -0.3, 0.0, 1.0], [0.2, 0.3, 0.0, 1.0]],
            ]
        };
        let even = ControlPointGrid::from_weighted(&rows(1.0)).unwrap();
        let heavy = ControlPointGrid::from_weighted(&rows(3.0)).unwrap();
        let z_even = evaluate(&even, 2, 1, 0.5, 1.0).unwrap().z;
        let z_heavy = evaluate(&heavy, 2, 1, 0.5, 1.0).unwrap().z;
        assert!(z_heavy > z_even);
        assert!(z_heavy < 0.2);
    }

    #[test]
    fn uniform_weights_match_unit_weights() {
        let unit = blanket();
        let doubled = ControlPointGrid::new(
            (0..unit.rows())
                .map(|r| {
                    (0..unit.cols())
                        .map(|c| unit.get(r, c).truncate().extend(2.0))
                        .collect()
                })
                .collect(),
        )
        .unwrap();
        for (u, v) in [(0.3, 0.7), (0.5, 0.5), (0.9, 0.1)] {
            let a = evaluate(&unit, 3, 2, u, v).unwrap();
            let b = evaluate(&doubled, 3, 2, u, v).unwrap();
            assert!(approx(a, b));
        }
    }

    #[test]
    fn mesh_layout_matches_sample_grid() {
        let mesh = build_surface(&blanket(), 3, 2, 10, 7).unwrap();
        assert_eq!(mesh.vertex_count(), 70);
        assert_eq!(mesh.triangle_count(), 9 * 6 * 2);
        assert_eq!(mesh.normals.len(), 70);
        assert!(mesh.indices.iter().all(|i| (*i as usize) < 70));
        assert_eq!(mesh.uvs[7], Vec2::new(1.0 / 9.0, 0.0));
    }

    #[test]
    fn double_sided_only_changes_sidedness() {
        let single = build_surface(&blanket(), 3, 2, 10, 10).unwrap();
        let double = build_double_sided_surface(&blanket(), 3, 2, 10, 10).unwrap();
        assert_eq!(double.sidedness, Sidedness::Double);
        assert_eq!(single.positions, double.positions);
        assert_eq!(single.indices, double.indices);
    }

    #[test]
    fn degenerate_parameters_fail() {
        let grid = flat_quad();
        assert!(matches!(
            build_surface(&grid, 2, 1, 4, 4),
            Err(SurfaceError::InvalidSurfaceParameters(_))
        ));
        assert!(build_surface(&grid, 1, 2, 4, 4).is_err());
        assert!(build_surface(&grid, 1, 1, 1, 4).is_err());
        assert!(evaluate(&grid, 5, 0, 0.0, 0.0).is_err());
    }

    #[test]
    fn spec_defaults_and_build() {
        let spec = SurfaceSpec::new(blanket(), 3, 2).double_sided();
        assert_eq!(spec.samples_u, DEFAULT_SAMPLES);
        let mesh = spec.build().unwrap();
        assert_eq!(mesh.vertex_count(), 100);
        assert_eq!(mesh.sidedness, Sidedness::Double);

        let coarse = SurfaceSpec::new(flat_quad(), 1, 1).samples(3, 3).build().unwrap();
        assert_eq!(coarse.vertex_count(), 9);
        assert!(approx(coarse.positions[4], Vec3::new(0.0, 0.5, 0.0)));
    }
}

//! Primitive shape generation. Every shape carries per-vertex normals and
//! texture coordinates and is centered on its local origin.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use roomscene_common::MeshData;

/// Append one flat quad facing `normal`. `u` and `v` are half-edge vectors
/// with `u × v` pointing along `normal`.
fn push_quad(mesh: &mut MeshData, center: Vec3, u: Vec3, v: Vec3, normal: Vec3) {
    let base = mesh.positions.len() as u32;
    let corners = [
        (center - u - v, Vec2::new(0.0, 0.0)),
        (center + u - v, Vec2::new(1.0, 0.0)),
        (center + u + v, Vec2::new(1.0, 1.0)),
        (center - u + v, Vec2::new(0.0, 1.0)),
    ];
    for (p, uv) in corners {
        mesh.positions.push(p);
        mesh.uvs.push(uv);
        mesh.normals.push(normal);
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Axis-aligned box of the given full size.
pub fn box_mesh(size: Vec3) -> MeshData {
    let h = size.abs() * 0.5;
    let mut mesh = MeshData::new();
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        push_quad(&mut mesh, n * h, u * h, v * h, n);
    }
    mesh
}

/// Rectangle in the XY plane facing +Z.
pub fn plane_mesh(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::new();
    push_quad(
        &mut mesh,
        Vec3::ZERO,
        Vec3::new(width.abs() * 0.5, 0.0, 0.0),
        Vec3::new(0.0, height.abs() * 0.5, 0.0),
        Vec3::Z,
    );
    mesh
}

/// Cylinder parameters. A zero radius drops that cap; a sweep below a full
/// turn leaves the cut open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderShape {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub segments: u32,
    /// Swept angle in radians, starting at +Z and turning toward +X.
    pub sweep: f32,
}

impl CylinderShape {
    pub fn new(radius: f32, height: f32, segments: u32) -> Self {
        Self {
            radius_top: radius,
            radius_bottom: radius,
            height,
            segments,
            sweep: TAU,
        }
    }

    pub fn tapered(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            ..Self::new(0.0, height, segments)
        }
    }

    pub fn sweep(mut self, sweep: f32) -> Self {
        self.sweep = sweep.clamp(0.0, TAU);
        self
    }
}

/// Cylinder along Y, centered at the origin.
pub fn cylinder_mesh(shape: CylinderShape) -> MeshData {
    let segments = shape.segments.max(3);
    let half = shape.height.abs() * 0.5;
    let (rt, rb) = (shape.radius_top.abs(), shape.radius_bottom.abs());
    let slope = if shape.height.abs() > 0.0 {
        (rb - rt) / shape.height.abs()
    } else {
        0.0
    };
    let angle = |i: u32| i as f32 / segments as f32 * shape.sweep;
    let mut mesh = MeshData::new();

    // Side: a bottom and a top ring, `segments + 1` vertices each.
    for (y, r, v) in [(-half, rb, 0.0), (half, rt, 1.0)] {
        for i in 0..=segments {
            let (s, c) = angle(i).sin_cos();
            mesh.positions.push(Vec3::new(r * s, y, r * c));
            mesh.uvs.push(Vec2::new(i as f32 / segments as f32, v));
            mesh.normals.push(Vec3::new(s, slope, c).normalize());
        }
    }
    let ring = segments + 1;
    for i in 0..segments {
        let (a, b) = (i, i + 1);
        let (c, d) = (ring + i + 1, ring + i);
        mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    for (y, r, normal) in [(half, rt, Vec3::Y), (-half, rb, Vec3::NEG_Y)] {
        if r <= 0.0 {
            continue;
        }
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        mesh.uvs.push(Vec2::splat(0.5));
        mesh.normals.push(normal);
        for i in 0..=segments {
            let (s, c) = angle(i).sin_cos();
            mesh.positions.push(Vec3::new(r * s, y, r * c));
            mesh.uvs.push(Vec2::new(0.5 + 0.5 * s, 0.5 + 0.5 * c));
            mesh.normals.push(normal);
        }
        for i in 0..segments {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
    mesh
}

/// UV sphere of the given radius. Poles produce zero-area triangles.
pub fn sphere_mesh(radius: f32, segments: u32, rings: u32) -> MeshData {
    sphere_band(radius, segments, rings, PI)
}

/// Upper half of a sphere, open at the equator.
pub fn dome_mesh(radius: f32, segments: u32, rings: u32) -> MeshData {
    sphere_band(radius, segments, rings, PI / 2.0)
}

/// Sphere cap from the +Y pole down to polar angle `phi_max`.
fn sphere_band(radius: f32, segments: u32, rings: u32, phi_max: f32) -> MeshData {
    let (segments, rings) = (segments.max(3), rings.max(2));
    let radius = radius.abs();
    let mut mesh = MeshData::new();
    for ring in 0..=rings {
        let phi = phi_max * ring as f32 / rings as f32;
        let (ring_radius, y) = phi.sin_cos();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (s, c) = theta.sin_cos();
            let normal = Vec3::new(ring_radius * s, y, ring_radius * c);
            mesh.positions.push(normal * radius);
            mesh.normals.push(normal);
            mesh.uvs.push(Vec2::new(
                seg as f32 / segments as f32,
                ring as f32 / rings as f32,
            ));
        }
    }
    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            mesh.indices
                .extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }
    mesh
}

/// Square slab in the XZ plane with a round hole through its middle.
/// `segments` is rounded up to a multiple of 8 so the square's corners
/// land on sample rays.
pub fn holed_slab_mesh(size: f32, hole_radius: f32, thickness: f32, segments: u32) -> MeshData {
    let segments = segments.max(8).div_ceil(8) * 8;
    let half = size.abs() * 0.5;
    let hole = hole_radius.abs().min(half);
    let h = thickness.abs() * 0.5;
    let mut mesh = MeshData::new();

    let ray = |i: u32| {
        let (s, c) = (TAU * i as f32 / segments as f32).sin_cos();
        Vec3::new(s, 0.0, c)
    };
    let uv = |p: Vec3| Vec2::new(p.x / size.abs() + 0.5, p.z / size.abs() + 0.5);

    // Top and bottom: inner and outer rings, interleaved.
    for (y, normal) in [(h, Vec3::Y), (-h, Vec3::NEG_Y)] {
        let base = mesh.positions.len() as u32;
        for i in 0..=segments {
            let d = ray(i);
            let outer = d * (half / d.x.abs().max(d.z.abs()));
            for p in [d * hole, outer] {
                let p = p + Vec3::new(0.0, y, 0.0);
                mesh.positions.push(p);
                mesh.normals.push(normal);
                mesh.uvs.push(uv(p));
            }
        }
        for i in 0..segments {
            let (inner, outer) = (base + 2 * i, base + 2 * i + 1);
            let (inner_next, outer_next) = (inner + 2, outer + 2);
            if normal.y > 0.0 {
                mesh.indices
                    .extend_from_slice(&[inner, outer, outer_next, inner, outer_next, inner_next]);
            } else {
                mesh.indices
                    .extend_from_slice(&[inner, outer_next, outer, inner, inner_next, outer_next]);
            }
        }
    }

    // Hole wall, facing the axis.
    let base = mesh.positions.len() as u32;
    for i in 0..=segments {
        let d = ray(i);
        for (y, v) in [(-h, 0.0), (h, 1.0)] {
            mesh.positions.push(d * hole + Vec3::new(0.0, y, 0.0));
            mesh.normals.push(-d);
            mesh.uvs.push(Vec2::new(i as f32 / segments as f32, v));
        }
    }
    for i in 0..segments {
        let (bottom, top) = (base + 2 * i, base + 2 * i + 1);
        let (bottom_next, top_next) = (bottom + 2, top + 2);
        mesh.indices
            .extend_from_slice(&[bottom, top, top_next, bottom, top_next, bottom_next]);
    }

    // Outer edges.
    let sides = [
        (Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_X, Vec3::Z),
        (Vec3::Z, Vec3::X),
        (Vec3::NEG_Z, Vec3::NEG_X),
    ];
    for (n, u) in sides {
        push_quad(&mut mesh, n * half, u * half, Vec3::Y * h, n);
    }
    mesh
}

/// Sample a uniform Catmull-Rom spline through `points`, `segments` spans in
/// total. The end points are repeated so the curve starts and ends on them.
pub fn catmull_rom(points: &[Vec3], segments: usize) -> Vec<Vec3> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() == 1 || segments == 0 {
        return vec![first];
    }
    let spans = points.len() - 1;
    let at = |i: isize| points[i.clamp(0, spans as isize) as usize];
    let mut out = Vec::with_capacity(segments + 1);
    for step in 0..segments {
        let t = step as f32 / segments as f32 * spans as f32;
        let i = t.floor() as isize;
        let u = t - i as f32;
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let (u2, u3) = (u * u, u * u * u);
        out.push(
            0.5 * (2.0 * p1
                + (p2 - p0) * u
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
                + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3),
        );
    }
    out.push(last);
    out
}

/// Open tube of `radius` swept along a polyline. Ring frames are carried
/// along the path by parallel transport so the tube does not twist.
pub fn tube_mesh(path: &[Vec3], radius: f32, radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::new();
    if path.len() < 2 {
        return mesh;
    }
    let radial = radial_segments.max(3);
    let radius = radius.abs();
    let last = path.len() - 1;
    let tangent = |i: usize| {
        let (a, b) = (path[i.saturating_sub(1)], path[(i + 1).min(last)]);
        (b - a).normalize_or_zero()
    };

    let mut normal = tangent(0).any_orthonormal_vector();
    for (i, &center) in path.iter().enumerate() {
        let t = tangent(i);
        let carried = normal - t * normal.dot(t);
        if carried.length_squared() > 1e-12 {
            normal = carried.normalize();
        }
        let binormal = t.cross(normal);
        for j in 0..=radial {
            let (s, c) = (TAU * j as f32 / radial as f32).sin_cos();
            let out = c * normal + s * binormal;
            mesh.positions.push(center + out * radius);
            mesh.normals.push(out);
            mesh.uvs.push(Vec2::new(i as f32 / last as f32, j as f32 / radial as f32));
        }
    }
    let ring = radial + 1;
    for i in 0..last as u32 {
        for j in 0..radial {
            let a = i * ring + j;
            let b = a + ring;
            mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

//! Clamping helpers for real-time input. A glitchy sample must never poison
//! transform or camera state, so non-finite components are replaced instead of
//! being reported.

use glam::{Vec2, Vec3};

/// Replace a non-finite value with `fallback`.
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Zero every non-finite component.
pub fn finite_vec3(v: Vec3) -> Vec3 {
    Vec3::new(finite_or(v.x, 0.0), finite_or(v.y, 0.0), finite_or(v.z, 0.0))
}

/// Zero every non-finite component.
pub fn finite_vec2(v: Vec2) -> Vec2 {
    Vec2::new(finite_or(v.x, 0.0), finite_or(v.y, 0.0))
}

/// Replace non-finite scale factors with 1 so the target keeps its size.
pub fn finite_scale(v: Vec3) -> Vec3 {
    Vec3::new(finite_or(v.x, 1.0), finite_or(v.y, 1.0), finite_or(v.z, 1.0))
}

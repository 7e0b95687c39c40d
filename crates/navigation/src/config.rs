use glam::Vec3;
use roomscene_common::sanitize::{finite_or, finite_vec3};
use roomscene_input::KeyBindings;
use serde::{Deserialize, Serialize};

/// Navigation tuning. Every field has a default, so a partial YAML block is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Distance moved per tick while a movement key is held.
    pub speed: f32,
    /// Radians of turn per pixel of pointer motion.
    pub sensitivity: f32,
    /// Half size of the box that stands in for the camera in collision tests.
    pub camera_half_extents: Vec3,
    /// Keep movement horizontal regardless of pitch.
    pub ground_locked: bool,
    pub start_position: Vec3,
    pub start_yaw: f32,
    pub start_pitch: f32,
    pub keys: KeyBindings,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            sensitivity: 0.002,
            camera_half_extents: Vec3::splat(0.25),
            ground_locked: false,
            start_position: Vec3::new(0.0, 5.0, 0.0),
            start_yaw: 0.0,
            start_pitch: 0.0,
            keys: KeyBindings::default(),
        }
    }
}

impl NavigationConfig {
    /// Replace non-finite numbers with the defaults. Half extents are made
    /// non-negative so the camera box is never inside out.
    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        let extents = self.camera_half_extents;
        let half = fallback.camera_half_extents;
        Self {
            speed: finite_or(self.speed, fallback.speed),
            sensitivity: finite_or(self.sensitivity, fallback.sensitivity),
            camera_half_extents: Vec3::new(
                finite_or(extents.x, half.x),
                finite_or(extents.y, half.y),
                finite_or(extents.z, half.z),
            )
            .abs(),
            start_position: finite_vec3(self.start_position),
            start_yaw: finite_or(self.start_yaw, fallback.start_yaw),
            start_pitch: finite_or(self.start_pitch, fallback.start_pitch),
            ..self
        }
    }
}

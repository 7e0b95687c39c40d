use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A scene light. Colors are linear RGB in 0..1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        direction: Vec3,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        /// Zero means unlimited.
        range: f32,
    },
    Spot {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        target: Vec3,
        /// Zero means unlimited.
        range: f32,
        /// Half-angle of the cone, radians.
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
}

impl Light {
    pub fn kind(&self) -> &'static str {
        match self {
            Light::Ambient { .. } => "ambient",
            Light::Directional { .. } => "directional",
            Light::Point { .. } => "point",
            Light::Spot { .. } => "spot",
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. } => *intensity,
        }
    }
}

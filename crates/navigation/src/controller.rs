use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use roomscene_collision::{CollisionVolume, ObstacleSet};
use roomscene_common::Transform;
use roomscene_common::sanitize::{finite_or, finite_vec2};
use roomscene_input::{Action, MoveDirection};

use crate::NavigationConfig;

/// Below this squared length a movement intent counts as no movement.
const MIN_INTENT_LENGTH_SQUARED: f32 = 1e-12;

/// What one tick did to the camera position.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No movement key held, or the intent cancelled out.
    Idle,
    /// Position changed by the given offset.
    Moved(Vec3),
    /// The proposed position overlapped an obstacle; nothing moved.
    Blocked { obstacle: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MoveIntent {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
}

impl MoveIntent {
    fn set(&mut self, direction: MoveDirection, active: bool) {
        match direction {
            MoveDirection::Forward => self.forward = active,
            MoveDirection::Back => self.back = active,
            MoveDirection::Left => self.left = active,
            MoveDirection::Right => self.right = active,
        }
    }

    /// Camera-local direction: forward is -Z, right is +X.
    fn local(&self) -> Vec3 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.left, self.right),
            0.0,
            axis(self.forward, self.back),
        )
    }
}

/// Turns actions into camera orientation and obstacle-checked position.
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavigationConfig,
    yaw: f32,
    pitch: f32,
    position: Vec3,
    intent: MoveIntent,
    look_delta: Vec2,
    look_pending: bool,
    pointer_locked: bool,
    volume: CollisionVolume,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        let config = config.sanitized();
        let position = config.start_position;
        let volume = CollisionVolume::centered(position, config.camera_half_extents);
        Self {
            yaw: config.start_yaw,
            pitch: config.start_pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
            position,
            intent: MoveIntent::default(),
            look_delta: Vec2::ZERO,
            look_pending: false,
            pointer_locked: false,
            volume,
            config,
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Feed one input action. Look deltas are accumulated until the next tick.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move { direction, active } => self.intent.set(direction, active),
            Action::Look { dx, dy } => {
                if !self.pointer_locked {
                    return;
                }
                self.look_delta += finite_vec2(Vec2::new(dx, dy));
                self.look_pending = true;
            }
            Action::PointerLock(locked) => {
                tracing::debug!(locked, "pointer lock changed");
                self.pointer_locked = locked;
                if !locked {
                    self.look_delta = Vec2::ZERO;
                    self.look_pending = false;
                }
            }
            Action::Noop => {}
        }
    }

    /// Map a raw key event through the configured bindings and apply it.
    pub fn key(&mut self, key: &str, pressed: bool) {
        let action = self.config.keys.map_key(key, pressed);
        self.apply(action);
    }

    /// Advance one frame: look, move, then reject the move if it hits an obstacle.
    pub fn tick(&mut self, obstacles: &ObstacleSet) -> TickOutcome {
        let _span = tracing::info_span!("navigation_tick").entered();

        if self.look_pending {
            let turn = self.look_delta * self.config.sensitivity;
            self.yaw = finite_or(self.yaw - turn.x, self.yaw);
            self.pitch = finite_or(self.pitch - turn.y, self.pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
            self.look_delta = Vec2::ZERO;
            self.look_pending = false;
        }

        let mut intent = self.orientation() * self.intent.local();
        if self.config.ground_locked {
            intent.y = 0.0;
        }
        if intent.length_squared() <= MIN_INTENT_LENGTH_SQUARED {
            return TickOutcome::Idle;
        }
        let step = intent.normalize() * self.config.speed;
        let proposal = self.position + step;

        let probe = CollisionVolume::centered(proposal, self.config.camera_half_extents);
        if let Some(hit) = obstacles.first_hit(&probe) {
            tracing::debug!(obstacle = %hit.name, "movement blocked");
            return TickOutcome::Blocked {
                obstacle: hit.name.clone(),
            };
        }

        self.position = proposal;
        self.volume = probe;
        tracing::trace!(x = proposal.x, y = proposal.y, z = proposal.z, "camera moved");
        TickOutcome::Moved(step)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// The box currently occupied by the camera.
    pub fn volume(&self) -> &CollisionVolume {
        &self.volume
    }

    /// Yaw about Y, then pitch about the turned X axis, no roll.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera-space forward direction in world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn camera_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.orientation(),
            scale: Vec3::ONE,
        }
    }

    /// World-to-camera matrix for the renderer.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position).inverse()
    }
}

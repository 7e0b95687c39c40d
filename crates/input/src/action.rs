use serde::{Deserialize, Serialize};

/// One of the four logical movement directions, relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Forward,
        MoveDirection::Back,
        MoveDirection::Left,
        MoveDirection::Right,
    ];
}

/// A high-level input action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Start (`active = true`) or stop moving in a direction.
    Move {
        direction: MoveDirection,
        active: bool,
    },
    /// Relative pointer motion in pixels.
    Look { dx: f32, dy: f32 },
    /// Pointer capture gained or lost.
    PointerLock(bool),
    /// Unbound input.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}

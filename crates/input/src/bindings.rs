use serde::{Deserialize, Serialize};

use crate::{Action, MoveDirection};

/// Keyboard layout for the four movement directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".into(),
            back: "s".into(),
            left: "a".into(),
            right: "d".into(),
        }
    }
}

impl KeyBindings {
    /// Direction bound to `key`, if any.
    pub fn direction(&self, key: &str) -> Option<MoveDirection> {
        MoveDirection::ALL
            .into_iter()
            .find(|dir| self.key_for(*dir).eq_ignore_ascii_case(key))
    }

    pub fn key_for(&self, direction: MoveDirection) -> &str {
        match direction {
            MoveDirection::Forward => &self.forward,
            MoveDirection::Back => &self.back,
            MoveDirection::Left => &self.left,
            MoveDirection::Right => &self.right,
        }
    }

    /// Map a key press (`pressed = true`) or release to an action.
    pub fn map_key(&self, key: &str, pressed: bool) -> Action {
        match self.direction(key) {
            Some(direction) => Action::Move {
                direction,
                active: pressed,
            },
            None => {
                tracing::trace!(key, "unbound key");
                Action::Noop
            }
        }
    }
}

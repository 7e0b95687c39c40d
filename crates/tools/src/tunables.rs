use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// Errors from tunable access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TunableError {
    #[error("unknown tunable: {0}")]
    Unknown(String),
    #[error("tunable {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid assignment {0:?}: expected name=value")]
    InvalidAssignment(String),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// One adjustable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Knob {
    Number { value: f32, min: f32, max: f32 },
    /// Packed `0xRRGGBB`.
    Color(u32),
}

impl Knob {
    fn kind(&self) -> &'static str {
        match self {
            Knob::Number { .. } => "number",
            Knob::Color(_) => "color",
        }
    }
}

/// Named runtime knobs, the headless counterpart of a settings panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    knobs: BTreeMap<String, Knob>,
}

impl Tunables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Knobs for the room's ceiling light and spotlight.
    pub fn room_defaults() -> Self {
        let mut t = Self::new();
        t.add_number("ceiling_light.intensity", 115.0, 0.0, 250.0);
        t.add_color("spotlight.color", 0xffffff);
        t.add_number("spotlight.intensity", 10.0, 0.0, 20.0);
        t.add_number("spotlight.limit_distance", 20.0, 0.0, 50.0);
        t.add_number("spotlight.angle", PI / 9.0, 0.0, FRAC_PI_2);
        t.add_number("spotlight.penumbra", 0.05, 0.0, 1.0);
        t.add_number("spotlight.decay", 0.5, 0.0, 3.0);
        t.add_number("spotlight.target_x", 5.0, -5.0, 5.0);
        t.add_number("spotlight.target_z", 5.0, -5.0, 5.0);
        t
    }

    /// Declare a numeric knob. The initial value is clamped into range.
    pub fn add_number(&mut self, name: &str, value: f32, min: f32, max: f32) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.knobs.insert(
            name.to_string(),
            Knob::Number {
                value: clamp_finite(value, min, min, max),
                min,
                max,
            },
        );
    }

    pub fn add_color(&mut self, name: &str, rgb: u32) {
        self.knobs.insert(name.to_string(), Knob::Color(rgb & 0xff_ffff));
    }

    pub fn get(&self, name: &str) -> Option<&Knob> {
        self.knobs.get(name)
    }

    pub fn number(&self, name: &str) -> Result<f32, TunableError> {
        match self.knob(name)? {
            Knob::Number { value, .. } => Ok(*value),
            other => Err(mismatch(name, "number", other)),
        }
    }

    /// Set a numeric knob, clamped to its range. Returns the stored value.
    /// A non-finite input leaves the knob unchanged.
    pub fn set_number(&mut self, name: &str, new_value: f32) -> Result<f32, TunableError> {
        let knob = self
            .knobs
            .get_mut(name)
            .ok_or_else(|| TunableError::Unknown(name.to_string()))?;
        match knob {
            Knob::Number { value, min, max } => {
                *value = clamp_finite(new_value, *value, *min, *max);
                tracing::debug!(name, value = *value, "tunable changed");
                Ok(*value)
            }
            other => Err(mismatch(name, "number", other)),
        }
    }

    pub fn color(&self, name: &str) -> Result<u32, TunableError> {
        match self.knob(name)? {
            Knob::Color(rgb) => Ok(*rgb),
            other => Err(mismatch(name, "color", other)),
        }
    }

    pub fn set_color(&mut self, name: &str, rgb: u32) -> Result<(), TunableError> {
        let knob = self
            .knobs
            .get_mut(name)
            .ok_or_else(|| TunableError::Unknown(name.to_string()))?;
        match knob {
            Knob::Color(current) => {
                *current = rgb & 0xff_ffff;
                tracing::debug!(name, rgb = *current, "tunable changed");
                Ok(())
            }
            other => Err(mismatch(name, "color", other)),
        }
    }

    /// Parse and apply a `name=value` assignment. Colors accept `#rrggbb`
    /// or `0xrrggbb`.
    pub fn assign(&mut self, assignment: &str) -> Result<(), TunableError> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| TunableError::InvalidAssignment(assignment.to_string()))?;
        let (name, raw) = (name.trim(), raw.trim());
        let invalid = |reason: String| TunableError::InvalidValue {
            name: name.to_string(),
            reason,
        };
        if matches!(self.knob(name)?, Knob::Number { .. }) {
            let value: f32 = raw.parse().map_err(|e| invalid(format!("{e}")))?;
            self.set_number(name, value)?;
        } else {
            let hex = raw
                .strip_prefix('#')
                .or_else(|| raw.strip_prefix("0x"))
                .unwrap_or(raw);
            let rgb = u32::from_str_radix(hex, 16).map_err(|e| invalid(format!("{e}")))?;
            self.set_color(name, rgb)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Knob)> {
        self.knobs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.knobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knobs.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn knob(&self, name: &str) -> Result<&Knob, TunableError> {
        self.knobs
            .get(name)
            .ok_or_else(|| TunableError::Unknown(name.to_string()))
    }
}

fn clamp_finite(value: f32, fallback: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &Knob) -> TunableError {
    TunableError::KindMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

//! Scene assembly: primitive shapes, room objects, the candle flame and the
//! room layout that ties them together.
//!
//! # Invariants
//! - Every object is built once, then only moved through the scene graph.
//! - Obstacles are frozen after the last layout move.
//! - An object that fails to build is skipped; the room never aborts on one.
//! - The flame is the only part whose geometry changes after assembly.

pub mod config;
pub mod context;
pub mod flame;
pub mod objects;
pub mod primitives;
pub mod room;

pub use config::{ConfigError, RoomConfig, TableLayout};
pub use context::{BuildContext, BuildError, Part};
pub use flame::{FlameParticles, FlameSettings};
pub use objects::RoomObject;
pub use room::{Room, RoomError, SPOTLIGHT_POSITION};

pub fn crate_info() -> &'static str {
    "roomscene-room v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("room"));
    }
}

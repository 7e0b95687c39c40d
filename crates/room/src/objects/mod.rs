//! Room objects. Each is a plain configuration struct with defaults that
//! builds its node and parts into a [`BuildContext`].

pub mod fixtures;
pub mod furniture;
pub mod sheets;
pub mod structure;
pub mod tubes;

use glam::{Quat, Vec3};
use roomscene_common::{NodeId, Transform};

use crate::context::{BuildContext, BuildError};

pub use fixtures::{CeilingLight, JailWall, Mirror, Sink, Spotlight, Toilet};
pub use furniture::{Bed, Cake, Candle, Flame, Plate, Stool, Table};
pub use sheets::{Blanket, FlowerJar, Newspaper};
pub use structure::{Floor, Painting, Wall};
pub use tubes::{BeetleTubes, Flower, HelicalSpring};

/// Something that can place itself in the room.
pub trait RoomObject {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<NodeId, BuildError>;
}

/// Spawn an object's node at `position`, turned `angle` radians about +Y.
fn spawn_object(
    ctx: &mut BuildContext<'_>,
    name: &str,
    position: Vec3,
    angle: f32,
) -> Result<NodeId, BuildError> {
    let node = ctx.spawn(name, Transform::from_position(position));
    ctx.scene.rotate(node, Vec3::Y, angle)?;
    Ok(node)
}

/// Local part placement with a rotation.
fn placed(position: Vec3, rotation: Quat) -> Transform {
    Transform {
        position,
        rotation,
        scale: Vec3::ONE,
    }
}

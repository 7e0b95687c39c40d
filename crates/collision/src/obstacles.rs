use crate::CollisionVolume;

/// A named static obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub name: String,
    pub volume: CollisionVolume,
}

/// Flat collection of static obstacles, filled while the scene is built and
/// only queried afterwards.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, volume: CollisionVolume) {
        let name = name.into();
        if volume.is_degenerate() {
            tracing::warn!(%name, "registered degenerate obstacle; it will never block");
        } else {
            tracing::debug!(%name, "registered obstacle");
        }
        self.obstacles.push(Obstacle { name, volume });
    }

    /// First registered obstacle overlapping `volume`.
    pub fn first_hit(&self, volume: &CollisionVolume) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.volume.intersects(volume))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn first_hit_reports_registration_order() {
        let mut set = ObstacleSet::new();
        set.register("far", CollisionVolume::centered(Vec3::new(50.0, 0.0, 0.0), Vec3::ONE));
        set.register("wall", CollisionVolume::centered(Vec3::ZERO, Vec3::ONE));
        set.register("table", CollisionVolume::centered(Vec3::new(0.5, 0.0, 0.0), Vec3::ONE));
        assert_eq!(set.len(), 3);

        let probe = CollisionVolume::centered(Vec3::new(0.2, 0.0, 0.0), Vec3::splat(0.1));
        assert_eq!(set.first_hit(&probe).map(|o| o.name.as_str()), Some("wall"));

        let miss = CollisionVolume::centered(Vec3::new(0.0, 20.0, 0.0), Vec3::splat(0.1));
        assert!(set.first_hit(&miss).is_none());
    }

    #[test]
    fn degenerate_obstacle_never_blocks() {
        let mut set = ObstacleSet::new();
        set.register("ghost", CollisionVolume::degenerate());
        let probe = CollisionVolume::centered(Vec3::ZERO, Vec3::splat(100.0));
        assert!(set.first_hit(&probe).is_none());
        assert_eq!(set.iter().count(), 1);
    }
}

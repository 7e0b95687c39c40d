use glam::{Vec2, Vec3};
use roomscene_common::MeshData;
use serde::{Deserialize, Serialize};

/// Small deterministic generator so flame runs are reproducible.
#[derive(Debug, Clone)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Tuning of the candle flame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameSettings {
    pub particle_count: usize,
    /// Width of the square the particles spawn in.
    pub radius: f32,
    pub height: f32,
    /// Lifetimes are drawn uniformly from [0, max_lifetime) seconds.
    pub max_lifetime: f32,
    /// Upward speed in units per second.
    pub rise_speed: f32,
    pub seed: u64,
}

impl Default for FlameSettings {
    fn default() -> Self {
        Self {
            particle_count: 100,
            radius: 0.015,
            height: 0.05,
            max_lifetime: 1.5,
            rise_speed: 0.06,
            seed: 0x00f1_a4e5,
        }
    }
}

/// The looping point-particle flame.
///
/// Particles rise while alive and respawn at the base when their lifetime
/// runs out.
#[derive(Debug, Clone)]
pub struct FlameParticles {
    settings: FlameSettings,
    positions: Vec<Vec3>,
    lifetimes: Vec<f32>,
    rng: SplitMix64,
}

impl FlameParticles {
    pub fn new(settings: FlameSettings) -> Self {
        let mut rng = SplitMix64::new(settings.seed);
        let mut positions = Vec::with_capacity(settings.particle_count);
        let mut lifetimes = Vec::with_capacity(settings.particle_count);
        for _ in 0..settings.particle_count {
            let x = (rng.next_f32() - 0.5) * settings.radius;
            let y = rng.next_f32() * settings.height / 5.0;
            let z = (rng.next_f32() - 0.5) * settings.radius;
            positions.push(Vec3::new(x, y, z));
            lifetimes.push(rng.next_f32() * settings.max_lifetime);
        }
        Self {
            settings,
            positions,
            lifetimes,
            rng,
        }
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are ignored.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let s = &self.settings;
        for (p, life) in self.positions.iter_mut().zip(self.lifetimes.iter_mut()) {
            *life -= dt;
            if *life <= 0.0 {
                p.x = (self.rng.next_f32() - 0.5) * s.radius;
                p.y = 0.0;
                p.z = (self.rng.next_f32() - 0.5) * s.radius;
                *life = self.rng.next_f32() * s.max_lifetime;
            } else {
                p.y += dt * s.rise_speed;
            }
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }

    pub fn settings(&self) -> &FlameSettings {
        &self.settings
    }

    /// Current particles as a point cloud.
    pub fn mesh(&self) -> MeshData {
        let n = self.positions.len();
        MeshData {
            positions: self.positions.clone(),
            uvs: vec![Vec2::ZERO; n],
            normals: vec![Vec3::Y; n],
            ..MeshData::default()
        }
    }
}

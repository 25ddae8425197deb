//! Two-sided particle streams for the 2D backend.
//!
//! Each side feeds a fixed pool of short-lived particles toward the center
//! of a normalized `[0, 1] x [0, 1]` space. Particles never interact with
//! each other or with the phase driver; the effect runs continuously.

use crate::config::ParticleConfig;
use crate::rng::Lcg;

/// Which edge a particle approaches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Sign of the horizontal drift for this side.
    fn direction(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in `[0, 1)`; the particle respawns at zero.
    pub life: f32,
    /// Radius as a fraction of the canvas height.
    pub size: f32,
}

/// Fixed mapping of the two sides to their particle pools. Pools are
/// allocated once; expired particles are re-randomized in place.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: ParticleConfig,
    rng: Lcg,
    left: Vec<Particle>,
    right: Vec<Particle>,
}

impl ParticleField {
    pub fn new(config: ParticleConfig, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let spawn_pool = |rng: &mut Lcg, side: Side| {
            (0..config.per_side)
                .map(|_| spawn(&config, rng, side))
                .collect()
        };
        let left = spawn_pool(&mut rng, Side::Left);
        let right = spawn_pool(&mut rng, Side::Right);
        Self {
            config,
            rng,
            left,
            right,
        }
    }

    pub fn side(&self, side: Side) -> &[Particle] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let c = self.config;
        for side in Side::BOTH {
            let pool = match side {
                Side::Left => &mut self.left,
                Side::Right => &mut self.right,
            };
            for p in pool.iter_mut() {
                p.vy += c.jitter * (self.rng.next_f32() * 2.0 - 1.0);

                // Soft collision: slow down and churn near the center line.
                if (p.x - 0.5).abs() < c.collision_zone {
                    p.vx *= c.drag;
                    p.vx += c.turbulence * (self.rng.next_f32() * 2.0 - 1.0);
                    p.vy += c.turbulence * (self.rng.next_f32() * 2.0 - 1.0);
                }

                p.x += p.vx;
                p.y += p.vy;
                p.life -= c.fade_rate;

                let exited = match side {
                    Side::Left => p.x < 0.0,
                    Side::Right => p.x > 1.0,
                };
                if p.life <= 0.0 || exited {
                    *p = spawn(&c, &mut self.rng, side);
                }
            }
        }
    }
}

/// Fresh randomized particle on its own half of the space, drifting toward
/// the center.
fn spawn(config: &ParticleConfig, rng: &mut Lcg, side: Side) -> Particle {
    let x = match side {
        Side::Left => rng.range(0.0, 0.45),
        Side::Right => rng.range(0.55, 1.0),
    };
    let speed = rng.range(config.min_speed, config.max_speed);
    Particle {
        x,
        y: rng.next_f32(),
        vx: speed * side.direction(),
        vy: 0.0,
        life: rng.next_f32(),
        size: rng.range(config.min_size, config.max_size),
    }
}

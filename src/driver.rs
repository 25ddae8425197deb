//! The animation state machine: two blobs idle, rush together, flash, and
//! fade back in at their start positions, forever.
//!
//! The driver owns every piece of mutable animation state and advances it
//! exactly one frame per [`Driver::step`] call. Rendering backends only read
//! the resulting scene, which keeps the whole cycle testable without a
//! display surface.

use crate::config::Config;

const OPACITY_EPS: f32 = 1e-4;

/// Current phase of the collision cycle. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Colliding,
    Merged,
    Resetting,
}

/// Per-blob scene parameters, rewritten once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    /// Offset along the collision axis.
    pub x: f32,
    /// Uniform scale multiplier.
    pub scale: f32,
    /// 0..=1 alpha handed to the renderer.
    pub opacity: f32,
}

/// Owned animation state. The left/right mirror symmetry is structural:
/// only the left offset is stored and the right side is derived from it.
#[derive(Debug, Clone)]
pub struct Driver {
    config: Config,
    phase: Phase,
    /// Frames elapsed since the current phase began.
    timer: u32,
    left_x: f32,
    scale: f32,
    opacity: f32,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self {
            phase: Phase::Idle,
            timer: 0,
            left_x: -config.start_offset,
            scale: 1.0,
            opacity: config.steady_opacity,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn left(&self) -> Blob {
        Blob {
            x: self.left_x,
            scale: self.scale,
            opacity: self.opacity,
        }
    }

    pub fn right(&self) -> Blob {
        Blob {
            x: -self.left_x,
            scale: self.scale,
            opacity: self.opacity,
        }
    }

    /// Advance the animation by one frame.
    ///
    /// `wall_ms` drives only the cosmetic idle pulse (the original behavior);
    /// every phase transition depends solely on the frame timer and the
    /// configured constants, so cycle timing is reproducible.
    pub fn step(&mut self, wall_ms: f64) {
        let c = self.config;
        match self.phase {
            Phase::Idle => {
                self.timer += 1;

                // Gentle pulsing around rest scale.
                let pulse = (wall_ms * c.pulse_speed * 0.1).sin() as f32;
                self.scale = 1.0 + pulse * c.pulse_amplitude;

                if self.timer > c.wait_frames {
                    self.phase = Phase::Colliding;
                    self.timer = 0;
                }
            }
            Phase::Colliding => {
                self.timer += 1;
                self.left_x += c.collision_speed;

                if self.left_x >= 0.0 {
                    self.phase = Phase::Merged;
                    self.timer = 0;
                }
            }
            Phase::Merged => {
                self.timer += 1;

                // Flash: grow and fade, both derived from the timer so the
                // ramps are exact and monotonic.
                self.scale = 1.0 + self.timer as f32 * c.explosion_rate;
                self.opacity = (c.steady_opacity - self.timer as f32 * c.fade_out_per_frame)
                    .max(c.opacity_floor);

                if self.timer > c.merged_frames {
                    self.snap_to_start();
                    self.opacity = c.opacity_floor;
                    self.phase = Phase::Resetting;
                    self.timer = 0;
                }
            }
            Phase::Resetting => {
                self.timer += 1;
                self.opacity = (c.opacity_floor + self.timer as f32 * c.fade_in_per_frame)
                    .min(c.steady_opacity);

                // Tolerance absorbs f32 rounding in the ramp so the phase
                // length stays exact.
                if self.opacity + OPACITY_EPS >= c.steady_opacity {
                    self.opacity = c.steady_opacity;
                    self.phase = Phase::Idle;
                    self.timer = 0;
                }
            }
        }
    }

    /// Put positions and scales back at their startup values.
    fn snap_to_start(&mut self) {
        self.left_x = -self.config.start_offset;
        self.scale = 1.0;
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

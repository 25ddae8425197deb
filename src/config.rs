//! Named constants for both backends. Read once at startup; there is no
//! dynamic reconfiguration surface.

/// Convert a `0xRRGGBB` color to linear-ish RGB floats in `[0, 1]`.
pub const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Tunables for the phase-driven collision animation (3D backend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub color_left: [f32; 3],
    pub color_right: [f32; 3],
    /// Units the blobs move toward the center per frame while colliding.
    pub collision_speed: f32,
    /// Angular rate of the idle pulse, applied to wall-clock milliseconds.
    pub pulse_speed: f64,
    /// Half-width of the idle scale band around 1.0.
    pub pulse_amplitude: f32,
    /// Frames to wait in idle before the collision starts.
    pub wait_frames: u32,
    /// Distance of each blob from the center at rest.
    pub start_offset: f32,
    /// Opacity of both blobs outside of the flash/fade phases.
    pub steady_opacity: f32,
    /// Frames the merged flash lasts before snapping back.
    pub merged_frames: u32,
    /// Scale gained per frame during the merged flash.
    pub explosion_rate: f32,
    /// Opacity lost per frame while merged.
    pub fade_out_per_frame: f32,
    /// Opacity regained per frame while resetting.
    pub fade_in_per_frame: f32,
    /// Lowest opacity the fade-out reaches; also the fade-in starting point.
    pub opacity_floor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_left: rgb(0x8b5cf6),
            color_right: rgb(0xa78bfa),
            collision_speed: 0.08,
            pulse_speed: 0.02,
            pulse_amplitude: 0.05,
            wait_frames: 200,
            start_offset: 4.5,
            steady_opacity: 0.8,
            merged_frames: 50,
            explosion_rate: 0.1,
            fade_out_per_frame: 0.03,
            fade_in_per_frame: 0.02,
            opacity_floor: 0.0,
        }
    }
}

/// Tunables for the 2D particle streams. Coordinates are normalized to
/// `[0, 1]` on both axes with the collision center at `x = 0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    /// Pool size per side; allocated once, respawned in place.
    pub per_side: usize,
    /// Horizontal drift speed range drawn at spawn.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Amplitude of the per-frame random vertical jitter.
    pub jitter: f32,
    /// Half-width of the soft-collision zone around the center.
    pub collision_zone: f32,
    /// Multiplier applied to horizontal velocity inside the zone.
    pub drag: f32,
    /// Random velocity kick gained inside the zone, both axes.
    pub turbulence: f32,
    /// Life lost per frame.
    pub fade_rate: f32,
    /// Particle radius range (fraction of the canvas height).
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            per_side: 90,
            min_speed: 0.002,
            max_speed: 0.006,
            jitter: 0.0012,
            collision_zone: 0.12,
            drag: 0.92,
            turbulence: 0.0025,
            fade_rate: 0.008,
            min_size: 0.004,
            max_size: 0.014,
        }
    }
}

//! Balloon Spots - balloons parked on a ring of spring fields
//!
//! Core modules:
//! - `sim`: Spots, the spot manager, the force context and the scene driver
//! - `settings`: Tunables, loadable from JSON
//! - `error`: Contract violations surfaced by spot operations

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SpotError};
pub use settings::Settings;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Balloon frame size (points)
    pub const BALLOON_WIDTH: f32 = 60.0;
    pub const BALLOON_HEIGHT: f32 = 90.0;

    /// Spot spring field (empirical values)
    pub const SPOT_FIELD_STRENGTH: f32 = 1.4;
    pub const SPOT_FIELD_REGION_RADIUS: f32 = 600.0;
    pub const SPOT_FIELD_SMOOTHNESS: f32 = 1.0;

    /// Spot item damping (empirical values)
    pub const SPOT_RESISTANCE: f32 = 25.5;
    pub const SPOT_DENSITY: f32 = 0.006;

    /// Balloons fly away under this gravity once tapped
    pub const FLY_AWAY_GRAVITY: (f32, f32) = (0.0, -0.4);
    /// Points/s² for a gravity magnitude of 1.0
    pub const GRAVITY_ACCELERATION: f32 = 1000.0;

    /// Black hole vortex
    pub const VORTEX_STRENGTH: f32 = 0.03;
    pub const VORTEX_MIN_RADIUS: f32 = 200.0;
    /// Black hole radial pull
    pub const BLACK_HOLE_STRENGTH: f32 = 1.0;
    pub const BLACK_HOLE_MIN_RADIUS: f32 = 50.0;

    /// Seconds between shuffles (also the initial grace period)
    pub const SHUFFLE_INTERVAL: f32 = 5.0;
    /// Seconds the black hole runs before the scene ends
    pub const ESCAPE_FINALE_DELAY: f32 = 12.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// `n` angles evenly spaced around the circle, starting at 0
pub fn ring_angles(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| i as f32 * std::f32::consts::TAU / n as f32)
        .collect()
}

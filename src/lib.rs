//! Buddy Toss - drag, throw and poke a ragdoll buddy around an arena
//!
//! Core modules:
//! - `sim`: Physics and interaction engine (integrator, drag/throw, weapons)
//! - `tuning`: Data-driven physics constants
//! - `stats`: Per-session damage and weapon usage counters

pub mod sim;
pub mod stats;
pub mod tuning;

pub use stats::SessionStats;
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed constants that are not worth tuning at runtime
pub mod consts {
    /// Frame duration the throw and impulse constants are calibrated against (60 Hz)
    pub const TARGET_FRAME_SECS: f32 = 1.0 / 60.0;

    /// Buddy collision box (the rendered figure is 48x72 px)
    pub const ENTITY_HALF_WIDTH: f32 = 24.0;
    pub const ENTITY_HALF_HEIGHT: f32 = 36.0;

    /// Where a fresh buddy spawns before the first bounds measurement
    pub const ENTITY_SPAWN_X: f32 = 200.0;
    pub const ENTITY_SPAWN_Y: f32 = 100.0;

    /// How long the hit flag stays raised (ms), matches the shake animation
    pub const HIT_FLASH_MS: f64 = 500.0;
    /// How long an impact effect stays visible (ms)
    pub const IMPACT_EFFECT_MS: f64 = 600.0;

    /// Plausible window between the two retained pointer samples (ms)
    pub const THROW_MIN_DT_MS: f64 = 1.0;
    pub const THROW_MAX_DT_MS: f64 = 500.0;

    /// Pointer travel (px) past which a drag swallows the trailing click
    pub const CLICK_SLOP: f32 = 4.0;

    /// Rendered missile sprite points up, atan2 heading points right
    pub const MISSILE_HEADING_OFFSET_DEG: f32 = 90.0;
    /// Slack on the arrival test so repeated float steps land on the target
    pub const ARRIVAL_EPSILON: f32 = 1e-3;
}

/// Wrap an angle in degrees into (-360, 360), keeping its sign
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped.is_finite() { wrapped } else { 0.0 }
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

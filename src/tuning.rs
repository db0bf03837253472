//! Physics tuning
//!
//! Every feel-related constant lives here so it can be tweaked from
//! LocalStorage without a rebuild.

use serde::{Deserialize, Serialize};

/// Physics and impulse constants (per-frame units unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integrator ===
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Per-frame velocity retention in the air
    pub air_friction: f32,
    /// Horizontal velocity retention on floor contact
    pub ground_friction: f32,
    /// Velocity fraction kept after a bounce
    pub restitution: f32,
    /// Degrees of spin per px/frame of horizontal velocity
    pub rotation_coupling: f32,

    // === Throw ===
    /// Scales measured pointer speed into a throw
    pub throw_multiplier: f32,
    /// Per-axis cap on throw velocity (px/frame)
    pub max_throw_speed: f32,
    /// Horizontal spread of the fallback release impulse
    pub fallback_spread: f32,
    /// Maximum upward kick of the fallback release impulse
    pub fallback_lift: f32,

    // === Poke ===
    pub click_impulse: f32,
    /// Upward bias added on top of the poke direction
    pub click_lift: f32,
    /// Total range of the random spin a poke adds (degrees)
    pub click_spin: f32,

    // === Weapons ===
    pub melee_impulse: f32,
    pub ranged_impulse: f32,
    pub missile_impulse: f32,
    /// Missile travel per frame (px)
    pub missile_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            air_friction: 0.99,
            ground_friction: 0.9,
            restitution: 0.6,
            rotation_coupling: 0.5,

            throw_multiplier: 1.2,
            max_throw_speed: 35.0,
            fallback_spread: 7.0,
            fallback_lift: 5.25,

            click_impulse: 15.0,
            click_lift: 5.0,
            click_spin: 90.0,

            melee_impulse: 18.0,
            ranged_impulse: 22.0,
            missile_impulse: 40.0,
            missile_speed: 10.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "buddy_toss_tuning";

    /// Parse tuning from JSON, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => Some(tuning.sanitized()),
            Err(e) => {
                log::warn!("Ignoring malformed tuning: {}", e);
                None
            }
        }
    }

    /// Clamp coefficients into ranges that keep the integrator stable
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fix = |v: f32, lo: f32, hi: f32, fallback: f32| {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        };

        self.gravity = fix(self.gravity, 0.0, 10.0, defaults.gravity);
        self.air_friction = fix(self.air_friction, 0.0, 1.0, defaults.air_friction);
        self.ground_friction = fix(self.ground_friction, 0.0, 1.0, defaults.ground_friction);
        self.restitution = fix(self.restitution, 0.0, 1.0, defaults.restitution);
        self.rotation_coupling = fix(self.rotation_coupling, -10.0, 10.0, defaults.rotation_coupling);
        self.throw_multiplier = fix(self.throw_multiplier, 0.0, 10.0, defaults.throw_multiplier);
        self.max_throw_speed = fix(self.max_throw_speed, 1.0, 200.0, defaults.max_throw_speed);
        self.fallback_spread = fix(self.fallback_spread, 0.0, 50.0, defaults.fallback_spread);
        self.fallback_lift = fix(self.fallback_lift, 0.0, 50.0, defaults.fallback_lift);
        self.click_impulse = fix(self.click_impulse, 0.0, 200.0, defaults.click_impulse);
        self.click_lift = fix(self.click_lift, 0.0, 50.0, defaults.click_lift);
        self.click_spin = fix(self.click_spin, 0.0, 360.0, defaults.click_spin);
        self.melee_impulse = fix(self.melee_impulse, 0.0, 200.0, defaults.melee_impulse);
        self.ranged_impulse = fix(self.ranged_impulse, 0.0, 200.0, defaults.ranged_impulse);
        self.missile_impulse = fix(self.missile_impulse, 0.0, 200.0, defaults.missile_impulse);
        // Zero speed would leave a missile hovering forever
        self.missile_speed = fix(self.missile_speed, 0.5, 500.0, defaults.missile_speed);
        self
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(tuning) = Self::from_json(&json) {
                    log::info!("Loaded tuning overrides from LocalStorage");
                    return tuning;
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.0);
        assert_eq!(tuning.restitution, Tuning::default().restitution);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Tuning::from_json("{ gravity: ").is_none());
    }

    #[test]
    fn test_sanitized_clamps_out_of_range() {
        let tuning = Tuning {
            restitution: 3.0,
            air_friction: -1.0,
            missile_speed: 0.0,
            gravity: f32::NAN,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(tuning.restitution, 1.0);
        assert_eq!(tuning.air_friction, 0.0);
        assert_eq!(tuning.missile_speed, 0.5);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }
}

//! Weapons, aiming and the missile
//!
//! Melee and ranged weapons resolve the moment they fire. The missile is the
//! only weapon with travel time: it flies a straight line at a fixed speed
//! and resolves on arrival. Whether a shot counts as a hit is decided at fire
//! time from the end point alone.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{ImpactEffect, Missile, Mode, SimEvent, Simulation};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{direction, wrap_degrees};

/// How a weapon delivers its hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Instant, short range whack
    Melee,
    /// Instant hit along the fire line
    Ranged,
    /// Travelling missile, resolved on arrival
    Projectile,
}

impl WeaponClass {
    pub fn impulse(&self, tuning: &Tuning) -> f32 {
        match self {
            WeaponClass::Melee => tuning.melee_impulse,
            WeaponClass::Ranged => tuning.ranged_impulse,
            WeaponClass::Projectile => tuning.missile_impulse,
        }
    }
}

/// A selectable weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub description: String,
    pub damage: u32,
    pub class: WeaponClass,
}

impl Weapon {
    fn new(id: &str, name: &str, description: &str, damage: u32, class: WeaponClass) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            damage,
            class,
        }
    }
}

/// Damage assigned to weapons added at runtime
pub const CUSTOM_WEAPON_DAMAGE: u32 = 5;

/// Ordered list of available weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponCatalog {
    pub weapons: Vec<Weapon>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        use WeaponClass::*;
        Self {
            weapons: vec![
                Weapon::new("baseball-bat", "Baseball Bat", "A classic. Swing for the fences.", 10, Melee),
                Weapon::new("feather-duster", "Feather Duster", "Tickles more than it hurts.", 1, Melee),
                Weapon::new("water-balloon", "Water Balloon", "Splash damage, mostly to pride.", 3, Ranged),
                Weapon::new("bow", "Bow", "Point, pull, release.", 8, Ranged),
                Weapon::new("gun", "Toy Gun", "Foam darts at high speed.", 15, Ranged),
                Weapon::new("missile", "Missile", "Slow to arrive, hard to ignore.", 50, Projectile),
            ],
        }
    }
}

impl WeaponCatalog {
    pub fn get(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Append a suggested weapon as a melee item; returns its id
    pub fn add_custom(&mut self, name: &str, description: &str) -> String {
        let base = slugify(name);
        let base = if base.is_empty() { "custom".to_string() } else { base };

        let mut id = base.clone();
        let mut n = 2;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }

        self.weapons.push(Weapon {
            id: id.clone(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            damage: CUSTOM_WEAPON_DAMAGE,
            class: WeaponClass::Melee,
        });
        id
    }
}

/// Lowercase, dash-separated id from a display name
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl Simulation {
    /// Arm a weapon (or go back to hand mode with `None`)
    ///
    /// An aim in progress is dropped without firing; a drag in progress is
    /// released as a throw. Unknown ids are ignored.
    pub fn select_weapon(&mut self, id: Option<&str>, now_ms: f64) -> bool {
        if let Some(id) = id {
            if self.weapons.get(id).is_none() {
                log::warn!("Unknown weapon '{}'", id);
                return false;
            }
        }

        match self.mode {
            Mode::Aiming { .. } => {
                self.mode = Mode::Free;
                log::debug!("aim cancelled by weapon switch");
            }
            Mode::Dragging(_) => {
                self.release_drag(now_ms);
            }
            _ => {}
        }

        self.selected_weapon = id.map(str::to_string);
        log::info!("Selected weapon: {}", id.unwrap_or("hand"));
        true
    }

    /// Add a suggested weapon to the catalog
    pub fn add_custom_weapon(&mut self, name: &str, description: &str) -> String {
        let id = self.weapons.add_custom(name, description);
        log::info!("Added custom weapon '{}'", id);
        id
    }

    /// Fire the armed weapon from `start` toward `end`
    ///
    /// `direct` marks a shot aimed straight at the buddy, which always hits.
    pub(crate) fn fire(&mut self, start: Vec2, end: Vec2, direct: bool, now_ms: f64) {
        let Some(weapon) = self.armed_weapon().cloned() else {
            return;
        };
        if self.mode.missile().is_some() {
            return;
        }

        let target_is_entity = direct || self.entity.contains(end);
        self.stats.record_use(&weapon.id);
        self.push_event(SimEvent::Fired {
            weapon_id: weapon.id.clone(),
            direct,
        });

        match weapon.class {
            WeaponClass::Projectile => {
                let d = end - start;
                let heading = d.y.atan2(d.x).to_degrees() + MISSILE_HEADING_OFFSET_DEG;
                self.mode = Mode::ProjectileInFlight(Missile {
                    start,
                    current: start,
                    end,
                    rotation: wrap_degrees(heading),
                    target_is_entity,
                    weapon_id: weapon.id.clone(),
                });
                log::debug!("missile launched toward ({:.1}, {:.1})", end.x, end.y);
                self.push_event(SimEvent::MissileLaunched { weapon_id: weapon.id });
            }
            WeaponClass::Melee | WeaponClass::Ranged => {
                self.mode = Mode::Free;
                if target_is_entity {
                    let dir = match (end - start).try_normalize() {
                        Some(dir) => dir,
                        None => direction(self.rng.random_range(0.0..TAU)),
                    };
                    self.entity.vel += dir * weapon.class.impulse(&self.tuning);
                    self.land_hit(&weapon.id, weapon.damage, end, now_ms);
                } else {
                    self.push_event(SimEvent::Missed { weapon_id: weapon.id });
                }
            }
        }
    }

    /// Move the missile one frame; resolves it when it reaches its target
    pub(crate) fn advance_missile(&mut self, now_ms: f64) {
        let speed = self.tuning.missile_speed;
        let Mode::ProjectileInFlight(missile) = &mut self.mode else {
            return;
        };

        let to_end = missile.end - missile.current;
        if to_end.length() <= speed + ARRIVAL_EPSILON {
            if let Mode::ProjectileInFlight(missile) = std::mem::take(&mut self.mode) {
                self.missile_arrived(missile, now_ms);
            }
        } else {
            missile.current += to_end.normalize() * speed;
        }
    }

    fn missile_arrived(&mut self, missile: Missile, now_ms: f64) {
        self.impacts.push(ImpactEffect {
            pos: missile.end,
            weapon_id: missile.weapon_id.clone(),
            expires_at: now_ms + IMPACT_EFFECT_MS,
        });
        self.push_event(SimEvent::Impact {
            pos: missile.end,
            weapon_id: missile.weapon_id.clone(),
        });

        if !missile.target_is_entity {
            self.push_event(SimEvent::Missed { weapon_id: missile.weapon_id });
            return;
        }

        let damage = self
            .weapons
            .get(&missile.weapon_id)
            .map_or(0, |w| w.damage);
        self.entity.vel += direction(missile.fire_angle()) * self.tuning.missile_impulse;
        self.entity.flag_hit(now_ms);
        self.stats.record_damage(damage);
        self.push_event(SimEvent::Hit {
            weapon_id: missile.weapon_id,
            damage,
        });
    }

    /// Shared bookkeeping for an instant hit
    fn land_hit(&mut self, weapon_id: &str, damage: u32, at: Vec2, now_ms: f64) {
        self.entity.flag_hit(now_ms);
        self.impacts.push(ImpactEffect {
            pos: at,
            weapon_id: weapon_id.to_string(),
            expires_at: now_ms + IMPACT_EFFECT_MS,
        });
        self.push_event(SimEvent::Impact {
            pos: at,
            weapon_id: weapon_id.to_string(),
        });
        self.stats.record_damage(damage);
        self.push_event(SimEvent::Hit {
            weapon_id: weapon_id.to_string(),
            damage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(id: &str) -> Simulation {
        let mut sim = Simulation::new(11, Tuning::default());
        sim.entity.pos = Vec2::new(300.0, 300.0);
        assert!(sim.select_weapon(Some(id), 0.0));
        sim
    }

    #[test]
    fn test_missile_arrives_after_exact_frame_count() {
        let mut sim = armed("missile");
        sim.fire(Vec2::ZERO, Vec2::new(100.0, 0.0), false, 0.0);
        assert!(sim.mode.missile().is_some());

        let mut arrivals = 0;
        let mut frames = 0;
        while sim.mode.missile().is_some() {
            frames += 1;
            sim.advance_missile(frames as f64 * 16.0);
            arrivals += sim
                .drain_events()
                .iter()
                .filter(|e| matches!(e, SimEvent::Impact { .. }))
                .count();
            assert!(frames <= 20, "missile never arrived");
        }

        assert_eq!(frames, 10);
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn test_missile_heading_points_along_fire_line() {
        let mut sim = armed("missile");
        sim.fire(Vec2::ZERO, Vec2::new(100.0, 0.0), false, 0.0);
        let missile = sim.mode.missile().unwrap();
        assert!((missile.rotation - 90.0).abs() < 1e-4);
        assert_eq!(missile.current, Vec2::ZERO);
    }

    #[test]
    fn test_missile_hit_pushes_along_fire_angle() {
        let mut sim = armed("missile");
        let end = sim.entity.pos;
        sim.fire(Vec2::new(300.0, 0.0), end, true, 0.0);

        for frame in 0..100 {
            sim.advance_missile(frame as f64);
        }

        assert!(sim.mode.missile().is_none());
        assert!(sim.entity.is_hit);
        assert!((sim.entity.vel.y - sim.tuning.missile_impulse).abs() < 1e-3);
        assert!(sim.entity.vel.x.abs() < 1e-3);
        assert_eq!(sim.stats.total_damage, 50);
        assert_eq!(sim.impacts.len(), 1);
    }

    #[test]
    fn test_missile_miss_leaves_entity_alone() {
        let mut sim = armed("missile");
        let before = sim.entity.clone();
        sim.fire(Vec2::ZERO, Vec2::new(50.0, 20.0), false, 0.0);

        for frame in 0..100 {
            sim.advance_missile(frame as f64);
        }

        assert_eq!(sim.entity.vel, before.vel);
        assert_eq!(sim.entity.rotation, before.rotation);
        assert!(!sim.entity.is_hit);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::Missed { .. })));
        assert!(!events.iter().any(|e| matches!(e, SimEvent::Hit { .. })));
    }

    #[test]
    fn test_second_shot_ignored_while_missile_flies() {
        let mut sim = armed("missile");
        sim.fire(Vec2::ZERO, Vec2::new(500.0, 0.0), false, 0.0);
        let first_end = sim.mode.missile().unwrap().end;

        sim.fire(Vec2::ZERO, Vec2::new(0.0, 500.0), false, 0.0);

        assert_eq!(sim.mode.missile().unwrap().end, first_end);
        assert_eq!(sim.stats.uses("missile"), 1);
    }

    #[test]
    fn test_ranged_hit_uses_normalized_fire_vector() {
        let mut sim = armed("gun");
        sim.fire(Vec2::new(0.0, 300.0), Vec2::new(310.0, 300.0), false, 0.0);

        assert!((sim.entity.vel.x - sim.tuning.ranged_impulse).abs() < 1e-4);
        assert_eq!(sim.entity.vel.y, 0.0);
        assert!(sim.entity.is_hit);
        assert_eq!(sim.stats.total_damage, 15);
    }

    #[test]
    fn test_ranged_zero_length_hit_uses_random_direction() {
        let mut sim = armed("bow");
        let at = sim.entity.pos;
        sim.fire(at, at, false, 0.0);

        assert!((sim.entity.vel.length() - sim.tuning.ranged_impulse).abs() < 1e-3);
    }

    #[test]
    fn test_ranged_miss_only_notifies() {
        let mut sim = armed("gun");
        sim.fire(Vec2::ZERO, Vec2::new(10.0, 10.0), false, 0.0);

        assert_eq!(sim.entity.vel, Vec2::ZERO);
        assert!(!sim.entity.is_hit);
        assert!(sim.impacts.is_empty());
        assert_eq!(sim.stats.total_damage, 0);
        assert_eq!(sim.stats.uses("gun"), 1);
        assert_eq!(
            sim.drain_events().last(),
            Some(&SimEvent::Missed { weapon_id: "gun".into() })
        );
    }

    #[test]
    fn test_switching_weapon_cancels_aim() {
        let mut sim = armed("gun");
        sim.mode = Mode::Aiming {
            start: Vec2::ZERO,
            end: sim.entity.pos,
        };

        sim.select_weapon(Some("bow"), 0.0);

        assert!(matches!(sim.mode, Mode::Free));
        assert_eq!(sim.entity.vel, Vec2::ZERO);
        assert_eq!(sim.stats.uses("gun"), 0);
    }

    #[test]
    fn test_switching_weapon_mid_drag_throws() {
        let mut sim = Simulation::new(11, Tuning::default());
        let grab = sim.entity.pos;
        sim.begin_drag(grab, 0.0);
        sim.drag_to(grab + Vec2::new(30.0, 0.0), 16.0);

        assert!(sim.select_weapon(Some("gun"), 20.0));

        assert!(matches!(sim.mode, Mode::Free));
        assert!(!sim.entity.is_dragged);
        assert!(sim.entity.vel.x > 0.0);
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::Thrown { fallback: false, .. })));
        assert_eq!(sim.selected_weapon.as_deref(), Some("gun"));
    }

    #[test]
    fn test_instant_hit_reports_impact_before_hit() {
        let mut sim = armed("baseball-bat");
        let at = sim.entity.pos;
        sim.fire(at - Vec2::new(10.0, 0.0), at, false, 0.0);

        let events = sim.drain_events();
        let n = events.len();
        assert!(n >= 2);
        assert_eq!(
            events[n - 2],
            SimEvent::Impact { pos: at, weapon_id: "baseball-bat".into() }
        );
        assert_eq!(
            events[n - 1],
            SimEvent::Hit { weapon_id: "baseball-bat".into(), damage: 10 }
        );
    }

    #[test]
    fn test_unknown_weapon_is_rejected() {
        let mut sim = armed("gun");
        assert!(!sim.select_weapon(Some("laser"), 0.0));
        assert_eq!(sim.selected_weapon.as_deref(), Some("gun"));
    }

    #[test]
    fn test_custom_weapons_get_unique_ids() {
        let mut catalog = WeaponCatalog::default();
        let a = catalog.add_custom("Rubber Chicken!", "Squeaks on impact");
        let b = catalog.add_custom("rubber chicken", "Another one");
        assert_eq!(a, "rubber-chicken");
        assert_eq!(b, "rubber-chicken-2");
        assert_eq!(catalog.get(&b).unwrap().class, WeaponClass::Melee);
        assert_eq!(catalog.add_custom("???", ""), "custom");
    }
}

//! Simulation state and core types
//!
//! Everything the frame step and the input handlers mutate lives on
//! [`Simulation`]. Interaction modes are a tagged union so a drag and a
//! missile flight can never overlap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drag::DragSession;
use super::weapons::{Weapon, WeaponCatalog};
use crate::consts::*;
use crate::stats::SessionStats;
use crate::tuning::Tuning;

/// Usable play surface, measured by the host every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    /// Returns `None` until the surface has a real size
    pub fn measured(width: f32, height: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    /// Origin used for direct fire: top-center of the arena
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, 0.0)
    }
}

/// The buddy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Center in arena-local pixels
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Degrees, always within (-360, 360)
    pub rotation: f32,
    pub half_extents: Vec2,
    /// Under direct pointer control; physics is suspended
    pub is_dragged: bool,
    /// Cosmetic hit flag, cleared once `hit_expires_at` passes
    pub is_hit: bool,
    #[serde(skip)]
    pub hit_expires_at: Option<f64>,
}

impl Entity {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            half_extents: Vec2::new(ENTITY_HALF_WIDTH, ENTITY_HALF_HEIGHT),
            is_dragged: false,
            is_hit: false,
            hit_expires_at: None,
        }
    }

    /// Axis-aligned bounding box test (edges count as inside)
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.pos).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Raise the hit flag until `now_ms + HIT_FLASH_MS`
    pub fn flag_hit(&mut self, now_ms: f64) {
        self.is_hit = true;
        self.hit_expires_at = Some(now_ms + HIT_FLASH_MS);
    }

    /// Drop the hit flag if its window has passed
    pub fn expire_hit(&mut self, now_ms: f64) {
        if let Some(expiry) = self.hit_expires_at {
            if now_ms >= expiry {
                self.is_hit = false;
                self.hit_expires_at = None;
            }
        }
    }

    pub fn clear_hit(&mut self) {
        self.is_hit = false;
        self.hit_expires_at = None;
    }
}

/// A missile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub start: Vec2,
    pub current: Vec2,
    pub end: Vec2,
    /// Rendered heading in degrees
    pub rotation: f32,
    pub target_is_entity: bool,
    pub weapon_id: String,
}

impl Missile {
    /// Angle of the fire vector (radians)
    pub fn fire_angle(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }
}

/// Transient explosion/splat marker for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactEffect {
    pub pos: Vec2,
    pub weapon_id: String,
    pub expires_at: f64,
}

/// What pointer input currently controls
#[derive(Debug, Clone, Default)]
pub enum Mode {
    /// Nothing in progress
    #[default]
    Free,
    /// Buddy follows the pointer
    Dragging(DragSession),
    /// Aim line being drawn
    Aiming { start: Vec2, end: Vec2 },
    /// A missile is travelling; new shots wait for it
    ProjectileInFlight(Missile),
}

impl Mode {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Mode::Dragging(_))
    }

    pub fn missile(&self) -> Option<&Missile> {
        match self {
            Mode::ProjectileInFlight(missile) => Some(missile),
            _ => None,
        }
    }
}

/// Notifications for the UI layer (toasts, sounds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Poked,
    Thrown { vel: Vec2, fallback: bool },
    Fired { weapon_id: String, direct: bool },
    MissileLaunched { weapon_id: String },
    Hit { weapon_id: String, damage: u32 },
    Missed { weapon_id: String },
    Impact { pos: Vec2, weapon_id: String },
}

/// Read-only view for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub entity: Entity,
    pub missile: Option<Missile>,
    pub aim_line: Option<(Vec2, Vec2)>,
    pub impacts: Vec<ImpactEffect>,
    pub selected_weapon: Option<Weapon>,
    pub frame: u64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Seed the RNG was built from (for reproducing a session)
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub entity: Entity,
    pub mode: Mode,
    /// Last measured bounds, `None` until the host reports a size
    pub bounds: Option<ArenaBounds>,
    pub weapons: WeaponCatalog,
    /// Armed weapon id; `None` means hand mode (drag/poke)
    pub selected_weapon: Option<String>,
    pub impacts: Vec<ImpactEffect>,
    pub stats: SessionStats,
    /// Frames advanced so far
    pub frame: u64,
    /// Set after a real throw so the trailing click is not also a poke
    pub suppress_click: bool,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.sanitized(),
            entity: Entity::new(Vec2::new(ENTITY_SPAWN_X, ENTITY_SPAWN_Y)),
            mode: Mode::Free,
            bounds: None,
            weapons: WeaponCatalog::default(),
            selected_weapon: None,
            impacts: Vec::new(),
            stats: SessionStats::new(),
            frame: 0,
            suppress_click: false,
            events: Vec::new(),
        }
    }

    /// Armed weapon, if the id still resolves
    pub fn armed_weapon(&self) -> Option<&Weapon> {
        self.selected_weapon
            .as_deref()
            .and_then(|id| self.weapons.get(id))
    }

    pub fn push_event(&mut self, event: SimEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    /// Hand queued notifications to the host, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let aim_line = match self.mode {
            Mode::Aiming { start, end } => Some((start, end)),
            _ => None,
        };
        Snapshot {
            entity: self.entity.clone(),
            missile: self.mode.missile().cloned(),
            aim_line,
            impacts: self.impacts.clone(),
            selected_weapon: self.armed_weapon().cloned(),
            frame: self.frame,
        }
    }

    /// Stop everything in progress so nothing mutates state after unmount
    pub fn teardown(&mut self) {
        if let Mode::Dragging(_) = self.mode {
            self.entity.is_dragged = false;
        }
        self.mode = Mode::Free;
        self.entity.clear_hit();
        self.impacts.clear();
        self.events.clear();
        self.suppress_click = false;
        log::info!("Simulation torn down after {} frames", self.frame);
    }
}

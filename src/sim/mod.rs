//! Physics and interaction engine
//!
//! All behavior that moves the buddy lives here. This module has no platform
//! dependencies:
//! - Frame-based timestep (velocities are px/frame)
//! - Seeded RNG only
//! - Cosmetic timers are expiry timestamps, never callbacks

pub mod collision;
pub mod drag;
pub mod input;
pub mod physics;
pub mod poke;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{Contacts, resolve_bounds};
pub use drag::{DragSession, PointerSample, PointerSampler, fallback_velocity, throw_velocity};
pub use input::{IgnoreReason, InputOutcome};
pub use physics::integrate;
pub use state::{ArenaBounds, Entity, ImpactEffect, Missile, Mode, SimEvent, Simulation, Snapshot};
pub use tick::advance;
pub use weapons::{Weapon, WeaponCatalog, WeaponClass};

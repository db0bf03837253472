//! Per-frame integrator for the buddy
//!
//! Semi-implicit Euler in frame units: velocity first, then position, then
//! boundary resolution. Rotation is cosmetic and follows horizontal speed.

use super::collision::{Contacts, resolve_bounds};
use super::state::{ArenaBounds, Entity};
use crate::tuning::Tuning;
use crate::wrap_degrees;

/// Below this speed on both axes the buddy stops spinning
const SPIN_THRESHOLD: f32 = 0.1;

/// Advance the buddy by one frame
///
/// A dragged buddy is left untouched. Returns the edges touched this frame.
pub fn integrate(entity: &mut Entity, bounds: ArenaBounds, tuning: &Tuning) -> Contacts {
    if entity.is_dragged {
        return Contacts::default();
    }

    entity.vel.y += tuning.gravity;
    entity.vel *= tuning.air_friction;
    entity.pos += entity.vel;

    let contacts = resolve_bounds(entity, bounds, tuning);

    if entity.vel.x.abs() > SPIN_THRESHOLD || entity.vel.y.abs() > SPIN_THRESHOLD {
        entity.rotation = wrap_degrees(entity.rotation + entity.vel.x * tuning.rotation_coupling);
    }

    contacts
}

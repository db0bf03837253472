//! Per-frame simulation step
//!
//! Called once per display refresh by the host's frame loop.

use super::collision::Contacts;
use super::physics::integrate;
use super::state::{ArenaBounds, Simulation};

/// Advance the simulation by one frame
///
/// Order matters: expired cosmetic state is cleared first, then the missile
/// moves (so an arrival impulse lands in this frame's integration), then the
/// buddy is integrated. Without measured bounds the physics step is skipped
/// and retried next frame. Returns the edges touched, if physics ran.
pub fn advance(sim: &mut Simulation, bounds: Option<ArenaBounds>, now_ms: f64) -> Option<Contacts> {
    sim.frame += 1;

    sim.entity.expire_hit(now_ms);
    sim.impacts.retain(|impact| impact.expires_at > now_ms);

    sim.advance_missile(now_ms);

    let Some(bounds) = bounds.and_then(|b| ArenaBounds::measured(b.width, b.height)) else {
        log::trace!("frame {}: arena not measured, physics skipped", sim.frame);
        return None;
    };
    if sim.bounds != Some(bounds) {
        log::debug!("arena resized to {}x{}", bounds.width, bounds.height);
        sim.bounds = Some(bounds);
    }

    Some(integrate(&mut sim.entity, bounds, &sim.tuning))
}

//! Boundary collision for the buddy's box against the arena edges
//!
//! The arena is an axis-aligned rectangle with the origin at its top-left,
//! y growing downward. The buddy's center is kept inside the rectangle shrunk
//! by its half extents.

use glam::Vec2;

use super::state::{ArenaBounds, Entity};
use crate::tuning::Tuning;

/// Which edges were touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub floor: bool,
    pub ceiling: bool,
    pub wall: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.floor || self.ceiling || self.wall
    }
}

/// Allowed center range along one axis
///
/// When the arena is smaller than the buddy on that axis, both ends collapse
/// onto the arena midline.
#[inline]
pub fn center_range(half_extent: f32, extent: f32) -> (f32, f32) {
    let lo = half_extent;
    let hi = extent - half_extent;
    if hi < lo {
        let mid = extent / 2.0;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Resolve floor, wall and ceiling contacts, in that order
pub fn resolve_bounds(entity: &mut Entity, bounds: ArenaBounds, tuning: &Tuning) -> Contacts {
    let (top, bottom) = center_range(entity.half_extents.y, bounds.height);
    let (left, right) = center_range(entity.half_extents.x, bounds.width);

    let floor = resolve_floor(&mut entity.pos, &mut entity.vel, bottom, tuning);
    let wall = resolve_walls(&mut entity.pos, &mut entity.vel, left, right, tuning);
    let ceiling = resolve_ceiling(&mut entity.pos, &mut entity.vel, top, tuning);

    Contacts { floor, ceiling, wall }
}

/// Bounce off the floor, bleeding horizontal speed and settling to rest
fn resolve_floor(pos: &mut Vec2, vel: &mut Vec2, floor_y: f32, tuning: &Tuning) -> bool {
    if pos.y < floor_y {
        return false;
    }
    pos.y = floor_y;
    vel.y *= -tuning.restitution;
    vel.x *= tuning.ground_friction;
    if vel.y.abs() < 1.0 {
        vel.y = 0.0;
    }
    if vel.x.abs() < 0.1 {
        vel.x = 0.0;
    }
    true
}

fn resolve_walls(pos: &mut Vec2, vel: &mut Vec2, left: f32, right: f32, tuning: &Tuning) -> bool {
    if pos.x <= left {
        pos.x = left;
    } else if pos.x >= right {
        pos.x = right;
    } else {
        return false;
    }
    vel.x *= -tuning.restitution;
    true
}

fn resolve_ceiling(pos: &mut Vec2, vel: &mut Vec2, ceiling_y: f32, tuning: &Tuning) -> bool {
    if pos.y > ceiling_y {
        return false;
    }
    pos.y = ceiling_y;
    vel.y *= -tuning.restitution;
    true
}

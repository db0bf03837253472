//! Pointer and click routing
//!
//! The host translates device coordinates into arena-local pixels and calls
//! these between frames. Hand mode (no weapon) drags and pokes; weapon mode
//! aims and fires. Requests that make no sense in the current mode are
//! dropped and reported as [`InputOutcome::Ignored`].

use glam::Vec2;

use super::state::{Mode, Simulation};

/// Why an input event was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A drag or aim already owns the pointer
    Busy,
    /// A missile is still travelling
    ProjectileInFlight,
    /// Nothing under the pointer to act on
    NoTarget,
    /// No drag or aim to continue or finish
    NotActive,
    /// Weapon mode owns clicks on the buddy
    WeaponArmed,
    /// Trailing click of a throw
    AfterThrow,
}

/// Result of feeding one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Accepted,
    Ignored(IgnoreReason),
}

impl InputOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InputOutcome::Accepted)
    }
}

fn ignored(event: &str, reason: IgnoreReason) -> InputOutcome {
    log::debug!("{} ignored: {:?}", event, reason);
    InputOutcome::Ignored(reason)
}

impl Simulation {
    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) -> InputOutcome {
        match self.mode {
            Mode::Free => {}
            Mode::ProjectileInFlight(_) => {
                return ignored("pointer down", IgnoreReason::ProjectileInFlight);
            }
            Mode::Dragging(_) | Mode::Aiming { .. } => {
                return ignored("pointer down", IgnoreReason::Busy);
            }
        }

        let on_entity = self.entity.contains(pos);
        match (self.armed_weapon().is_some(), on_entity) {
            (true, true) => {
                let origin = match self.bounds {
                    Some(bounds) => bounds.top_center(),
                    None => Vec2::new(self.entity.pos.x, 0.0),
                };
                let target = self.entity.pos;
                self.fire(origin, target, true, now_ms);
            }
            (true, false) => {
                self.mode = Mode::Aiming { start: pos, end: pos };
            }
            (false, true) => self.begin_drag(pos, now_ms),
            (false, false) => return ignored("pointer down", IgnoreReason::NoTarget),
        }
        InputOutcome::Accepted
    }

    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) -> InputOutcome {
        if let Mode::Aiming { end, .. } = &mut self.mode {
            *end = pos;
            return InputOutcome::Accepted;
        }
        if self.mode.is_dragging() {
            self.drag_to(pos, now_ms);
            return InputOutcome::Accepted;
        }
        // Hover moves are constant noise, not worth a log line
        InputOutcome::Ignored(IgnoreReason::NotActive)
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> InputOutcome {
        match self.mode {
            Mode::Dragging(_) => {
                self.release_drag(now_ms);
            }
            Mode::Aiming { start, end } => self.fire(start, end, false, now_ms),
            _ => return ignored("pointer up", IgnoreReason::NotActive),
        }
        InputOutcome::Accepted
    }

    /// Pointer capture lost: finish whatever was in progress as a release
    pub fn pointer_cancel(&mut self, now_ms: f64) -> InputOutcome {
        self.pointer_up(now_ms)
    }

    pub fn click(&mut self, pos: Vec2, now_ms: f64) -> InputOutcome {
        if std::mem::take(&mut self.suppress_click) {
            return ignored("click", IgnoreReason::AfterThrow);
        }
        match self.mode {
            Mode::Free => {}
            Mode::ProjectileInFlight(_) => {
                return ignored("click", IgnoreReason::ProjectileInFlight);
            }
            Mode::Dragging(_) | Mode::Aiming { .. } => {
                return ignored("click", IgnoreReason::Busy);
            }
        }
        if self.armed_weapon().is_some() {
            return ignored("click", IgnoreReason::WeaponArmed);
        }
        if !self.entity.contains(pos) {
            return ignored("click", IgnoreReason::NoTarget);
        }

        self.poke(now_ms);
        InputOutcome::Accepted
    }
}

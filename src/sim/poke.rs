//! Click/poke: a random shove with a little upward hop

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{SimEvent, Simulation};
use crate::{direction, wrap_degrees};

impl Simulation {
    /// Shove the buddy in a random direction and flash the hit flag
    pub(crate) fn poke(&mut self, now_ms: f64) {
        let theta = self.rng.random_range(0.0..TAU);
        let spin = (self.rng.random::<f32>() - 0.5) * self.tuning.click_spin;

        let impulse = direction(theta) * self.tuning.click_impulse
            - Vec2::new(0.0, self.tuning.click_lift);
        self.entity.vel += impulse;
        self.entity.rotation = wrap_degrees(self.entity.rotation + spin);
        self.entity.flag_hit(now_ms);

        self.push_event(SimEvent::Poked);
    }
}

//! Drag and throw
//!
//! While dragging, the buddy's center tracks the pointer at a fixed offset.
//! On release the last two pointer samples give an instantaneous pointer
//! velocity, which is rescaled into px/frame so the throw feels the same at
//! any refresh rate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Mode, SimEvent, Simulation};
use crate::consts::*;
use crate::tuning::Tuning;

/// A timestamped pointer position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pos: Vec2,
    pub timestamp_ms: f64,
}

/// Keeps only the two most recent pointer samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSampler {
    pub previous: PointerSample,
    pub current: PointerSample,
}

impl PointerSampler {
    /// Both slots start at the same sample
    pub fn seeded(sample: PointerSample) -> Self {
        Self {
            previous: sample,
            current: sample,
        }
    }

    pub fn record(&mut self, sample: PointerSample) {
        self.previous = self.current;
        self.current = sample;
    }

    /// Seconds between the two samples
    pub fn elapsed_secs(&self) -> f64 {
        (self.current.timestamp_ms - self.previous.timestamp_ms) / 1000.0
    }
}

/// An active drag
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Pointer minus buddy center at grab time
    pub offset: Vec2,
    pub sampler: PointerSampler,
    /// Total pointer path length during this drag
    pub travelled: f32,
}

/// Release velocity from the two retained samples
///
/// Returns `None` when the samples cannot give a trustworthy speed: no
/// motion, or a gap outside the plausible window.
pub fn throw_velocity(sampler: &PointerSampler, tuning: &Tuning) -> Option<Vec2> {
    let dt = sampler.elapsed_secs();
    let min_dt = THROW_MIN_DT_MS / 1000.0;
    let max_dt = THROW_MAX_DT_MS / 1000.0;
    if !(dt > min_dt && dt < max_dt) {
        return None;
    }

    let delta = sampler.current.pos - sampler.previous.pos;
    if delta == Vec2::ZERO {
        return None;
    }

    let pointer_vel = delta / dt as f32;
    let vel = pointer_vel * (TARGET_FRAME_SECS * tuning.throw_multiplier);
    let cap = Vec2::splat(tuning.max_throw_speed);
    let vel = vel.clamp(-cap, cap);
    vel.is_finite().then_some(vel)
}

/// Small random toss, biased upward, for releases without usable motion
pub fn fallback_velocity<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec2 {
    let vx = (rng.random::<f32>() - 0.5) * tuning.fallback_spread;
    let vy = -rng.random::<f32>() * tuning.fallback_lift;
    Vec2::new(vx, vy)
}

impl Simulation {
    /// Grab the buddy at `pointer`
    pub(crate) fn begin_drag(&mut self, pointer: Vec2, now_ms: f64) {
        let sample = PointerSample {
            pos: pointer,
            timestamp_ms: now_ms,
        };
        self.mode = Mode::Dragging(DragSession {
            offset: pointer - self.entity.pos,
            sampler: PointerSampler::seeded(sample),
            travelled: 0.0,
        });
        self.entity.is_dragged = true;
        self.entity.clear_hit();
        self.entity.vel = Vec2::ZERO;
        self.suppress_click = false;
        log::debug!("drag start at ({:.1}, {:.1})", pointer.x, pointer.y);
    }

    /// Move the grabbed buddy with the pointer
    pub(crate) fn drag_to(&mut self, pointer: Vec2, now_ms: f64) {
        let Mode::Dragging(session) = &mut self.mode else {
            return;
        };
        session.travelled += (pointer - session.sampler.current.pos).length();
        session.sampler.record(PointerSample {
            pos: pointer,
            timestamp_ms: now_ms,
        });
        self.entity.pos = pointer - session.offset;
    }

    /// Let go and throw; returns the applied velocity
    pub(crate) fn release_drag(&mut self, now_ms: f64) -> Option<Vec2> {
        if !self.mode.is_dragging() {
            return None;
        }
        let Mode::Dragging(session) = std::mem::take(&mut self.mode) else {
            return None;
        };

        let stale = now_ms - session.sampler.current.timestamp_ms >= THROW_MAX_DT_MS;
        let measured = if stale {
            None
        } else {
            throw_velocity(&session.sampler, &self.tuning)
        };
        let fallback = measured.is_none();
        let vel = measured.unwrap_or_else(|| fallback_velocity(&mut self.rng, &self.tuning));

        self.entity.is_dragged = false;
        self.entity.vel = vel;
        self.suppress_click = session.travelled > CLICK_SLOP;

        log::debug!(
            "thrown at ({:.2}, {:.2}) px/frame{}",
            vel.x,
            vel.y,
            if fallback { " (fallback)" } else { "" }
        );
        self.push_event(SimEvent::Thrown { vel, fallback });
        Some(vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sampler(a: (f32, f32, f64), b: (f32, f32, f64)) -> PointerSampler {
        PointerSampler {
            previous: PointerSample {
                pos: Vec2::new(a.0, a.1),
                timestamp_ms: a.2,
            },
            current: PointerSample {
                pos: Vec2::new(b.0, b.1),
                timestamp_ms: b.2,
            },
        }
    }

    #[test]
    fn test_throw_velocity_from_two_samples() {
        let tuning = Tuning::default();
        let s = sampler((100.0, 100.0, 1000.0), (150.0, 80.0, 1100.0));

        let vel = throw_velocity(&s, &tuning).unwrap();

        // (50, -20) px over 0.1 s = (500, -200) px/s, times 1/60 * 1.2
        assert!((vel.x - 10.0).abs() < 1e-3);
        assert!((vel.y + 4.0).abs() < 1e-3);
        assert_eq!(throw_velocity(&s, &tuning), Some(vel));
    }

    #[test]
    fn test_throw_velocity_accepts_fractional_timestamps() {
        // Event timestamps are high resolution; a 2.25 ms gap is usable
        let tuning = Tuning::default();
        let s = sampler((0.0, 0.0, 1000.25), (3.0, 0.0, 1002.5));

        let vel = throw_velocity(&s, &tuning).unwrap();

        let expected = 3.0 / 0.00225 * (1.0 / 60.0) * 1.2;
        assert!((vel.x - expected as f32).abs() < 1e-2);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_throw_velocity_is_clamped_per_axis() {
        let tuning = Tuning::default();
        let s = sampler((0.0, 0.0, 0.0), (400.0, -900.0, 20.0));

        let vel = throw_velocity(&s, &tuning).unwrap();

        assert_eq!(vel.x, tuning.max_throw_speed);
        assert_eq!(vel.y, -tuning.max_throw_speed);
    }

    #[test]
    fn test_throw_velocity_rejects_degenerate_timing() {
        let tuning = Tuning::default();
        assert!(throw_velocity(&sampler((0.0, 0.0, 10.0), (50.0, 0.0, 10.5)), &tuning).is_none());
        assert!(throw_velocity(&sampler((0.0, 0.0, 10.0), (50.0, 0.0, 10.0)), &tuning).is_none());
        assert!(throw_velocity(&sampler((0.0, 0.0, 0.0), (50.0, 0.0, 500.0)), &tuning).is_none());
        assert!(throw_velocity(&sampler((0.0, 0.0, 20.0), (50.0, 0.0, 10.0)), &tuning).is_none());
        assert!(throw_velocity(&sampler((5.0, 5.0, 0.0), (5.0, 5.0, 50.0)), &tuning).is_none());
    }

    #[test]
    fn test_fallback_is_bounded_and_upward() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let vel = fallback_velocity(&mut rng, &tuning);
            assert!(vel.is_finite());
            assert!(vel.x.abs() <= tuning.fallback_spread / 2.0);
            assert!(vel.y <= 0.0 && vel.y >= -tuning.fallback_lift);
        }
    }

    #[test]
    fn test_drag_follows_pointer_with_offset() {
        let mut sim = Simulation::new(1, Tuning::default());
        sim.entity.pos = Vec2::new(200.0, 200.0);
        sim.entity.vel = Vec2::new(4.0, 4.0);

        sim.begin_drag(Vec2::new(210.0, 190.0), 0.0);
        assert!(sim.entity.is_dragged);
        assert_eq!(sim.entity.vel, Vec2::ZERO);

        sim.drag_to(Vec2::new(310.0, 140.0), 16.0);
        assert_eq!(sim.entity.pos, Vec2::new(300.0, 150.0));

        let Mode::Dragging(session) = &sim.mode else {
            panic!("expected drag mode");
        };
        assert_eq!(session.sampler.previous.pos, Vec2::new(210.0, 190.0));
        assert_eq!(session.sampler.current.pos, Vec2::new(310.0, 140.0));
    }

    #[test]
    fn test_release_with_sub_millisecond_gap_uses_fallback() {
        let mut sim = Simulation::new(9, Tuning::default());
        sim.begin_drag(sim.entity.pos, 100.0);
        sim.drag_to(sim.entity.pos + Vec2::new(40.0, 0.0), 100.5);

        let vel = sim.release_drag(100.5).unwrap();

        assert!(vel.is_finite());
        assert!(vel.x.abs() <= sim.tuning.fallback_spread / 2.0);
        assert!(!sim.entity.is_dragged);
        assert!(matches!(sim.mode, Mode::Free));
        assert!(matches!(
            sim.drain_events().last(),
            Some(SimEvent::Thrown { fallback: true, .. })
        ));
    }

    #[test]
    fn test_release_after_long_pause_is_stale() {
        let mut sim = Simulation::new(9, Tuning::default());
        sim.begin_drag(sim.entity.pos, 0.0);
        sim.drag_to(sim.entity.pos + Vec2::new(40.0, 0.0), 50.0);

        sim.release_drag(2000.0);

        assert!(matches!(
            sim.drain_events().last(),
            Some(SimEvent::Thrown { fallback: true, .. })
        ));
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut sim = Simulation::new(9, Tuning::default());
        assert!(sim.release_drag(0.0).is_none());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_release_leaves_missile_in_flight() {
        let mut sim = Simulation::new(9, Tuning::default());
        sim.selected_weapon = Some("missile".into());
        sim.fire(Vec2::ZERO, Vec2::new(500.0, 0.0), false, 0.0);
        sim.drain_events();

        assert!(sim.release_drag(0.0).is_none());

        assert!(sim.mode.missile().is_some());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_short_wiggle_keeps_following_click() {
        let mut sim = Simulation::new(9, Tuning::default());
        let grab = sim.entity.pos;
        sim.begin_drag(grab, 0.0);
        sim.drag_to(grab + Vec2::new(CLICK_SLOP, 0.0), 20.0);
        sim.release_drag(30.0);
        assert!(!sim.suppress_click);

        sim.begin_drag(sim.entity.pos, 100.0);
        sim.drag_to(sim.entity.pos + Vec2::new(CLICK_SLOP + 1.0, 0.0), 120.0);
        sim.release_drag(130.0);
        assert!(sim.suppress_click);
    }
}

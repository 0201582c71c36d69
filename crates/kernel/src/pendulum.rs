use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gravitational acceleration.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
/// Inverse of the bob mass.
pub const INV_MASS: f32 = 2.0;
/// Linear velocity damping.
pub const DAMPING_COEFFICIENT: f32 = 0.05;
/// Hooke constant of the zero-rest-length spring.
pub const SPRING_CONSTANT: f32 = 0.5;

/// A mutation applied to the pendulum.
///
/// The log of these events is the complete input history: replaying it from
/// the same anchor reproduces the state bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PendulumEvent {
    /// One explicit-Euler step of `dt` seconds, producing `tick`.
    Stepped { tick: u64, dt: f32 },
    /// Bob was moved to `position` and its velocity cleared.
    Repositioned { position: Vec3 },
}

/// Point mass hanging from a fixed anchor by a damped spring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    anchor: Vec3,
    position: Vec3,
    velocity: Vec3,
    tick: u64,
    #[serde(skip)]
    recording: bool,
    #[serde(skip)]
    event_log: Vec<PendulumEvent>,
}

impl Pendulum {
    /// Bob at rest on the anchor.
    pub fn new(anchor: Vec3) -> Self {
        Self {
            anchor,
            position: anchor,
            velocity: Vec3::ZERO,
            tick: 0,
            recording: false,
            event_log: Vec::new(),
        }
    }

    /// Like [`Pendulum::new`], but every mutation is appended to the event log.
    pub fn recording(anchor: Vec3) -> Self {
        Self {
            recording: true,
            ..Self::new(anchor)
        }
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Number of integration steps taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Read-only access to the event log. Empty unless recording.
    pub fn events(&self) -> &[PendulumEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<PendulumEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Move the bob and clear its velocity. The position is not validated.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        tracing::debug!(?position, "pendulum repositioned");
        if self.recording {
            self.event_log.push(PendulumEvent::Repositioned { position });
        }
    }

    /// Acceleration at the current state.
    pub fn acceleration(&self) -> Vec3 {
        acceleration(self.position, self.velocity, self.anchor)
    }

    /// Advance by one explicit-Euler step of `dt` seconds.
    ///
    /// `dt` is not clamped; steps much larger than a frame make the spring
    /// unstable.
    pub fn update(&mut self, dt: f32) {
        let a = self.acceleration();
        // Order matters: position uses the velocity from before this step.
        self.position += dt * self.velocity;
        self.velocity += dt * a;
        self.tick += 1;

        tracing::trace!(tick = self.tick, dt, position = ?self.position, "pendulum step");
        if self.recording {
            self.event_log.push(PendulumEvent::Stepped {
                tick: self.tick,
                dt,
            });
        }
    }

    /// Rest position where spring force balances gravity.
    pub fn equilibrium(&self) -> Vec3 {
        self.anchor + GRAVITY / (INV_MASS * SPRING_CONSTANT)
    }

    /// Rebuild a recording pendulum from an anchor and its event history.
    pub fn replay(anchor: Vec3, events: &[PendulumEvent]) -> Self {
        let mut pendulum = Self::recording(anchor);
        for event in events {
            match *event {
                PendulumEvent::Stepped { dt, .. } => pendulum.update(dt),
                PendulumEvent::Repositioned { position } => pendulum.set_position(position),
            }
        }
        pendulum
    }

    /// Deterministic hash of the simulation state for comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for v in [self.anchor, self.position, self.velocity] {
            for c in v.to_array() {
                mix(&mut h, &c.to_le_bytes());
            }
        }
        h
    }
}

/// Gravity plus the damped spring pulling `position` toward `anchor`.
pub fn acceleration(position: Vec3, velocity: Vec3, anchor: Vec3) -> Vec3 {
    GRAVITY
        + INV_MASS * (-velocity * DAMPING_COEFFICIENT + SPRING_CONSTANT * (anchor - position))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Vec3 = Vec3::new(0.0, 10.0, 0.0);

    #[test]
    fn starts_at_rest_on_anchor() {
        let p = Pendulum::new(ANCHOR);
        assert_eq!(p.anchor(), ANCHOR);
        assert_eq!(p.position(), ANCHOR);
        assert_eq!(p.velocity(), Vec3::ZERO);
        assert_eq!(p.tick(), 0);
    }

    #[test]
    fn first_step_from_anchor_only_feels_gravity() {
        let mut p = Pendulum::new(ANCHOR);
        p.update(0.016);
        // Pre-step velocity was zero, so the bob has not moved yet.
        assert_eq!(p.position(), ANCHOR);
        assert!(p.velocity().abs_diff_eq(0.016 * GRAVITY, 1e-6));
    }

    #[test]
    fn step_after_reposition_uses_zero_velocity() {
        let mut p = Pendulum::new(ANCHOR);
        p.update(0.016);
        p.update(0.016);
        p.set_position(Vec3::new(5.0, 10.0, 0.0));
        assert_eq!(p.velocity(), Vec3::ZERO);

        let expected_a = acceleration(Vec3::new(5.0, 10.0, 0.0), Vec3::ZERO, ANCHOR);
        assert!(expected_a.abs_diff_eq(Vec3::new(-5.0, -9.81, 0.0), 1e-6));

        p.update(0.1);
        assert_eq!(p.position(), Vec3::new(5.0, 10.0, 0.0));
        assert_eq!(p.velocity(), 0.1 * expected_a);
        assert!(p.velocity().abs_diff_eq(Vec3::new(-0.5, -0.981, 0.0), 1e-6));
    }

    #[test]
    fn position_integrates_previous_velocity() {
        let mut p = Pendulum::new(ANCHOR);
        p.set_position(Vec3::new(2.0, 4.0, -1.0));
        p.update(0.05);
        let v1 = p.velocity();
        let x1 = p.position();
        let a1 = p.acceleration();
        p.update(0.05);
        assert_eq!(p.position(), x1 + 0.05 * v1);
        assert_eq!(p.velocity(), v1 + 0.05 * a1);
    }

    #[test]
    fn damping_opposes_velocity() {
        let a_still = acceleration(ANCHOR, Vec3::ZERO, ANCHOR);
        let a_moving = acceleration(ANCHOR, Vec3::new(1.0, 0.0, 0.0), ANCHOR);
        let diff = a_moving - a_still;
        assert!(diff.abs_diff_eq(Vec3::new(-INV_MASS * DAMPING_COEFFICIENT, 0.0, 0.0), 1e-7));
    }

    #[test]
    fn settles_at_equilibrium_below_anchor() {
        let mut p = Pendulum::new(ANCHOR);
        p.set_position(Vec3::new(3.0, 12.0, -2.0));
        for _ in 0..30_000 {
            p.update(0.01);
        }
        let eq = p.equilibrium();
        assert!(eq.abs_diff_eq(Vec3::new(0.0, 0.19, 0.0), 1e-5));
        assert!(p.position().abs_diff_eq(eq, 1e-2), "{:?}", p.position());
        assert!(p.velocity().length() < 1e-2);
    }

    #[test]
    fn stays_finite_at_frame_rate() {
        let mut p = Pendulum::new(ANCHOR);
        p.set_position(Vec3::new(-20.0, 40.0, 15.0));
        for _ in 0..10_000 {
            p.update(1.0 / 60.0);
            assert!(p.position().is_finite());
            assert!(p.velocity().is_finite());
        }
    }

    #[test]
    fn large_dt_is_not_clamped() {
        let mut p = Pendulum::new(ANCHOR);
        let start = (p.position() - p.equilibrium()).length();
        for _ in 0..100 {
            p.update(0.5);
        }
        let end = (p.position() - p.equilibrium()).length();
        assert!(end > start * 10.0, "explicit Euler should diverge: {end}");
    }

    #[test]
    fn plain_pendulum_does_not_record() {
        let mut p = Pendulum::new(ANCHOR);
        p.update(0.016);
        p.set_position(Vec3::ONE);
        assert!(!p.is_recording());
        assert!(p.events().is_empty());
    }

    #[test]
    fn recording_logs_every_mutation() {
        let mut p = Pendulum::recording(ANCHOR);
        p.update(0.016);
        p.set_position(Vec3::new(1.0, 2.0, 3.0));
        p.update(0.02);
        assert_eq!(
            p.events(),
            &[
                PendulumEvent::Stepped { tick: 1, dt: 0.016 },
                PendulumEvent::Repositioned {
                    position: Vec3::new(1.0, 2.0, 3.0)
                },
                PendulumEvent::Stepped { tick: 2, dt: 0.02 },
            ]
        );
        let drained = p.drain_events();
        assert_eq!(drained.len(), 3);
        assert!(p.events().is_empty());
    }

    #[test]
    fn replay_equivalence() {
        let mut p = Pendulum::recording(ANCHOR);
        for i in 0..500 {
            if i % 97 == 0 {
                p.set_position(Vec3::new(i as f32 * 0.1, 5.0, -3.0));
            }
            p.update(0.016 + (i % 7) as f32 * 0.001);
        }

        let replayed = Pendulum::replay(ANCHOR, p.events());
        assert_eq!(replayed.state_hash(), p.state_hash());
        assert_eq!(replayed.position(), p.position());
        assert_eq!(replayed.velocity(), p.velocity());
        assert_eq!(replayed.tick(), p.tick());
        assert_eq!(replayed.events(), p.events());
    }

    #[test]
    fn state_hash_tracks_state() {
        let mut a = Pendulum::new(ANCHOR);
        let mut b = Pendulum::new(ANCHOR);
        assert_eq!(a.state_hash(), b.state_hash());
        a.update(0.016);
        assert_ne!(a.state_hash(), b.state_hash());
        b.update(0.016);
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn deterministic_across_runs() {
        let run = || {
            let mut p = Pendulum::new(ANCHOR);
            p.set_position(Vec3::new(4.0, 7.0, 1.0));
            for _ in 0..1000 {
                p.update(1.0 / 60.0);
            }
            p.position()
        };
        let first = run();
        for _ in 0..5 {
            assert_eq!(run(), first);
        }
    }
}

//! Pendulum Kernel: authoritative bob state and explicit-Euler stepping.
//!
//! # Invariants
//! - The anchor never changes after construction.
//! - Position integrates the pre-step velocity; velocity integrates the
//!   acceleration sampled at the start of the step.
//! - State is a pure function of the anchor and the `(dt, reposition)` history.

pub mod pendulum;

pub use pendulum::{
    DAMPING_COEFFICIENT, GRAVITY, INV_MASS, Pendulum, PendulumEvent, SPRING_CONSTANT,
};

pub fn crate_info() -> &'static str {
    "pendulum-kernel v0.1.0"
}

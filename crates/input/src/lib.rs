//! Input mapping: held arrow keys and pointer presses turned into actions.
//!
//! # Invariants
//! - The frame driver consumes actions, never raw window events.
//! - Opposing keys resolve the same way every frame: down beats up, right beats left.
//! - At most one pick is applied per frame; the latest pointer event wins.

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{InputState, OrbitKey};

pub fn crate_info() -> &'static str {
    "pendulum-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}

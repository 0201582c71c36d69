//! Developer tooling: read-only inspection of a running session.
//!
//! # Invariants
//! - Inspection never mutates the session.

pub mod inspector;

pub use inspector::{SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "pendulum-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}

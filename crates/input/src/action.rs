use pendulum_common::OrbitDelta;

/// A high-level action produced from one frame of input.
///
/// The session consumes actions, never raw key or mouse events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the camera along its orbit.
    Orbit(OrbitDelta),
    /// Move the bob under the pointer at window pixel `(x, y)`.
    Pick { x: f32, y: f32 },
    /// Nothing to do this frame.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        match self {
            Action::Noop => true,
            Action::Orbit(delta) => delta.is_zero(),
            Action::Pick { .. } => false,
        }
    }
}

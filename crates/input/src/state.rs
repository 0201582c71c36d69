use pendulum_common::{OrbitDelta, OrbitSteps};

use crate::action::Action;

/// Keys that orbit the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitKey {
    /// Move closer.
    Up,
    /// Move further away.
    Down,
    Left,
    Right,
}

/// Held-key and pending-pick state between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    primary_down: bool,
    pending_pick: Option<(f32, f32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: OrbitKey, pressed: bool) {
        let slot = match key {
            OrbitKey::Up => &mut self.up,
            OrbitKey::Down => &mut self.down,
            OrbitKey::Left => &mut self.left,
            OrbitKey::Right => &mut self.right,
        };
        *slot = pressed;
    }

    /// Camera change for the keys currently held.
    pub fn orbit_delta(&self, steps: &OrbitSteps) -> OrbitDelta {
        let distance = if self.down {
            steps.distance
        } else if self.up {
            -steps.distance
        } else {
            0.0
        };
        let angle = if self.right {
            -steps.angle
        } else if self.left {
            steps.angle
        } else {
            0.0
        };
        OrbitDelta::new(distance, angle)
    }

    pub fn set_primary(&mut self, pressed: bool) {
        self.primary_down = pressed;
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    /// Record a pointer event. While the primary button is held every event
    /// requests a pick, so dragging keeps repositioning the bob.
    pub fn pointer(&mut self, x: f32, y: f32) {
        if self.primary_down {
            tracing::trace!(x, y, "pick requested");
            self.pending_pick = Some((x, y));
        }
    }

    /// Press the primary button at `(x, y)` and request a pick there.
    pub fn press_at(&mut self, x: f32, y: f32) {
        self.primary_down = true;
        self.pointer(x, y);
    }

    /// The latest pick requested since the last call.
    pub fn take_pick(&mut self) -> Option<(f32, f32)> {
        self.pending_pick.take()
    }

    /// Drain one frame of input into actions: pick first, then orbit.
    pub fn actions(&mut self, steps: &OrbitSteps) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some((x, y)) = self.take_pick() {
            actions.push(Action::Pick { x, y });
        }
        let delta = self.orbit_delta(steps);
        if !delta.is_zero() {
            actions.push(Action::Orbit(delta));
        }
        if actions.is_empty() {
            actions.push(Action::Noop);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> OrbitSteps {
        OrbitSteps::default()
    }

    #[test]
    fn no_keys_no_motion() {
        let input = InputState::new();
        assert!(input.orbit_delta(&steps()).is_zero());
    }

    #[test]
    fn single_keys() {
        let mut input = InputState::new();
        input.set_key(OrbitKey::Up, true);
        assert_eq!(input.orbit_delta(&steps()), OrbitDelta::new(-0.4, 0.0));
        input.set_key(OrbitKey::Up, false);
        input.set_key(OrbitKey::Left, true);
        assert_eq!(input.orbit_delta(&steps()), OrbitDelta::new(0.0, 0.1));
        input.set_key(OrbitKey::Left, false);
        input.set_key(OrbitKey::Right, true);
        assert_eq!(input.orbit_delta(&steps()), OrbitDelta::new(0.0, -0.1));
    }

    #[test]
    fn down_beats_up_and_right_beats_left() {
        let mut input = InputState::new();
        for key in [OrbitKey::Up, OrbitKey::Down, OrbitKey::Left, OrbitKey::Right] {
            input.set_key(key, true);
        }
        assert_eq!(input.orbit_delta(&steps()), OrbitDelta::new(0.4, -0.1));
    }

    #[test]
    fn pointer_without_button_does_not_pick() {
        let mut input = InputState::new();
        input.pointer(10.0, 20.0);
        assert_eq!(input.take_pick(), None);
    }

    #[test]
    fn drag_keeps_only_latest_pick() {
        let mut input = InputState::new();
        input.press_at(10.0, 20.0);
        input.pointer(30.0, 40.0);
        input.pointer(50.0, 60.0);
        assert_eq!(input.take_pick(), Some((50.0, 60.0)));
        assert_eq!(input.take_pick(), None);

        input.set_primary(false);
        input.pointer(70.0, 80.0);
        assert_eq!(input.take_pick(), None);
    }

    #[test]
    fn actions_for_frame() {
        let mut input = InputState::new();
        assert_eq!(input.actions(&steps()), vec![Action::Noop]);

        input.press_at(5.0, 6.0);
        input.set_key(OrbitKey::Down, true);
        assert_eq!(
            input.actions(&steps()),
            vec![
                Action::Pick { x: 5.0, y: 6.0 },
                Action::Orbit(OrbitDelta::new(0.4, 0.0))
            ]
        );
        assert_eq!(
            input.actions(&steps()),
            vec![Action::Orbit(OrbitDelta::new(0.4, 0.0))]
        );
    }
}

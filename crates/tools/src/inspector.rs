use glam::Vec3;
use pendulum_render::{Session, SpringBasis};
use serde::Serialize;

/// Session inspector for developer tooling.
///
/// Provides read-only queries against a session for the debug overlay and
/// the CLI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let pendulum = session.pendulum();
        let camera = session.camera();
        let spring = SpringBasis::new(pendulum.anchor(), pendulum.position());
        SessionSummary {
            tick: pendulum.tick(),
            bob: pendulum.position().to_array(),
            velocity: pendulum.velocity().to_array(),
            speed: pendulum.velocity().length(),
            spring_length: spring.length(),
            equilibrium_offset: (pendulum.position() - pendulum.equilibrium()).length(),
            camera_distance: camera.distance(),
            camera_angle: camera.angle(),
            recorded_events: pendulum.events().len(),
            state_hash: pendulum.state_hash(),
        }
    }

    /// Kinetic energy per unit mass of the bob.
    pub fn kinetic_energy(session: &Session) -> f32 {
        let v: Vec3 = session.pendulum().velocity();
        0.5 * v.length_squared()
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub tick: u64,
    pub bob: [f32; 3],
    pub velocity: [f32; 3],
    pub speed: f32,
    pub spring_length: f32,
    /// Distance from the bob to the resting point.
    pub equilibrium_offset: f32,
    pub camera_distance: f32,
    pub camera_angle: f32,
    pub recorded_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: tick={} bob=({:.2}, {:.2}, {:.2}) speed={:.3} spring={:.3}",
            self.tick, self.bob[0], self.bob[1], self.bob[2], self.speed, self.spring_length,
        )?;
        write!(
            f,
            " camera=({:.1}, {:.2})",
            self.camera_distance, self.camera_angle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pendulum_common::{OrbitDelta, SceneConfig};

    fn session() -> Session {
        Session::new(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn summary_fresh_session() {
        let s = session();
        let summary = SessionInspector::summary(&s);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.bob, [0.0, 10.0, 0.0]);
        assert_eq!(summary.speed, 0.0);
        assert_eq!(summary.spring_length, 0.0);
        assert_eq!(summary.camera_distance, 60.0);
        assert_eq!(summary.recorded_events, 0);
        assert!((summary.equilibrium_offset - 9.81).abs() < 1e-4);
    }

    #[test]
    fn summary_after_steps() {
        let mut s = Session::recording(&SceneConfig::default()).unwrap();
        s.advance(OrbitDelta::new(0.4, 0.0), 0.016);
        s.advance(OrbitDelta::NONE, 0.016);

        let summary = SessionInspector::summary(&s);
        assert_eq!(summary.tick, 2);
        assert_eq!(summary.recorded_events, 2);
        assert!(summary.speed > 0.0);
        assert!(summary.spring_length > 0.0);
        assert!((summary.camera_distance - 60.4).abs() < 1e-4);
        assert_eq!(summary.state_hash, s.pendulum().state_hash());
    }

    #[test]
    fn kinetic_energy_tracks_speed() {
        let mut s = session();
        assert_eq!(SessionInspector::kinetic_energy(&s), 0.0);
        s.advance(OrbitDelta::NONE, 0.016);
        let speed = SessionInspector::summary(&s).speed;
        assert!((SessionInspector::kinetic_energy(&s) - 0.5 * speed * speed).abs() < 1e-6);
    }

    #[test]
    fn summary_display() {
        let summary = SessionInspector::summary(&session());
        let s = format!("{summary}");
        assert!(s.contains("tick=0"));
        assert!(s.contains("bob=(0.00, 10.00, 0.00)"));
    }

    #[test]
    fn summary_serializes() {
        let summary = SessionInspector::summary(&session());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tick"], 0);
        assert_eq!(json["camera_distance"], 60.0);
    }
}

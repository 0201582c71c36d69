use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{what} must be at least 2, got {got}")]
    TooFewSubdivisions { what: &'static str, got: u32 },
    #[error("window size must be non-zero, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },
}

/// Camera change applied per frame while an orbit key is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSteps {
    pub distance: f32,
    pub angle: f32,
}

impl Default for OrbitSteps {
    fn default() -> Self {
        Self {
            distance: 0.4,
            angle: 0.1,
        }
    }
}

/// Startup parameters for a pendulum session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Fixed spring attachment point.
    pub anchor: Vec3,
    pub camera_distance: f32,
    pub camera_angle: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub sphere_rings: u32,
    pub sphere_slices: u32,
    pub cylinder_sectors: u32,
    /// Point light position relative to the anchor.
    pub light_offset: Vec3,
    pub orbit_steps: OrbitSteps,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::new(0.0, 10.0, 0.0),
            camera_distance: 60.0,
            camera_angle: 0.0,
            window_width: 640,
            window_height: 640,
            sphere_rings: 200,
            sphere_slices: 200,
            cylinder_sectors: 200,
            light_offset: Vec3::new(4.0, 10.0, 0.0),
            orbit_steps: OrbitSteps::default(),
        }
    }
}

impl SceneConfig {
    pub fn light_position(&self) -> Vec3 {
        self.anchor + self.light_offset
    }

    pub fn aspect(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (what, got) in [
            ("sphere rings", self.sphere_rings),
            ("sphere slices", self.sphere_slices),
            ("cylinder sectors", self.cylinder_sectors),
        ] {
            if got < 2 {
                return Err(ConfigError::TooFewSubdivisions { what, got });
            }
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window_width,
                height: self.window_height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.anchor, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(config.light_position(), Vec3::new(4.0, 20.0, 0.0));
        assert_eq!(config.aspect(), 1.0);
    }

    #[test]
    fn rejects_low_subdivision() {
        let config = SceneConfig {
            cylinder_sectors: 1,
            ..SceneConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewSubdivisions {
                what: "cylinder sectors",
                got: 1
            })
        );
    }

    #[test]
    fn rejects_empty_window() {
        let config = SceneConfig {
            window_height: 0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyWindow { .. })
        ));
    }
}

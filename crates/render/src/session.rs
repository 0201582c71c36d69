use glam::{Mat4, Vec3};
use pendulum_common::{OrbitDelta, SceneConfig};
use pendulum_kernel::Pendulum;

use crate::camera::{CameraError, OrbitCamera};
use crate::spring::spring_transform;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub view: Mat4,
    pub projection: Mat4,
    /// Translation placing the bob sphere.
    pub sphere_model: Mat4,
    /// Stretch and orientation of the spring cylinder.
    pub spring_model: Mat4,
    pub light_position: Vec3,
    pub anchor: Vec3,
    pub bob: Vec3,
    pub eye: Vec3,
}

impl FrameState {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One live simulation: the pendulum plus the camera looking at it.
///
/// Owned by the frame driver and passed by reference; there is no global
/// session.
#[derive(Debug, Clone)]
pub struct Session {
    pendulum: Pendulum,
    camera: OrbitCamera,
    light_position: Vec3,
}

impl Session {
    pub fn new(config: &SceneConfig) -> Result<Self, CameraError> {
        Self::with_pendulum(config, Pendulum::new(config.anchor))
    }

    /// Session whose pendulum keeps an event log for replay.
    pub fn recording(config: &SceneConfig) -> Result<Self, CameraError> {
        Self::with_pendulum(config, Pendulum::recording(config.anchor))
    }

    fn with_pendulum(config: &SceneConfig, pendulum: Pendulum) -> Result<Self, CameraError> {
        let camera = OrbitCamera::new(
            config.camera_distance,
            config.camera_angle,
            config.window_width as f32,
            config.window_height as f32,
        )?;
        tracing::info!(
            anchor = ?config.anchor,
            distance = config.camera_distance,
            "session created"
        );
        Ok(Self {
            pendulum,
            camera,
            light_position: config.light_position(),
        })
    }

    pub fn pendulum(&self) -> &Pendulum {
        &self.pendulum
    }

    pub fn pendulum_mut(&mut self) -> &mut Pendulum {
        &mut self.pendulum
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), CameraError> {
        self.camera.set_viewport(width, height)
    }

    /// Run one frame: orbit the camera, step physics, derive transforms.
    pub fn advance(&mut self, delta: OrbitDelta, dt: f32) -> FrameState {
        let _span = tracing::info_span!("advance", tick = self.pendulum.tick()).entered();
        self.camera.apply(delta);
        self.pendulum.update(dt);
        self.frame()
    }

    /// Reposition the bob under screen pixel `(x, y)`.
    ///
    /// The target is taken at the orbit distance along the picking ray, not
    /// found by intersecting the scene. Returns the new bob position.
    pub fn pick(&mut self, x: f32, y: f32) -> Vec3 {
        let ray = self.camera.picking_ray(x, y);
        let target = ray.point_at(self.camera.distance());
        tracing::debug!(x, y, ?target, "pick");
        self.pendulum.set_position(target);
        target
    }

    pub fn frame(&self) -> FrameState {
        let anchor = self.pendulum.anchor();
        let bob = self.pendulum.position();
        FrameState {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            sphere_model: Mat4::from_translation(bob),
            spring_model: spring_transform(anchor, bob),
            light_position: self.light_position,
            anchor,
            bob,
            eye: self.camera.eye(),
        }
    }
}

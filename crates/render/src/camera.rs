use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use pendulum_common::{OrbitDelta, Ray};

/// Vertical field of view in radians.
pub const FIELD_OF_VIEW: f32 = PI * 0.25;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 500.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Camera orbiting the world origin in the XZ plane.
///
/// `distance` and `angle` are not clamped. A negative distance puts the eye
/// on the opposite side of the origin, still looking at it; the angle simply
/// keeps growing and wraps through the trig functions.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    distance: f32,
    angle: f32,
    viewport_width: f32,
    viewport_height: f32,
    view: Mat4,
    projection: Mat4,
}

impl OrbitCamera {
    pub fn new(distance: f32, angle: f32, width: f32, height: f32) -> Result<Self, CameraError> {
        let mut camera = Self {
            distance,
            angle,
            viewport_width: width,
            viewport_height: height,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.set_viewport(width, height)?;
        camera.update_view();
        Ok(camera)
    }

    /// Recompute the left-handed perspective projection for a new viewport.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), CameraError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(CameraError::InvalidViewport { width, height });
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.projection =
            Mat4::perspective_lh(FIELD_OF_VIEW, width / height, NEAR_PLANE, FAR_PLANE);
        tracing::info!(width, height, "viewport changed");
        Ok(())
    }

    /// Move along the orbit and rebuild the view matrix.
    pub fn change_position(&mut self, distance_delta: f32, angle_delta: f32) {
        self.distance += distance_delta;
        self.angle += angle_delta;
        self.update_view();
    }

    pub fn apply(&mut self, delta: OrbitDelta) {
        self.change_position(delta.distance, delta.angle);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Eye position on the orbit circle.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.angle.cos(),
            0.0,
            self.distance * self.angle.sin(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// View-space direction through pixel `(x, y)`, with `z = 1`.
    pub fn view_space_ray(&self, x: f32, y: f32) -> Vec3 {
        let ndc_x = (2.0 * x) / self.viewport_width - 1.0;
        let ndc_y = (2.0 * y) / self.viewport_height - 1.0;
        Vec3::new(
            ndc_x / self.projection.x_axis.x,
            -ndc_y / self.projection.y_axis.y,
            1.0,
        )
    }

    /// World-space ray from the eye through pixel `(x, y)`.
    ///
    /// The direction is not normalized: its view-space z is 1, so callers
    /// scale it by a known depth rather than intersecting the scene. With the
    /// eye on the orbit centre the ray starts there and keeps the orientation
    /// of the last valid view.
    pub fn picking_ray(&self, x: f32, y: f32) -> Ray {
        let inverse = self.view.inverse();
        let origin = if self.eye_at_centre() {
            self.eye()
        } else {
            inverse.w_axis.truncate()
        };
        let direction = inverse.transform_vector3(self.view_space_ray(x, y));
        Ray::new(origin, direction)
    }

    fn eye_at_centre(&self) -> bool {
        self.eye().length_squared() <= f32::EPSILON
    }

    fn update_view(&mut self) {
        let eye = self.eye();
        // Eye on the look-at point has no defined orientation; keep the last view.
        if self.eye_at_centre() {
            tracing::debug!(distance = self.distance, "eye at orbit centre, view unchanged");
            return;
        }
        self.view = Mat4::look_at_lh(eye, Vec3::ZERO, Vec3::Y);
    }
}

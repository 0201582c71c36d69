use glam::{Mat4, Vec3};

/// Spring vectors shorter than this are treated as zero length.
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Oriented, stretched frame that maps the unit cylinder onto the spring.
///
/// Local `y` runs along `forward` (unnormalized, so its length is the
/// stretch), local `x` along `right` and local `z` along `up`. In matrix
/// form these are columns 0..=2 and the anchor is column 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringBasis {
    pub right: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub translation: Vec3,
}

impl SpringBasis {
    pub fn new(anchor: Vec3, bob: Vec3) -> Self {
        let forward = bob - anchor;
        let length = forward.length();
        if length < DEGENERATE_LENGTH {
            // Identity orientation collapsed to zero height at the anchor.
            return Self {
                right: Vec3::X,
                forward: Vec3::ZERO,
                up: Vec3::Z,
                translation: anchor,
            };
        }

        let direction = forward / length;
        let perpendicular = Vec3::new(direction.y, -direction.x, 0.0);
        let right = if perpendicular.length() < DEGENERATE_LENGTH {
            // Spring along the z axis: any x-axis vector is perpendicular.
            Vec3::X
        } else {
            perpendicular.normalize()
        };
        let up = right.cross(direction).normalize();

        Self {
            right,
            forward,
            up,
            translation: anchor,
        }
    }

    pub fn length(&self) -> f32 {
        self.forward.length()
    }

    pub fn is_degenerate(&self) -> bool {
        self.forward == Vec3::ZERO
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.right.extend(0.0),
            self.forward.extend(0.0),
            self.up.extend(0.0),
            self.translation.extend(1.0),
        )
    }
}

/// Model matrix stretching the unit cylinder from `anchor` to `bob`.
pub fn spring_transform(anchor: Vec3, bob: Vec3) -> Mat4 {
    SpringBasis::new(anchor, bob).matrix()
}

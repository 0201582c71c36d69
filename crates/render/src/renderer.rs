use crate::session::FrameState;
use crate::spring::SpringBasis;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer consumes a frame snapshot and produces output. It never
/// touches the simulation; the session owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameState) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameState) -> String {
        let spring = SpringBasis::new(frame.anchor, frame.bob);
        let mut out = String::new();
        out.push_str("=== Pendulum Frame ===\n");
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2})\n",
            frame.eye.x, frame.eye.y, frame.eye.z
        ));
        out.push_str(&format!(
            "Light: ({:.2}, {:.2}, {:.2})\n",
            frame.light_position.x, frame.light_position.y, frame.light_position.z
        ));
        out.push_str(&format!(
            "Anchor: ({:.2}, {:.2}, {:.2})\n",
            frame.anchor.x, frame.anchor.y, frame.anchor.z
        ));
        out.push_str(&format!(
            "Bob: ({:.2}, {:.2}, {:.2})\n",
            frame.bob.x, frame.bob.y, frame.bob.z
        ));
        out.push_str(&format!("Spring: length={:.3}", spring.length()));
        if spring.is_degenerate() {
            out.push_str(" (collapsed)");
        }
        out.push('\n');

        let ndc = frame.view_projection().project_point3(frame.bob);
        out.push_str(&format!("Bob NDC: ({:.3}, {:.3}, {:.3})\n", ndc.x, ndc.y, ndc.z));
        out
    }
}

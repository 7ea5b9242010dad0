//! The draw-surface capability behaviors render against.
//!
//! Draw behaviors never issue graphics-API calls; they speak this small
//! vocabulary and the front-end decides what it means (GPU mesh, recording,
//! nothing). Transforms are a translation stack, which is all the echo
//! effects need.

use glam::Vec3;

use crate::path::TrailPath;
use crate::visuals::Color;

/// Capability surface handed to draw behaviors.
pub trait RenderSurface {
    /// Draw a stroked (and optionally filled) trail path.
    fn draw_path(&mut self, path: &TrailPath);

    /// Draw an ellipse centered at `center` with the given radii and color.
    fn draw_ellipse(&mut self, center: Vec3, rx: f32, ry: f32, color: Color);

    /// Save the current transform.
    fn push_transform(&mut self);

    /// Offset subsequent draws by `offset`.
    fn translate(&mut self, offset: Vec3);

    /// Restore the transform saved by the matching push.
    fn pop_transform(&mut self);
}

/// One recorded surface call, with the translation that was in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Path {
        points: usize,
        offset: Vec3,
        stroke_width: f32,
        stroke_color: Color,
    },
    Ellipse {
        center: Vec3,
        rx: f32,
        ry: f32,
        color: Color,
    },
}

/// A surface that records calls instead of drawing. Used by tests and
/// handy for debugging a behavior chain headlessly.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<RecordedCall>,
    stack: Vec<Vec3>,
    offset: Vec3,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn path_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Path { .. }))
            .count()
    }

    pub fn ellipse_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Ellipse { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_path(&mut self, path: &TrailPath) {
        self.calls.push(RecordedCall::Path {
            points: path.len(),
            offset: self.offset,
            stroke_width: path.stroke_width(),
            stroke_color: path.stroke_color(),
        });
    }

    fn draw_ellipse(&mut self, center: Vec3, rx: f32, ry: f32, color: Color) {
        self.calls.push(RecordedCall::Ellipse {
            center: center + self.offset,
            rx,
            ry,
            color,
        });
    }

    fn push_transform(&mut self) {
        self.stack.push(self.offset);
    }

    fn translate(&mut self, offset: Vec3) {
        self.offset += offset;
    }

    fn pop_transform(&mut self) {
        match self.stack.pop() {
            Some(saved) => self.offset = saved,
            None => log::warn!("pop_transform with empty transform stack"),
        }
    }
}

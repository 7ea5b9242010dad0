//! Renderable trail geometry.
//!
//! A [`TrailPath`] is the derived draw state a tracer rebuilds from its
//! particles each frame: an ordered list of control points plus stroke and
//! fill style. Render surfaces consume it as-is; the Catmull-Rom sampler is
//! provided for surfaces that need the smoothed polyline.

use glam::Vec3;

use crate::visuals::Color;

/// Ordered control points with stroke/fill style.
#[derive(Debug, Clone)]
pub struct TrailPath {
    points: Vec<Vec3>,
    stroke_color: Color,
    stroke_width: f32,
    filled: bool,
    fill_color: Color,
}

impl Default for TrailPath {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            stroke_color: Color::WHITE,
            stroke_width: 1.0,
            filled: false,
            fill_color: Color::BLACK,
        }
    }
}

impl TrailPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all control points. Style survives a clear; the curve-rebuild
    /// behavior clears and refills points every frame while style behaviors
    /// run in the draw chain.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Start the path at `point`.
    pub fn move_to(&mut self, point: Vec3) {
        self.points.clear();
        self.points.push(point);
    }

    /// Extend the curve through `point`.
    pub fn curve_to(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // ========== Style ==========

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width.max(0.0);
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.filled = filled;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    // ========== Sampling ==========

    /// Sample the Catmull-Rom spline through the control points,
    /// `segments` subdivisions per span. Fewer than three points come back
    /// unchanged (a segment or a dot needs no smoothing).
    pub fn sample_curve(&self, segments: usize) -> Vec<Vec3> {
        let n = self.points.len();
        if n < 3 || segments < 2 {
            return self.points.clone();
        }

        let mut sampled = Vec::with_capacity((n - 1) * segments + 1);
        for span in 0..n - 1 {
            // Endpoint spans duplicate the boundary control point.
            let p0 = self.points[span.saturating_sub(1)];
            let p1 = self.points[span];
            let p2 = self.points[span + 1];
            let p3 = self.points[(span + 2).min(n - 1)];

            for step in 0..segments {
                let t = step as f32 / segments as f32;
                sampled.push(catmull_rom(p0, p1, p2, p3, t));
            }
        }
        sampled.push(self.points[n - 1]);
        sampled
    }
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`.
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

//! Style behaviors: they run in the draw chain but only write path style,
//! leaving the actual surface calls to the draw behaviors after them.

use crate::property::Property;
use crate::tracer::{DrawBehavior, Tracer};
use crate::visuals::{Color, Palette};
use crate::{noise, range};

use crate::surface::RenderSurface;

use glam::Vec3;

/// Sets a fixed stroke color every frame.
pub struct StrokeColor {
    color: Color,
}

impl StrokeColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl DrawBehavior for StrokeColor {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, _surface: &mut dyn RenderSurface) {
        tracer.path.set_stroke_color(self.color);
    }
}

/// Picks one palette stop at construction and holds it for the tracer's
/// lifetime. Randomness is per-tracer, not per-frame.
pub struct RandomStrokeColor {
    inner: StrokeColor,
}

impl RandomStrokeColor {
    pub fn new(palette: Palette, rng: &mut impl rand::Rng) -> Self {
        Self {
            inner: StrokeColor::new(palette.pick(rng)),
        }
    }

    pub fn color(&self) -> Color {
        self.inner.color
    }
}

impl DrawBehavior for RandomStrokeColor {
    fn draw(&mut self, tracer: &mut Tracer, time: f32, surface: &mut dyn RenderSurface) {
        self.inner.draw(tracer, time, surface);
    }
}

/// Applies a live-bound stroke width.
pub struct StrokeWidth {
    width: Property<f32>,
}

impl StrokeWidth {
    pub fn new(width: Property<f32>) -> Self {
        Self { width }
    }
}

impl DrawBehavior for StrokeWidth {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, _surface: &mut dyn RenderSurface) {
        self.width.clean();
        tracer.path.set_stroke_width(self.width.get());
    }
}

/// Derives stroke width from another property's position in its own range:
/// source at min draws hairline, source at max draws `max_width`.
pub struct StrokeWidthFromValue {
    max_width: f32,
    value: Property<f32>,
}

impl StrokeWidthFromValue {
    pub fn new(max_width: f32, value: Property<f32>) -> Self {
        Self { max_width, value }
    }
}

impl DrawBehavior for StrokeWidthFromValue {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, _surface: &mut dyn RenderSurface) {
        self.value.clean();
        let width = range::map_clamped(
            self.value.get(),
            self.value.min(),
            self.value.max(),
            0.0,
            self.max_width,
        );
        tracer.path.set_stroke_width(width);
    }
}

/// Modulates the current stroke brightness with coherent noise, sampled at
/// the same rate the tracer moves so bright pulses track fast passages.
pub struct NoiseBrightness {
    velocity: Property<Vec3>,
    time_shift: Vec3,
}

impl NoiseBrightness {
    pub fn new(velocity: Property<Vec3>, time_shift: Vec3) -> Self {
        Self {
            velocity,
            time_shift,
        }
    }
}

impl DrawBehavior for NoiseBrightness {
    fn draw(&mut self, tracer: &mut Tracer, time: f32, _surface: &mut dyn RenderSurface) {
        self.velocity.clean();
        let brightness =
            noise::sample(time * self.velocity.get().x + self.time_shift.x);
        let current = tracer.path.stroke_color();
        tracer.path.set_stroke_color(current.with_brightness(brightness));
    }
}

/// Enables (or disables) filling with a fixed color.
pub struct FilledPath {
    filled: bool,
    color: Color,
}

impl FilledPath {
    pub fn new(filled: bool, color: Color) -> Self {
        Self { filled, color }
    }
}

impl DrawBehavior for FilledPath {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, _surface: &mut dyn RenderSurface) {
        tracer.path.set_filled(self.filled);
        tracer.path.set_fill_color(self.color);
    }
}

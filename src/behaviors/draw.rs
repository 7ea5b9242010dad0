//! Draw behaviors that actually emit surface calls. These run after the
//! style behaviors so the path carries the frame's final stroke state.

use crate::property::Property;
use crate::surface::RenderSurface;
use crate::tracer::{DrawBehavior, Tracer};

/// Strokes the tracer's path. A path with fewer than two points has nothing
/// to stroke and emits no call.
pub struct DrawPath;

impl DrawBehavior for DrawPath {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, surface: &mut dyn RenderSurface) {
        if tracer.path.len() >= 2 {
            surface.draw_path(&tracer.path);
        }
    }
}

/// Circle at the newest trail particle, diameter bound to a live property.
pub struct EllipseHead {
    width: Property<f32>,
}

impl EllipseHead {
    pub fn new(width: Property<f32>) -> Self {
        Self { width }
    }
}

impl DrawBehavior for EllipseHead {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, surface: &mut dyn RenderSurface) {
        self.width.clean();
        let radius = self.width.get() * 0.5;
        let color = tracer.path.stroke_color();
        if let Some(head) = tracer.head_particle() {
            surface.draw_ellipse(head.location, radius, radius, color);
        }
    }
}

/// Circle at the oldest trail particle.
pub struct EllipseTail {
    width: Property<f32>,
}

impl EllipseTail {
    pub fn new(width: Property<f32>) -> Self {
        Self { width }
    }
}

impl DrawBehavior for EllipseTail {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, surface: &mut dyn RenderSurface) {
        self.width.clean();
        let radius = self.width.get() * 0.5;
        let color = tracer.path.stroke_color();
        if let Some(tail) = tracer.tail_particle() {
            surface.draw_ellipse(tail.location, radius, radius, color);
        }
    }
}

//! The tracer: one animated trail entity and its behavior chains.
//!
//! A tracer has no explicit states — it is a continuously updated aggregate:
//! a `head` target written by movement behaviors, a bounded deque of trail
//! particles (oldest first), a derived [`TrailPath`], and two ordered lists
//! of behaviors. Execution order is registration order and it is
//! semantically significant: trimming must run before the curve rebuild,
//! width-property cleaning before width application.
//!
//! New behaviors plug in without touching `Tracer`; it holds them as
//! abstract handles only.
//!
//! ```ignore
//! let tracer = Tracer::new(Vec3::ZERO)
//!     .with_update_behavior(NoiseMovement::new(velocity, stage, time_shift))
//!     .with_update_behavior(HeadGrowth)
//!     .with_update_behavior(MaximumLength::new(max_points))
//!     .with_update_behavior(CurvedPath)
//!     .with_draw_behavior(StrokeColor::new(Color::WHITE))
//!     .with_draw_behavior(DrawPath);
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use crate::particle::Particle;
use crate::path::TrailPath;
use crate::surface::RenderSurface;

/// Per-frame state mutation strategy.
pub trait UpdateBehavior {
    fn update(&mut self, tracer: &mut Tracer, time: f32);
}

/// Per-frame render strategy. Behaviors that own live properties clean them
/// at the top of `draw` before reading.
pub trait DrawBehavior {
    fn draw(&mut self, tracer: &mut Tracer, time: f32, surface: &mut dyn RenderSurface);
}

/// One animated trail: particles, derived path, and ordered behavior chains.
pub struct Tracer {
    /// Current target location, written by movement behaviors.
    pub head: Vec3,
    /// Trail particles, oldest first. Bounded by the trim behavior.
    pub particles: VecDeque<Particle>,
    /// Render geometry rebuilt from the particles each frame.
    pub path: TrailPath,
    update_behaviors: Vec<Box<dyn UpdateBehavior>>,
    draw_behaviors: Vec<Box<dyn DrawBehavior>>,
}

impl Tracer {
    pub fn new(start: Vec3) -> Self {
        Self {
            head: start,
            particles: VecDeque::new(),
            path: TrailPath::new(),
            update_behaviors: Vec::new(),
            draw_behaviors: Vec::new(),
        }
    }

    /// Append an update behavior (builder form).
    pub fn with_update_behavior(mut self, behavior: impl UpdateBehavior + 'static) -> Self {
        self.add_update_behavior(behavior);
        self
    }

    /// Append a draw behavior (builder form).
    pub fn with_draw_behavior(mut self, behavior: impl DrawBehavior + 'static) -> Self {
        self.add_draw_behavior(behavior);
        self
    }

    pub fn add_update_behavior(&mut self, behavior: impl UpdateBehavior + 'static) {
        self.update_behaviors.push(Box::new(behavior));
    }

    pub fn add_draw_behavior(&mut self, behavior: impl DrawBehavior + 'static) {
        self.draw_behaviors.push(Box::new(behavior));
    }

    pub fn update_behavior_count(&self) -> usize {
        self.update_behaviors.len()
    }

    pub fn draw_behavior_count(&self) -> usize {
        self.draw_behaviors.len()
    }

    /// Run the update chain in registration order.
    ///
    /// The chain is detached from the tracer for the duration of the pass so
    /// behaviors can mutate the tracer freely; behaviors must not add or
    /// remove behaviors mid-chain.
    pub fn update(&mut self, time: f32) {
        let mut behaviors = std::mem::take(&mut self.update_behaviors);
        for behavior in behaviors.iter_mut() {
            behavior.update(self, time);
        }
        self.update_behaviors = behaviors;
    }

    /// Run the draw chain in registration order against `surface`.
    pub fn draw(&mut self, time: f32, surface: &mut dyn RenderSurface) {
        let mut behaviors = std::mem::take(&mut self.draw_behaviors);
        for behavior in behaviors.iter_mut() {
            behavior.draw(self, time, surface);
        }
        self.draw_behaviors = behaviors;
    }

    /// Newest trail particle, `None` on an empty trail.
    pub fn head_particle(&self) -> Option<&Particle> {
        self.particles.back()
    }

    /// Oldest trail particle, `None` on an empty trail.
    pub fn tail_particle(&self) -> Option<&Particle> {
        self.particles.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PushMarker(&'static str, std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>);

    impl UpdateBehavior for PushMarker {
        fn update(&mut self, _tracer: &mut Tracer, _time: f32) {
            self.1.borrow_mut().push(self.0);
        }
    }

    struct GrowOnce;

    impl UpdateBehavior for GrowOnce {
        fn update(&mut self, tracer: &mut Tracer, _time: f32) {
            tracer.particles.push_back(Particle::at(tracer.head));
        }
    }

    #[test]
    fn test_update_behaviors_run_in_registration_order() {
        let order = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Vec3::ZERO)
            .with_update_behavior(PushMarker("first", order.clone()))
            .with_update_behavior(PushMarker("second", order.clone()))
            .with_update_behavior(PushMarker("third", order.clone()));
        tracer.update(0.0);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_behaviors_can_mutate_tracer() {
        let mut tracer = Tracer::new(Vec3::new(1.0, 2.0, 3.0)).with_update_behavior(GrowOnce);
        tracer.update(0.0);
        tracer.update(0.0);
        assert_eq!(tracer.particles.len(), 2);
        assert_eq!(tracer.update_behavior_count(), 1, "chain must survive the pass");
    }

    #[test]
    fn test_empty_trail_has_no_head_or_tail() {
        let tracer = Tracer::new(Vec3::ZERO);
        assert!(tracer.head_particle().is_none());
        assert!(tracer.tail_particle().is_none());
    }

    #[test]
    fn test_head_is_newest_tail_is_oldest() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        tracer.particles.push_back(Particle::at(Vec3::X));
        tracer.particles.push_back(Particle::at(Vec3::Y));
        assert_eq!(tracer.tail_particle().unwrap().location, Vec3::X);
        assert_eq!(tracer.head_particle().unwrap().location, Vec3::Y);
    }
}

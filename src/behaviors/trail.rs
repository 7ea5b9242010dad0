//! Trail maintenance: grow, trim, rebuild the curve.
//!
//! These three usually run back-to-back in exactly this order. Growing
//! before trimming keeps the trail length stable at the cap; rebuilding
//! last means the path always reflects the post-trim particle list.

use crate::particle::Particle;
use crate::property::Property;
use crate::tracer::{Tracer, UpdateBehavior};

/// Appends a resting particle at the current head every frame.
pub struct HeadGrowth;

impl UpdateBehavior for HeadGrowth {
    fn update(&mut self, tracer: &mut Tracer, _time: f32) {
        tracer.particles.push_back(Particle::at(tracer.head));
    }
}

/// Caps the trail length, dropping oldest particles first.
///
/// The cap is live: turning the knob down mid-show sheds the excess on the
/// next frame. A cap of zero (or below, if the bounds ever allow it) empties
/// the trail.
pub struct MaximumLength {
    max_points: Property<i32>,
}

impl MaximumLength {
    pub fn new(max_points: Property<i32>) -> Self {
        Self { max_points }
    }
}

impl UpdateBehavior for MaximumLength {
    fn update(&mut self, tracer: &mut Tracer, _time: f32) {
        self.max_points.clean();
        let cap = self.max_points.get().max(0) as usize;
        while tracer.particles.len() > cap {
            tracer.particles.pop_front();
        }
    }
}

/// Rebuilds the tracer's path as a curve through its particles, oldest
/// first. Fewer than two particles leave the path empty; style set by draw
/// behaviors survives the rebuild.
pub struct CurvedPath;

impl UpdateBehavior for CurvedPath {
    fn update(&mut self, tracer: &mut Tracer, _time: f32) {
        tracer.path.clear();
        if tracer.particles.len() < 2 {
            return;
        }
        let mut locations = tracer.particles.iter().map(|p| p.location);
        if let Some(first) = locations.next() {
            tracer.path.move_to(first);
        }
        for location in locations {
            tracer.path.curve_to(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn max_points(cap: i32) -> Property<i32> {
        Property::new("maxPoints", cap, 0, 100)
    }

    #[test]
    fn test_head_growth_appends_at_head() {
        let mut tracer = Tracer::new(Vec3::new(3.0, 4.0, 5.0));
        let mut growth = HeadGrowth;
        growth.update(&mut tracer, 0.0);
        assert_eq!(tracer.particles.len(), 1);
        assert_eq!(tracer.head_particle().unwrap().location, tracer.head);
    }

    #[test]
    fn test_maximum_length_drops_oldest() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        for i in 0..5 {
            tracer.particles.push_back(Particle::at(Vec3::splat(i as f32)));
        }
        let mut trim = MaximumLength::new(max_points(3));
        trim.update(&mut tracer, 0.0);
        assert_eq!(tracer.particles.len(), 3);
        assert_eq!(tracer.tail_particle().unwrap().location, Vec3::splat(2.0));
        assert_eq!(tracer.head_particle().unwrap().location, Vec3::splat(4.0));
    }

    #[test]
    fn test_maximum_length_live_shrink() {
        let cap = max_points(10);
        let writer = cap.writer();
        let mut tracer = Tracer::new(Vec3::ZERO);
        for i in 0..8 {
            tracer.particles.push_back(Particle::at(Vec3::splat(i as f32)));
        }
        let mut trim = MaximumLength::new(cap);

        trim.update(&mut tracer, 0.0);
        assert_eq!(tracer.particles.len(), 8);

        writer.set(2);
        trim.update(&mut tracer, 0.0);
        assert_eq!(tracer.particles.len(), 2);
    }

    #[test]
    fn test_zero_cap_empties_trail() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        tracer.particles.push_back(Particle::at(Vec3::ZERO));
        let mut trim = MaximumLength::new(max_points(0));
        trim.update(&mut tracer, 0.0);
        assert!(tracer.particles.is_empty());
    }

    #[test]
    fn test_curved_path_mirrors_particles() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        for i in 0..4 {
            tracer.particles.push_back(Particle::at(Vec3::new(i as f32, 0.0, 0.0)));
        }
        let mut rebuild = CurvedPath;
        rebuild.update(&mut tracer, 0.0);
        assert_eq!(tracer.path.len(), 4);
        assert_eq!(tracer.path.points()[0], Vec3::ZERO);
        assert_eq!(tracer.path.points()[3], Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_curved_path_needs_two_particles() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        tracer.particles.push_back(Particle::at(Vec3::ZERO));
        let mut rebuild = CurvedPath;
        rebuild.update(&mut tracer, 0.0);
        assert!(tracer.path.is_empty());
    }

    #[test]
    fn test_grow_trim_rebuild_pipeline() {
        let mut tracer = Tracer::new(Vec3::ZERO)
            .with_update_behavior(HeadGrowth)
            .with_update_behavior(MaximumLength::new(max_points(3)))
            .with_update_behavior(CurvedPath);

        for i in 0..6 {
            tracer.head = Vec3::new(i as f32, 0.0, 0.0);
            tracer.update(i as f32);
        }
        assert_eq!(tracer.particles.len(), 3);
        assert_eq!(
            tracer.path.points(),
            &[
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
            ]
        );
    }
}

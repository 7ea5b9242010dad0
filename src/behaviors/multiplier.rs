//! Echo effects: redraw the trail at random offsets.
//!
//! The offsets regenerate only when their driving properties commit, so an
//! untouched knob leaves the echoes frozen in place. [`VibratingMultiplier`]
//! adds an entropy property that reshuffles the offsets every frame once it
//! crosses its threshold, turning the echoes into a shiver.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use rand::Rng;

use crate::property::Property;
use crate::surface::RenderSurface;
use crate::tracer::{DrawBehavior, Tracer};

/// Entropy below this leaves the offsets alone.
const VIBRATION_THRESHOLD: f32 = 0.1;

fn regenerate_into(shifts: &RefCell<Vec<Vec3>>, count: i32, max_shift: f32) {
    let mut rng = rand::thread_rng();
    let s = max_shift.abs();
    let mut shifts = shifts.borrow_mut();
    shifts.clear();
    for _ in 0..count.max(0) {
        shifts.push(Vec3::new(
            rng.gen_range(-s..=s),
            rng.gen_range(-s..=s),
            rng.gen_range(-s..=s),
        ));
    }
}

/// Regenerate through a weak handle, detaching the subscription once the
/// owning behavior is gone. Tracers come and go with the population count;
/// their multipliers must not keep costing commit work on the shared
/// properties afterwards.
fn regenerate_weak(shifts: &Weak<RefCell<Vec<Vec3>>>, count: i32, max_shift: f32) -> bool {
    match shifts.upgrade() {
        Some(shifts) => {
            regenerate_into(&shifts, count, max_shift);
            true
        }
        None => false,
    }
}

/// Redraws the path once per offset, on top of whatever was already drawn.
///
/// Holds clones of the count and shift properties and subscribes to both:
/// a commit on either regenerates the offset list. Cloning the behavior's
/// handle of a shared property elsewhere keeps every copy in sync. The
/// subscriptions hold the offset list weakly and fall away after the
/// behavior is dropped.
pub struct Multiplier {
    count: Property<i32>,
    max_shift: Property<f32>,
    shifts: Rc<RefCell<Vec<Vec3>>>,
}

impl Multiplier {
    pub fn new(count: Property<i32>, max_shift: Property<f32>) -> Self {
        let shifts = Rc::new(RefCell::new(Vec::new()));
        regenerate_into(&shifts, count.get(), max_shift.get());

        {
            let shifts = Rc::downgrade(&shifts);
            let max_shift = max_shift.clone();
            count.subscribe_while(move |n| regenerate_weak(&shifts, n, max_shift.get()));
        }
        {
            let shifts = Rc::downgrade(&shifts);
            let count = count.clone();
            max_shift.subscribe_while(move |s| regenerate_weak(&shifts, count.get(), s));
        }

        Self {
            count,
            max_shift,
            shifts,
        }
    }

    /// Throw away the current offsets and roll new ones.
    pub fn regenerate(&self) {
        regenerate_into(&self.shifts, self.count.get(), self.max_shift.get());
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.borrow().len()
    }
}

impl DrawBehavior for Multiplier {
    fn draw(&mut self, tracer: &mut Tracer, _time: f32, surface: &mut dyn RenderSurface) {
        self.count.clean();
        self.max_shift.clean();
        if tracer.path.len() < 2 {
            return;
        }
        for shift in self.shifts.borrow().iter() {
            surface.push_transform();
            surface.translate(*shift);
            surface.draw_path(&tracer.path);
            surface.pop_transform();
        }
    }
}

/// A [`Multiplier`] whose offsets reshuffle every frame while the entropy
/// property sits above its threshold.
pub struct VibratingMultiplier {
    inner: Multiplier,
    entropy: Property<f32>,
}

impl VibratingMultiplier {
    pub fn new(inner: Multiplier, entropy: Property<f32>) -> Self {
        Self { inner, entropy }
    }
}

impl DrawBehavior for VibratingMultiplier {
    fn draw(&mut self, tracer: &mut Tracer, time: f32, surface: &mut dyn RenderSurface) {
        self.entropy.clean();
        if self.entropy.get() > VIBRATION_THRESHOLD {
            self.inner.regenerate();
        }
        self.inner.draw(tracer, time, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use crate::surface::{RecordedCall, RecordingSurface};

    fn count(n: i32) -> Property<i32> {
        Property::new("multiplierCount", n, 0, 32)
    }

    fn max_shift(s: f32) -> Property<f32> {
        Property::new("maxShift", s, 0.0, 50.0)
    }

    fn tracer_with_path() -> Tracer {
        let mut tracer = Tracer::new(Vec3::ZERO);
        tracer.particles.push_back(Particle::at(Vec3::ZERO));
        tracer.particles.push_back(Particle::at(Vec3::X));
        tracer.path.move_to(Vec3::ZERO);
        tracer.path.curve_to(Vec3::X);
        tracer
    }

    #[test]
    fn test_draws_one_path_per_copy() {
        let mut tracer = tracer_with_path();
        let mut surface = RecordingSurface::new();
        let mut multiplier = Multiplier::new(count(4), max_shift(5.0));
        multiplier.draw(&mut tracer, 0.0, &mut surface);
        assert_eq!(surface.path_count(), 4);
    }

    #[test]
    fn test_offsets_stay_within_max_shift() {
        let multiplier = Multiplier::new(count(16), max_shift(3.0));
        for shift in multiplier.shifts.borrow().iter() {
            assert!(shift.x.abs() <= 3.0 && shift.y.abs() <= 3.0 && shift.z.abs() <= 3.0);
        }
    }

    #[test]
    fn test_offsets_frozen_without_commits() {
        let mut tracer = tracer_with_path();
        let mut surface = RecordingSurface::new();
        let mut multiplier = Multiplier::new(count(3), max_shift(10.0));

        multiplier.draw(&mut tracer, 0.0, &mut surface);
        let first: Vec<_> = surface
            .calls()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Path { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();

        surface.clear();
        multiplier.draw(&mut tracer, 1.0, &mut surface);
        let second: Vec<_> = surface
            .calls()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Path { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_count_commit_regenerates() {
        let count = count(2);
        let writer = count.writer();
        let multiplier = Multiplier::new(count, max_shift(5.0));
        assert_eq!(multiplier.shift_count(), 2);

        writer.set(7);
        multiplier.count.clean();
        assert_eq!(multiplier.shift_count(), 7);
    }

    #[test]
    fn test_shift_commit_regenerates() {
        let max_shift = max_shift(5.0);
        let writer = max_shift.writer();
        let multiplier = Multiplier::new(count(8), max_shift.clone());

        writer.set(0.0);
        max_shift.clean();
        for shift in multiplier.shifts.borrow().iter() {
            assert_eq!(*shift, Vec3::ZERO);
        }
    }

    #[test]
    fn test_dropped_multipliers_detach_from_shared_properties() {
        let count = count(2);
        let max_shift = max_shift(5.0);

        // A shrinking population drops multipliers that subscribed to the
        // shared knobs; the survivor must keep tracking them.
        let survivor = Multiplier::new(count.clone(), max_shift.clone());
        for _ in 0..100 {
            drop(Multiplier::new(count.clone(), max_shift.clone()));
        }
        assert_eq!(count.subscriber_count(), 101);

        count.set(5);
        count.clean();
        assert_eq!(survivor.shift_count(), 5);
        assert_eq!(count.subscriber_count(), 1);

        max_shift.set(0.0);
        max_shift.clean();
        assert_eq!(max_shift.subscriber_count(), 1);
        for shift in survivor.shifts.borrow().iter() {
            assert_eq!(*shift, Vec3::ZERO);
        }
    }

    #[test]
    fn test_skips_degenerate_path() {
        let mut tracer = Tracer::new(Vec3::ZERO);
        let mut surface = RecordingSurface::new();
        let mut multiplier = Multiplier::new(count(4), max_shift(5.0));
        multiplier.draw(&mut tracer, 0.0, &mut surface);
        assert_eq!(surface.path_count(), 0);
    }

    #[test]
    fn test_vibration_reshuffles_above_threshold() {
        let mut tracer = tracer_with_path();
        let mut surface = RecordingSurface::new();
        let entropy = Property::new("entropy", 0.0_f32, 0.0, 1.0);
        let entropy_writer = entropy.writer();
        let mut vibrating =
            VibratingMultiplier::new(Multiplier::new(count(6), max_shift(20.0)), entropy);

        let before: Vec<Vec3> = vibrating.inner.shifts.borrow().clone();
        entropy_writer.set(0.9);
        vibrating.draw(&mut tracer, 0.0, &mut surface);
        let after: Vec<Vec3> = vibrating.inner.shifts.borrow().clone();
        // 6 offsets drawn from a 40-unit cube; a collision is astronomically
        // unlikely.
        assert_ne!(before, after);
        assert_eq!(surface.path_count(), 6);
    }

    #[test]
    fn test_no_vibration_below_threshold() {
        let mut tracer = tracer_with_path();
        let mut surface = RecordingSurface::new();
        let entropy = Property::new("entropy", 0.05_f32, 0.0, 1.0);
        let mut vibrating =
            VibratingMultiplier::new(Multiplier::new(count(6), max_shift(20.0)), entropy);

        let before: Vec<Vec3> = vibrating.inner.shifts.borrow().clone();
        vibrating.draw(&mut tracer, 0.0, &mut surface);
        let after: Vec<Vec3> = vibrating.inner.shifts.borrow().clone();
        assert_eq!(before, after);
    }
}

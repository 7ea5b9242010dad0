//! Movement strategies: where the tracer's head goes next.
//!
//! All movement is a pure function of time plus per-tracer fixed random
//! phase and live bound properties. Movement behaviors write only
//! `tracer.head`; swapping one strategy for another never touches the rest
//! of the chain.

use glam::Vec3;

use crate::engine::Stage;
use crate::noise;
use crate::property::{Property, PropertyWriter};
use crate::range;
use crate::tracer::{Tracer, UpdateBehavior};

/// Coherent-noise wandering inside the stage bounds.
///
/// Each axis samples noise at `time * velocity[axis] + time_shift[axis]`
/// and maps the [0, 1] result into `[-stage/2, +stage/2]` for that axis.
/// `time_shift` is the per-tracer phase that keeps a crowd of tracers from
/// moving in lockstep.
pub struct NoiseMovement {
    velocity: Property<Vec3>,
    stage: Stage,
    time_shift: Vec3,
}

impl NoiseMovement {
    pub fn new(velocity: Property<Vec3>, stage: Stage, time_shift: Vec3) -> Self {
        Self {
            velocity,
            stage,
            time_shift,
        }
    }
}

impl UpdateBehavior for NoiseMovement {
    fn update(&mut self, tracer: &mut Tracer, time: f32) {
        self.velocity.clean();
        let v = self.velocity.get();
        let half = self.stage.half();
        tracer.head = Vec3::new(
            noise::sample_mapped(time * v.x + self.time_shift.x, -half.x, half.x),
            noise::sample_mapped(time * v.y + self.time_shift.y, -half.y, half.y),
            noise::sample_mapped(time * v.z + self.time_shift.z, -half.z, half.z),
        );
    }
}

/// Deterministic cubic sweep across the stage (2D, z stays 0).
///
/// Time runs a sawtooth over `period` seconds; x follows the sawtooth, y a
/// cubic interpolation chain over four random ranges fixed at construction.
pub struct CubicMovement {
    stage: Stage,
    period: f32,
    ranges: [(f32, f32); 4],
}

impl CubicMovement {
    pub fn new(stage: Stage, period: f32, rng: &mut impl rand::Rng) -> Self {
        let mut random_range = || (rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        Self {
            stage,
            period: period.max(1e-3),
            ranges: [
                random_range(),
                random_range(),
                random_range(),
                random_range(),
            ],
        }
    }

    fn cubic(&self, t: f32) -> f32 {
        let a1 = range::lerp(t, self.ranges[0].0, self.ranges[0].1);
        let a2 = range::lerp(t, self.ranges[1].0, self.ranges[1].1);
        let a3 = range::lerp(t, self.ranges[2].0, self.ranges[2].1);
        let a4 = range::lerp(t, self.ranges[3].0, self.ranges[3].1);
        let b1 = range::lerp(t, a1, a2);
        let b2 = range::lerp(t, a3, a4);
        range::lerp(t, b1, b2)
    }
}

impl UpdateBehavior for CubicMovement {
    fn update(&mut self, tracer: &mut Tracer, time: f32) {
        let t = (time.rem_euclid(self.period)) / self.period;
        let half = self.stage.half();
        let x = range::map_clamped(t, 0.0, 1.0, -half.x, half.x);
        let y = range::map_clamped(self.cubic(t), -10.0, 10.0, -half.y, half.y);
        tracer.head = Vec3::new(x, y, 0.0);
    }
}

/// Drives another property from slow coherent noise.
///
/// Useful for hands-free shows: a property nobody is touching still
/// breathes. Writes go through the property's normal dirty buffer and
/// commit on the next clean pass.
pub struct VaryByNoise {
    writer: PropertyWriter<f32>,
    min: f32,
    max: f32,
    rate: f32,
}

impl VaryByNoise {
    pub fn new(writer: PropertyWriter<f32>, min: f32, max: f32, rate: f32) -> Self {
        Self {
            writer,
            min,
            max,
            rate,
        }
    }
}

impl UpdateBehavior for VaryByNoise {
    fn update(&mut self, _tracer: &mut Tracer, time: f32) {
        let sampled = noise::sample_mapped(time * self.rate, self.min, self.max);
        self.writer.set(sampled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        Stage::new(100.0, 80.0, 60.0)
    }

    #[test]
    fn test_noise_movement_stays_in_stage() {
        let velocity = Property::new(
            "velocity",
            Vec3::splat(0.5),
            Vec3::ZERO,
            Vec3::splat(2.0),
        );
        let mut movement = NoiseMovement::new(velocity, stage(), Vec3::new(3.0, 7.0, 11.0));
        let mut tracer = Tracer::new(Vec3::ZERO);

        let mut time = 0.0;
        while time < 50.0 {
            movement.update(&mut tracer, time);
            let h = tracer.head;
            assert!(h.x.abs() <= 50.0 && h.y.abs() <= 40.0 && h.z.abs() <= 30.0);
            time += 0.7;
        }
    }

    #[test]
    fn test_noise_movement_only_writes_head() {
        let velocity = Property::new("velocity", Vec3::ONE, Vec3::ZERO, Vec3::splat(2.0));
        let mut movement = NoiseMovement::new(velocity, stage(), Vec3::ZERO);
        let mut tracer = Tracer::new(Vec3::ZERO);
        movement.update(&mut tracer, 1.0);
        assert!(tracer.particles.is_empty());
        assert!(tracer.path.is_empty());
    }

    #[test]
    fn test_noise_movement_commits_pending_velocity() {
        let velocity = Property::new("velocity", Vec3::ONE, Vec3::ZERO, Vec3::splat(2.0));
        let writer = velocity.writer();
        let mut movement = NoiseMovement::new(velocity.clone(), stage(), Vec3::ZERO);
        let mut tracer = Tracer::new(Vec3::ZERO);

        writer.set(Vec3::splat(1.5));
        movement.update(&mut tracer, 1.0);
        assert_eq!(velocity.get(), Vec3::splat(1.5));
    }

    #[test]
    fn test_cubic_movement_stays_in_stage() {
        let mut rng = rand::thread_rng();
        let mut movement = CubicMovement::new(stage(), 10.0, &mut rng);
        let mut tracer = Tracer::new(Vec3::ZERO);

        let mut time = 0.0;
        while time < 30.0 {
            movement.update(&mut tracer, time);
            let h = tracer.head;
            assert!(h.x.abs() <= 50.0 && h.y.abs() <= 40.0);
            assert_eq!(h.z, 0.0);
            time += 0.31;
        }
    }

    #[test]
    fn test_vary_by_noise_writes_within_range() {
        let target = Property::new("hue", 0.5_f32, 0.0, 1.0);
        let mut vary = VaryByNoise::new(target.writer(), 0.2, 0.8, 1.0);
        let mut tracer = Tracer::new(Vec3::ZERO);

        vary.update(&mut tracer, 12.5);
        target.clean();
        let v = target.get();
        assert!((0.2..=0.8).contains(&v));
    }
}

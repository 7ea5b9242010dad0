//! A point mass making up one link of a tracer's trail.

use glam::Vec3;

/// Point mass with velocity and accumulated acceleration.
///
/// Integrated with semi-implicit Euler: velocity first, then position, then
/// the force accumulator resets. Trail particles are typically created at
/// rest at the tracer's head and never move again; the physics fields exist
/// for behaviors that want drifting or falling trails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub location: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub mass: f32,
}

impl Particle {
    /// Create a particle with explicit velocity and mass.
    pub fn new(location: Vec3, velocity: Vec3, mass: f32) -> Self {
        Self {
            location,
            velocity,
            acceleration: Vec3::ZERO,
            mass,
        }
    }

    /// Create a particle at rest, the common case for trail growth.
    pub fn at(location: Vec3) -> Self {
        Self::new(location, Vec3::ZERO, 0.0)
    }

    /// Accumulate a force for the next update. Massless particles ignore
    /// forces.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }

    /// Integrate one step: `velocity += acceleration; location += velocity;
    /// acceleration = 0`.
    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.location += self.velocity;
        self.acceleration = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_at_rest() {
        let p = Particle::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.location, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.mass, 0.0);
    }

    #[test]
    fn test_update_integrates_velocity() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0);
        p.update();
        p.update();
        assert_eq!(p.location, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_apply_force_divides_by_mass() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, 2.0);
        p.apply_force(Vec3::new(4.0, 0.0, 0.0));
        p.update();
        assert_eq!(p.velocity, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.location, Vec3::new(2.0, 0.0, 0.0));
        // Accumulator resets after integration.
        assert_eq!(p.acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_massless_particle_ignores_forces() {
        let mut p = Particle::at(Vec3::ZERO);
        p.apply_force(Vec3::new(10.0, 10.0, 10.0));
        p.update();
        assert_eq!(p.location, Vec3::ZERO);
    }
}

//! The engine: property commits, tracer population, frame passes.
//!
//! `TracerEngine` is the single-threaded heart of a show. Each frame it runs
//! exactly one commit pass over the registry (the only point where producer
//! writes become visible), reconciles the tracer population against its
//! live count property, then runs every tracer's update chain. Drawing is a
//! separate pass against whatever surface the front-end supplies.

use glam::Vec3;
use rand::Rng;

use crate::property::Property;
use crate::registry::PropertyRegistry;
use crate::surface::RenderSurface;
use crate::tracer::Tracer;

/// Axis-aligned stage volume, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub size: Vec3,
}

impl Stage {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            size: Vec3::new(width, height, depth),
        }
    }

    /// Half-extent on each axis; stage coordinates run `[-half, +half]`.
    pub fn half(&self) -> Vec3 {
        self.size * 0.5
    }

    /// A uniformly random point inside the stage.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec3 {
        let half = self.half();
        Vec3::new(
            rng.gen_range(-half.x..=half.x),
            rng.gen_range(-half.y..=half.y),
            rng.gen_range(-half.z..=half.z),
        )
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.half();
        point.abs().cmple(half).all()
    }
}

/// Builds the tracer for a given population index. Indices are stable while
/// a tracer lives; shrinking truncates from the high end.
pub type TracerBuilder = Box<dyn FnMut(usize) -> Tracer>;

/// Owns the registry, the tracer population and the per-frame passes.
pub struct TracerEngine {
    registry: PropertyRegistry,
    stage: Stage,
    tracer_count: Property<i32>,
    tracers: Vec<Tracer>,
    builder: TracerBuilder,
}

impl TracerEngine {
    /// The count property is registered first, so it always sits at external
    /// index 0.
    pub fn new(
        stage: Stage,
        tracer_count: Property<i32>,
        builder: impl FnMut(usize) -> Tracer + 'static,
    ) -> Self {
        let mut registry = PropertyRegistry::new();
        registry.register(&tracer_count);
        Self {
            registry,
            stage,
            tracer_count,
            tracers: Vec::new(),
            builder: Box::new(builder),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PropertyRegistry {
        &mut self.registry
    }

    pub fn tracer_count(&self) -> usize {
        self.tracers.len()
    }

    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    /// Match the population to the committed count: build missing tracers,
    /// truncate extras. Runs after the commit pass so a knob turn takes
    /// effect the same frame.
    fn reconcile_population(&mut self) {
        let target = self.tracer_count.get().max(0) as usize;
        if target == self.tracers.len() {
            return;
        }
        log::debug!("tracer population {} -> {}", self.tracers.len(), target);
        while self.tracers.len() < target {
            let tracer = (self.builder)(self.tracers.len());
            self.tracers.push(tracer);
        }
        self.tracers.truncate(target);
    }

    /// One frame of simulation: commit, reconcile, update every tracer in
    /// order. Everything completes before the call returns.
    pub fn update(&mut self, time: f32) {
        self.registry.clean_all();
        self.reconcile_population();
        for tracer in &mut self.tracers {
            tracer.update(time);
        }
    }

    /// Run every tracer's draw chain, in population order.
    pub fn draw(&mut self, time: f32, surface: &mut dyn RenderSurface) {
        for tracer in &mut self.tracers {
            tracer.draw(time, surface);
        }
    }
}

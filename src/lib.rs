//! # Tracer - Reactive Trail Engine
//!
//! Real-time generative trail rendering driven by live controls.
//!
//! A show is a population of *tracers*: animated entities that leave curved
//! trails behind a moving head. Every knob of a show is a bounded
//! [`Property`](property::Property) that outside producers (MIDI encoders,
//! an audio envelope, the keyboard) write asynchronously and the engine
//! commits once per frame, so a frame never sees a half-applied control
//! change.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracer::prelude::*;
//!
//! let velocity = Property::new("velocity", Vec3::splat(40.0), Vec3::splat(1.0), Vec3::splat(200.0));
//! let max_points = Property::new("maxPoints", 60, 2, 240);
//! let tracer_count = Property::new("tracerCount", 24, 1, 127);
//!
//! let stage = Stage::new(1280.0, 720.0, 400.0);
//! let engine = TracerEngine::new(stage, tracer_count, move |_index| {
//!     Tracer::new(Vec3::ZERO)
//!         .with_update_behavior(NoiseMovement::new(velocity.clone(), stage, Vec3::ZERO))
//!         .with_update_behavior(HeadGrowth)
//!         .with_update_behavior(MaximumLength::new(max_points.clone()))
//!         .with_update_behavior(CurvedPath)
//!         .with_draw_behavior(StrokeColor::new(Color::WHITE))
//!         .with_draw_behavior(DrawPath)
//! });
//!
//! App::new("Tracer", engine, None).run()?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Properties
//!
//! A [`Property`](property::Property) is a named, bounded value with a
//! dirty/clean double buffer. Producer threads stage writes through a
//! [`PropertyWriter`](property::PropertyWriter); the engine's commit pass
//! ([`PropertyRegistry::clean_all`](registry::PropertyRegistry::clean_all))
//! publishes them. Values clamp to their bounds, and the normalized
//! `scale` view maps any property onto a 0..1 knob.
//!
//! ### Behaviors
//!
//! Tracers are assembled from small, ordered behaviors:
//!
//! | Category | Behaviors |
//! |----------|-----------|
//! | Movement | [`NoiseMovement`](behaviors::NoiseMovement), [`CubicMovement`](behaviors::CubicMovement), [`VaryByNoise`](behaviors::VaryByNoise) |
//! | Trail | [`HeadGrowth`](behaviors::HeadGrowth), [`MaximumLength`](behaviors::MaximumLength), [`CurvedPath`](behaviors::CurvedPath) |
//! | Style | [`StrokeColor`](behaviors::StrokeColor), [`RandomStrokeColor`](behaviors::RandomStrokeColor), [`StrokeWidth`](behaviors::StrokeWidth), [`NoiseBrightness`](behaviors::NoiseBrightness) |
//! | Draw | [`DrawPath`](behaviors::DrawPath), [`EllipseHead`](behaviors::EllipseHead), [`EllipseTail`](behaviors::EllipseTail) |
//! | Echo | [`Multiplier`](behaviors::Multiplier), [`VibratingMultiplier`](behaviors::VibratingMultiplier) |
//!
//! ### Live control
//!
//! [`MidiController`](midi::MidiController) routes encoder turns into
//! property writers on the callback thread; [`AudioInput`](audio::AudioInput)
//! does the same with the smoothed loudness of the system input. The
//! keyboard arms any property by registry index and nudges it with the
//! arrow keys.

pub mod audio;
pub mod behaviors;
pub mod engine;
pub mod error;
pub mod input;
pub mod midi;
pub mod noise;
pub mod particle;
pub mod path;
pub mod property;
pub mod range;
pub mod registry;
pub mod render;
pub mod surface;
pub mod time;
pub mod tracer;
pub mod visuals;
pub mod window;

pub use glam::{Vec2, Vec3, Vec4};

/// Convenient re-exports for assembling a show.
pub mod prelude {
    pub use crate::audio::AudioInput;
    pub use crate::behaviors::*;
    pub use crate::engine::{Stage, TracerEngine};
    pub use crate::error::RunError;
    pub use crate::midi::MidiController;
    pub use crate::particle::Particle;
    pub use crate::path::TrailPath;
    pub use crate::property::{Property, PropertyWriter};
    pub use crate::registry::{PropertyRegistry, Settings};
    pub use crate::surface::RenderSurface;
    pub use crate::time::Time;
    pub use crate::tracer::{DrawBehavior, Tracer, UpdateBehavior};
    pub use crate::visuals::{Color, Palette};
    pub use crate::window::App;
    pub use crate::{Vec2, Vec3, Vec4};
}

//! Pluggable per-frame behaviors for tracers.
//!
//! Behaviors execute in the order they were registered on a tracer, and the
//! order carries meaning: the trail trimmer runs before the curve rebuild,
//! property cleaning runs before the property is read. Each behavior does
//! exactly one thing; shows are assembled by chaining them.
//!
//! | Category | Behaviors |
//! |----------|-----------|
//! | Movement | [`NoiseMovement`], [`CubicMovement`], [`VaryByNoise`] |
//! | Trail | [`HeadGrowth`], [`MaximumLength`], [`CurvedPath`] |
//! | Style | [`StrokeColor`], [`RandomStrokeColor`], [`StrokeWidth`], [`StrokeWidthFromValue`], [`NoiseBrightness`], [`FilledPath`] |
//! | Draw | [`DrawPath`], [`EllipseHead`], [`EllipseTail`] |
//! | Echo | [`Multiplier`], [`VibratingMultiplier`] |

mod draw;
mod movement;
mod multiplier;
mod style;
mod trail;

pub use draw::{DrawPath, EllipseHead, EllipseTail};
pub use movement::{CubicMovement, NoiseMovement, VaryByNoise};
pub use multiplier::{Multiplier, VibratingMultiplier};
pub use style::{
    FilledPath, NoiseBrightness, RandomStrokeColor, StrokeColor, StrokeWidth,
    StrokeWidthFromValue,
};
pub use trail::{CurvedPath, HeadGrowth, MaximumLength};

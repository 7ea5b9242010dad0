//! Range mapping math shared by properties and behaviors.
//!
//! Every tunable value in a show lives inside a `[min, max]` range, and most
//! of the interesting wiring (knob scale to value, one property's range to
//! another's, noise output to stage coordinates) is a linear rescale between
//! two ranges. These helpers centralize that math, including the degenerate
//! `min == max` case, which maps to the output minimum rather than dividing
//! by zero.

/// Linearly interpolate between `a` and `b` by `t`.
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: the normalized position of `v` inside `[a, b]`.
///
/// A degenerate range (`a == b`) yields `0.0`.
#[inline]
pub fn inverse_lerp(v: f32, a: f32, b: f32) -> f32 {
    if a == b {
        0.0
    } else {
        (v - a) / (b - a)
    }
}

/// Rescale `v` from `[in_min, in_max]` into `[out_min, out_max]` without
/// clamping the result.
///
/// A degenerate input range yields `out_min`.
#[inline]
pub fn map(v: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    lerp(inverse_lerp(v, in_min, in_max), out_min, out_max)
}

/// Rescale `v` from `[in_min, in_max]` into `[out_min, out_max]`, clamping
/// the result to the output range.
#[inline]
pub fn map_clamped(v: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let mapped = map(v, in_min, in_max, out_min, out_max);
    if out_min <= out_max {
        mapped.clamp(out_min, out_max)
    } else {
        mapped.clamp(out_max, out_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.0, 2.0, 10.0), 2.0);
        assert_eq!(lerp(1.0, 2.0, 10.0), 10.0);
        assert_eq!(lerp(0.5, 2.0, 10.0), 6.0);
    }

    #[test]
    fn test_inverse_lerp_round_trip() {
        let v = lerp(0.3, -5.0, 5.0);
        assert!((inverse_lerp(v, -5.0, 5.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_lerp_degenerate_range() {
        assert_eq!(inverse_lerp(7.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_map_between_ranges() {
        // MIDI byte into unit range
        assert!((map(127.0, 0.0, 127.0, 0.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((map(63.5, 0.0, 127.0, 0.0, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_map_clamped_out_of_range_input() {
        assert_eq!(map_clamped(200.0, 0.0, 127.0, 0.0, 1.0), 1.0);
        assert_eq!(map_clamped(-5.0, 0.0, 127.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_map_clamped_degenerate_input_range() {
        assert_eq!(map_clamped(42.0, 1.0, 1.0, 10.0, 20.0), 10.0);
    }

    #[test]
    fn test_map_clamped_inverted_output_range() {
        let v = map_clamped(0.0, 0.0, 1.0, 5.0, -5.0);
        assert_eq!(v, 5.0);
        let v = map_clamped(2.0, 0.0, 1.0, 5.0, -5.0);
        assert_eq!(v, -5.0);
    }
}

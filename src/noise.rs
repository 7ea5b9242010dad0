//! Coherent 1D value noise for smooth, bounded pseudo-random motion.
//!
//! Movement and brightness behaviors sample noise at `time * velocity +
//! phase` per axis and remap the [0, 1] output into stage coordinates. The
//! sampler is hash-based value noise with smoothstep interpolation:
//! deterministic, continuous, and cheap enough to call a few times per
//! tracer per frame.

/// Integer hash mapped to [0, 1).
fn hashed(seed: u32) -> f32 {
    let x = seed.wrapping_mul(1103515245).wrapping_add(12345);
    let x = x ^ (x >> 16);
    (x & 0x7FFF_FFFF) as f32 / 0x7FFF_FFFF as f32
}

/// Sample coherent value noise at `x`. Output is in [0, 1].
///
/// Adjacent samples vary smoothly; the function has period 2^32 in the
/// integer lattice, which is effectively unbounded for show time values.
pub fn sample(x: f32) -> f32 {
    let xi = x.floor();
    let frac = x - xi;
    // Wrapping cast keeps negative lattice indices well-defined.
    let i = xi as i64 as u32;

    let a = hashed(i);
    let b = hashed(i.wrapping_add(1));

    // Smoothstep blend between lattice values.
    let t = frac * frac * (3.0 - 2.0 * frac);
    a + (b - a) * t
}

/// Sample noise at `x` and remap into `[out_min, out_max]`.
pub fn sample_mapped(x: f32, out_min: f32, out_max: f32) -> f32 {
    crate::range::map_clamped(sample(x), 0.0, 1.0, out_min, out_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_in_unit_range() {
        let mut x = -100.0;
        while x < 100.0 {
            let v = sample(x);
            assert!((0.0..=1.0).contains(&v), "sample({}) = {}", x, v);
            x += 0.37;
        }
    }

    #[test]
    fn test_sample_deterministic() {
        assert_eq!(sample(12.34), sample(12.34));
    }

    #[test]
    fn test_sample_continuous() {
        // Neighboring samples should not jump, on either side of zero.
        let mut x = -20.0;
        let mut prev = sample(x);
        while x < 20.0 {
            x += 0.01;
            let v = sample(x);
            assert!((v - prev).abs() < 0.1, "discontinuity at {}", x);
            prev = v;
        }
    }

    #[test]
    fn test_sample_interpolates_within_a_cell() {
        // Sub-integer positions land between the lattice values, not on a
        // per-cell plateau.
        let a = sample(0.125);
        let b = sample(0.25);
        let c = sample(0.375);
        assert!(a != b && b != c, "plateau inside a lattice cell: {} {} {}", a, b, c);
        let (lo, hi) = (sample(0.0), sample(1.0));
        for v in [a, b, c] {
            assert!((lo.min(hi)..=lo.max(hi)).contains(&v));
        }
    }

    #[test]
    fn test_sample_varies() {
        let a = sample(1.25);
        let b = sample(7.8);
        let c = sample(42.1);
        assert!(a != b || b != c);
    }

    #[test]
    fn test_sample_mapped_range() {
        let v = sample_mapped(3.3, -50.0, 50.0);
        assert!((-50.0..=50.0).contains(&v));
    }
}

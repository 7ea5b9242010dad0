//! Color handling and stroke palettes for trail rendering.
//!
//! Colors are linear RGBA in [0, 1]. Brightness follows the HSB convention
//! (value = max component), which is what the noise-driven brightness
//! behavior modulates each frame.

use rand::Rng;

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// HSB brightness: the maximum RGB component.
    pub fn brightness(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// The same hue and saturation at a new brightness. Black has no hue to
    /// preserve and becomes gray.
    pub fn with_brightness(&self, brightness: f32) -> Self {
        let brightness = brightness.clamp(0.0, 1.0);
        let current = self.brightness();
        if current <= 0.0 {
            return Self::rgba(brightness, brightness, brightness, self.a);
        }
        let k = brightness / current;
        Self::rgba(self.r * k, self.g * k, self.b * k, self.a)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Pre-defined stroke palettes sampled by the random-color behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Vibrant pinks, cyans and purples.
    #[default]
    Neon,

    /// Warm oranges and pinks.
    Sunset,

    /// Cool blues and teals.
    Ocean,

    /// Black to white.
    Grayscale,
}

impl Palette {
    /// The palette's color stops (5 colors).
    pub fn colors(&self) -> [Color; 5] {
        match self {
            Palette::Neon => [
                Color::rgb(1.0, 0.08, 0.58),
                Color::rgb(0.0, 1.0, 1.0),
                Color::rgb(0.58, 0.0, 0.83),
                Color::rgb(0.0, 1.0, 0.5),
                Color::rgb(1.0, 1.0, 0.0),
            ],
            Palette::Sunset => [
                Color::rgb(0.98, 0.31, 0.25),
                Color::rgb(0.99, 0.55, 0.38),
                Color::rgb(1.0, 0.76, 0.44),
                Color::rgb(0.91, 0.38, 0.57),
                Color::rgb(0.55, 0.25, 0.55),
            ],
            Palette::Ocean => [
                Color::rgb(0.0, 0.25, 0.42),
                Color::rgb(0.0, 0.47, 0.57),
                Color::rgb(0.0, 0.71, 0.65),
                Color::rgb(0.5, 0.88, 0.83),
                Color::rgb(0.87, 0.96, 0.95),
            ],
            Palette::Grayscale => [
                Color::rgb(0.1, 0.1, 0.1),
                Color::rgb(0.3, 0.3, 0.3),
                Color::rgb(0.5, 0.5, 0.5),
                Color::rgb(0.7, 0.7, 0.7),
                Color::rgb(0.95, 0.95, 0.95),
            ],
        }
    }

    /// Pick one stop at random.
    pub fn pick(&self, rng: &mut impl Rng) -> Color {
        let colors = self.colors();
        colors[rng.gen_range(0..colors.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_is_max_component() {
        assert_eq!(Color::rgb(0.2, 0.8, 0.4).brightness(), 0.8);
        assert_eq!(Color::BLACK.brightness(), 0.0);
    }

    #[test]
    fn test_with_brightness_preserves_hue_ratio() {
        let c = Color::rgb(0.8, 0.4, 0.2).with_brightness(0.4);
        assert!((c.r - 0.4).abs() < 1e-6);
        assert!((c.g - 0.2).abs() < 1e-6);
        assert!((c.b - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_with_brightness_on_black_is_gray() {
        let c = Color::BLACK.with_brightness(0.5);
        assert_eq!((c.r, c.g, c.b), (0.5, 0.5, 0.5));
    }

    #[test]
    fn test_palette_pick_is_a_member() {
        let mut rng = rand::thread_rng();
        let palette = Palette::Ocean;
        let picked = palette.pick(&mut rng);
        assert!(palette.colors().contains(&picked));
    }
}

//! Dye colour carried alongside density.

use serde::{Deserialize, Serialize};

/// Additive RGB dye colour.
///
/// Components are multiplied by the injected amount, so values are not
/// restricted to `[0, 1]`; clamping is left to whoever renders the fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Rainbow colour for a phase in radians (channels offset by 2 rad).
    pub fn rainbow(phase: f32) -> Self {
        Self {
            r: phase.sin() * 0.5 + 0.5,
            g: (phase + 2.0).sin() * 0.5 + 0.5,
            b: (phase + 4.0).sin() * 0.5 + 0.5,
        }
    }

    /// Scale every channel by `amount`.
    #[inline]
    pub fn scaled(self, amount: f32) -> Self {
        Self::new(self.r * amount, self.g * amount, self.b * amount)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

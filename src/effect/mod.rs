//! Single-color effects that produce one sample per output frame.
//!
//! An effect is rendered once per frame with the time since the previous
//! frame. Some effects also react to a trigger, such as a beat or a timer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::ColorSample;

const BLACK: ColorSample = ColorSample {
    red: 0.0,
    green: 0.0,
    blue: 0.0,
};

const WHITE: ColorSample = ColorSample {
    red: 1.0,
    green: 1.0,
    blue: 1.0,
};

/// Produces a color per frame.
pub trait Effect {
    /// Advance by `dt` seconds and return the color for this frame.
    fn render(&mut self, dt: f32) -> ColorSample;
    /// React to a trigger. Most effects ignore it.
    fn trigger(&mut self) {}
}

/// Convert HSV (hue in degrees, saturation and value in 0..1) to RGB.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> ColorSample {
    let hue = hue.rem_euclid(360.0) / 60.0;
    let chroma = value * saturation;
    let x = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match hue as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    ColorSample::new(r + m, g + m, b + m)
}

/// One fixed color.
#[derive(Debug, Clone)]
pub struct Solid {
    pub color: ColorSample,
}

impl Solid {
    pub fn new(color: ColorSample) -> Solid {
        Solid { color }
    }
}

impl Default for Solid {
    fn default() -> Self {
        Solid::new(ColorSample::new(0.0, 1.0, 128.0 / 255.0))
    }
}

impl Effect for Solid {
    fn render(&mut self, _dt: f32) -> ColorSample {
        self.color
    }
}

/// Jumps to a random fully saturated color on every trigger.
#[derive(Debug)]
pub struct RandomColor {
    rng: StdRng,
    color: ColorSample,
}

impl RandomColor {
    pub fn new() -> RandomColor {
        RandomColor::with_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> RandomColor {
        RandomColor::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> RandomColor {
        RandomColor {
            rng,
            color: Solid::default().color,
        }
    }
}

impl Default for RandomColor {
    fn default() -> Self {
        RandomColor::new()
    }
}

impl Effect for RandomColor {
    fn render(&mut self, _dt: f32) -> ColorSample {
        self.color
    }

    fn trigger(&mut self) {
        let hue = self.rng.gen_range(0.0..360.0);
        self.color = hsv_to_rgb(hue, 1.0, 1.0);
    }
}

/// White flash that fades to black.
#[derive(Debug, Clone)]
pub struct Stroboscope {
    /// Seconds since the last flash.
    elapsed: f32,
    /// Length of the fade in seconds.
    pub duration: f32,
}

impl Stroboscope {
    pub const DEFAULT_DURATION: f32 = 0.1;

    pub fn new(duration: f32) -> Stroboscope {
        // Start dark, as if the last flash was long ago.
        Stroboscope {
            elapsed: duration,
            duration,
        }
    }
}

impl Default for Stroboscope {
    fn default() -> Self {
        Stroboscope::new(Stroboscope::DEFAULT_DURATION)
    }
}

impl Effect for Stroboscope {
    fn render(&mut self, dt: f32) -> ColorSample {
        if self.elapsed >= self.duration {
            return BLACK;
        }
        let level = (1.0 - self.elapsed / self.duration).max(0.0);
        self.elapsed += dt;
        ColorSample::new(WHITE.red * level, WHITE.green * level, WHITE.blue * level)
    }

    fn trigger(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Rotates through the hue circle.
#[derive(Debug, Clone)]
pub struct ColorWheel {
    /// Current hue in degrees.
    offset: f32,
    /// Degrees per second.
    pub speed: f32,
}

impl ColorWheel {
    pub const DEFAULT_SPEED: f32 = 25.0;

    pub fn new(speed: f32) -> ColorWheel {
        ColorWheel { offset: 0.0, speed }
    }
}

impl Default for ColorWheel {
    fn default() -> Self {
        ColorWheel::new(ColorWheel::DEFAULT_SPEED)
    }
}

impl Effect for ColorWheel {
    fn render(&mut self, dt: f32) -> ColorSample {
        self.offset = (self.offset + self.speed * dt).rem_euclid(360.0);
        hsv_to_rgb(self.offset, 1.0, 1.0)
    }
}

/// Three phase-shifted sine waves, one per channel.
#[derive(Debug, Clone, Default)]
pub struct SineCycle {
    time: f32,
}

impl Effect for SineCycle {
    fn render(&mut self, dt: f32) -> ColorSample {
        self.time += dt;
        let t = self.time;
        ColorSample::new(
            t.sin() * 0.5 + 0.5,
            (t + 2.25).sin() * 0.5 + 0.5,
            (t + 4.5).sin() * 0.5 + 0.5,
        )
    }
}

//! Normalized colors and their conversion to wire bytes.

use serde::{Deserialize, Serialize};

/// One RGB sample with channels nominally in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl ColorSample {
    pub fn new(red: f32, green: f32, blue: f32) -> ColorSample {
        ColorSample { red, green, blue }
    }

    /// Convert to the 3-byte (R, G, B) payload.
    pub fn to_bytes(&self, mapping: ChannelMapping) -> [u8; 3] {
        [
            mapping.to_byte(self.red),
            mapping.to_byte(self.green),
            mapping.to_byte(self.blue),
        ]
    }
}

/// How a 0..1 channel value becomes a byte.
///
/// Both policies truncate toward zero, so 0.5 maps to 127.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChannelMapping {
    /// Unchecked `value * 255` wrapped modulo 256, matching what existing
    /// devices were fed. Out-of-range input produces garbage bytes
    /// (2.0 becomes 254, -1.0 becomes 1). This is a known defect, kept for
    /// byte compatibility.
    Wrapping,
    /// `value * 255` clamped into 0..=255 first.
    Clamped,
}

impl Default for ChannelMapping {
    fn default() -> Self {
        ChannelMapping::Wrapping
    }
}

impl ChannelMapping {
    pub fn to_byte(self, value: f32) -> u8 {
        match self {
            // Float-to-int casts saturate, so go through i64 and keep the low byte.
            ChannelMapping::Wrapping => (value * 255.0) as i64 as u8,
            ChannelMapping::Clamped => (value * 255.0).max(0.0).min(255.0) as u8,
        }
    }
}

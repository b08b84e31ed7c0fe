//! Color datagram parser.

use std::io::{self, Read};

use byteorder::ReadBytesExt;
use thiserror::Error;

use crate::client::ColorSample;

/// One color as a device receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFrame {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorFrame {
    /// Back to 0..1 channels.
    pub fn to_sample(&self) -> ColorSample {
        ColorSample::new(
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
        )
    }
}

pub type FrameResult<T> = Result<T, FrameError>;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("datagram too short for a color")]
    Truncated,
    #[error("{0} unexpected bytes after the color")]
    TrailingBytes(usize),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Read one color from a reader.
pub fn read_frame(buf: &mut dyn Read) -> FrameResult<ColorFrame> {
    let mut channel = || {
        buf.read_u8().map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => FrameError::Truncated,
            _ => FrameError::IoError(err),
        })
    };
    Ok(ColorFrame {
        red: channel()?,
        green: channel()?,
        blue: channel()?,
    })
}

/// Decode a whole datagram. It must be exactly one color.
pub fn decode_frame(data: &[u8]) -> FrameResult<ColorFrame> {
    let mut reader = data;
    let frame = read_frame(&mut reader)?;
    if !reader.is_empty() {
        return Err(FrameError::TrailingBytes(reader.len()));
    }
    Ok(frame)
}

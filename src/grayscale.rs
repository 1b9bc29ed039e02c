//! Grayscale reduction from RGBA pixel buffers.
//!
//! The detection pipeline works on single-channel luminance only. Each
//! sample is the plain channel average `(R + G + B) / 3`; alpha is ignored.

use crate::{Error, Result};

/// Single-channel luminance image for one frame.
///
/// Owned by the pipeline invocation that produced it and discarded when the
/// frame completes.
#[derive(Debug, Clone)]
pub struct LuminanceBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl LuminanceBuffer {
    /// Wrap an existing luminance plane.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `data.len() != width * height`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidInput(format!(
                "luminance buffer length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Buffer width in pixels
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw luminance samples, row-major
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at `(x, y)`; `None` outside the buffer
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }
}

/// Reduce an RGBA buffer to a luminance buffer.
///
/// Pure function: the same input always yields bit-identical output.
///
/// # Errors
///
/// Returns `Error::InvalidInput` when the buffer length is not
/// `width * height * 4` or a dimension is zero.
pub fn rgba_to_luminance(rgba: &[u8], width: usize, height: usize) -> Result<LuminanceBuffer> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "zero frame dimension: {width}x{height}"
        )));
    }
    if rgba.len() != width * height * 4 {
        return Err(Error::InvalidInput(format!(
            "RGBA buffer length {} does not match {}x{}x4",
            rgba.len(),
            width,
            height
        )));
    }

    let data = rgba
        .chunks_exact(4)
        .map(|px| ((u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2])) / 3) as u8)
        .collect();

    LuminanceBuffer::new(data, width, height)
}

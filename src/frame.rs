// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::fmt;

/// Errors produced when constructing a frame.
#[derive(Debug)]
pub enum FrameError {
    /// The frame has a zero width or height.
    ZeroSized { width: u32, height: u32 },
    /// The pixel buffer does not match width * height * 3.
    BufferSize { expected: usize, actual: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::ZeroSized { width, height } => {
                write!(f, "Zero-sized frame: {}x{}", width, height)
            }
            FrameError::BufferSize { expected, actual } => {
                write!(
                    f,
                    "Pixel buffer size mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// A fixed-size grid of 3-channel 8-bit color samples, row-major RGB.
///
/// Frames are the unit of exchange between the engine and its callers.
/// Every effect preserves frame dimensions exactly and clamps channel
/// values into range before a frame is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Creates a black frame of the given dimensions.
    pub fn new(width: u32, height: u32) -> Result<Frame, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroSized { width, height });
        }

        Ok(Frame {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        })
    }

    /// Creates a frame from an existing RGB buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Frame, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroSized { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Frame {
            width,
            height,
            data,
        })
    }

    /// Creates a frame filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Result<Frame, FrameError> {
        let mut frame = Frame::new(width, height)?;
        for pixel in frame.data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
        Ok(frame)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGB buffer, row-major, 3 bytes per pixel.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the frame, returning the raw buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Reads the pixel at (x, y). Coordinates are clamped to the frame.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Writes the pixel at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&color);
    }

    /// Samples the frame at a fractional coordinate using bilinear
    /// interpolation. Coordinates are clamped to the valid pixel range, so
    /// there is no wraparound and no out-of-bounds read.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> [f32; 3] {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
            let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
            out[c] = top * (1.0 - fy) + bottom * fy;
        }
        out
    }

    /// Extracts the luminance plane, one value per pixel in 0.0..=255.0.
    pub fn luminance(&self) -> Vec<f32> {
        self.data
            .chunks_exact(3)
            .map(|p| 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32)
            .collect()
    }

    /// Converts the pixel buffer to f32 values in 0.0..=255.0.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }

    /// Builds a frame from f32 channel values, clamping each into 0..=255.
    ///
    /// The caller guarantees the slice length matches the dimensions; this
    /// is an internal effect-path helper, so a mismatch is a programming
    /// error rather than a recoverable condition.
    pub fn from_f32(width: u32, height: u32, values: &[f32]) -> Frame {
        debug_assert_eq!(values.len(), width as usize * height as usize * 3);
        Frame {
            width,
            height,
            data: values
                .iter()
                .map(|&v| v.clamp(0.0, 255.0).round() as u8)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_frame_rejected() {
        assert!(Frame::new(0, 10).is_err());
        assert!(Frame::new(10, 0).is_err());
        assert!(Frame::new(1, 1).is_ok());
    }

    #[test]
    fn test_from_raw_validates_buffer() {
        assert!(Frame::from_raw(2, 2, vec![0; 12]).is_ok());
        assert!(Frame::from_raw(2, 2, vec![0; 11]).is_err());
        assert!(Frame::from_raw(2, 2, vec![0; 13]).is_err());
    }

    #[test]
    fn test_bilinear_sample_clamps_at_edges() {
        let mut frame = Frame::new(4, 4).unwrap();
        frame.put_pixel(3, 3, [200, 100, 50]);

        // Sampling far outside the frame clamps to the corner pixel.
        let sample = frame.sample_bilinear(100.0, 100.0);
        assert_eq!(sample, [200.0, 100.0, 50.0]);

        let sample = frame.sample_bilinear(-100.0, -100.0);
        assert_eq!(sample, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bilinear_sample_interpolates() {
        let mut frame = Frame::new(2, 1).unwrap();
        frame.put_pixel(0, 0, [0, 0, 0]);
        frame.put_pixel(1, 0, [100, 100, 100]);

        let sample = frame.sample_bilinear(0.5, 0.0);
        assert_eq!(sample, [50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_from_f32_clamps() {
        let frame = Frame::from_f32(1, 1, &[-10.0, 300.0, 128.0]);
        assert_eq!(frame.pixel(0, 0), [0, 255, 128]);
    }

    #[test]
    fn test_luminance_of_gray_is_gray() {
        let frame = Frame::filled(2, 2, [128, 128, 128]).unwrap();
        for v in frame.luminance() {
            assert!((v - 128.0).abs() < 0.01);
        }
    }
}

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

//! Color remapping effects: quantization, animated lookup tables, and
//! edge glow.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::frame::Frame;

use super::support;

/// Seed for the posterize dither stream. Dithering is pseudo-random by
/// design but drawn from this fixed seed, so identical runs produce
/// identical frames.
const DITHER_SEED: u64 = 0x706f_7374;

/// Dither noise source for posterize.
#[derive(Debug)]
pub struct PosterizeState {
    rng: StdRng,
}

impl Default for PosterizeState {
    fn default() -> Self {
        Self {
            rng: StdRng::seed_from_u64(DITHER_SEED),
        }
    }
}

/// Posterize: quantizes each channel to `2 + (1 - intensity) * 254`
/// levels. Below intensity 0.5 a bounded dither is added to break up the
/// banding; at or above 0.5 the output is fully deterministic per tick.
pub fn posterize(state: &mut PosterizeState, frame: &Frame, intensity: f32) -> Frame {
    let levels = (2.0 + (1.0 - intensity) * 254.0) as u32;
    let step = 255.0 / levels as f32;

    let dither = if intensity < 0.5 {
        ((1.0 - intensity * 2.0) * 10.0) as i32
    } else {
        0
    };

    let mut out = frame.clone();
    for value in out.data_mut() {
        let mut quantized = (*value as f32 / step).floor() * step;
        if dither > 0 {
            quantized += state.rng.gen_range(-dither..dither) as f32;
        }
        *value = quantized.clamp(0.0, 255.0) as u8;
    }

    out
}

/// Generator mode for the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LutMode {
    /// Blue-to-magenta ramp whose hue drifts with time.
    Cyberpunk,
    /// Static pink/violet ramp.
    Vaporwave,
    /// Red/green false-color thermal ramp.
    Infrared,
    /// Full hue wheel over the luminance range.
    Rainbow,
}

/// Builds the 256-entry color table for the given mode and time phase.
pub fn build_lut(mode: LutMode, time: f32) -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let t = i as f32 / 255.0;
        let rgb = match mode {
            LutMode::Cyberpunk => {
                let hue = (0.6 + t * 0.4 + time * 0.1).rem_euclid(1.0);
                support::hsv_to_rgb(hue * 360.0, 0.9, t)
            }
            LutMode::Vaporwave => {
                let hue = (0.8 + t * 0.2).rem_euclid(1.0);
                support::hsv_to_rgb(hue * 360.0, 0.7, t)
            }
            LutMode::Infrared => [i as f32, (255 - i) as f32, 128.0],
            LutMode::Rainbow => support::hsv_to_rgb(t * 360.0, 1.0, 1.0),
        };
        *entry = [rgb[0] as u8, rgb[1] as u8, rgb[2] as u8];
    }
    lut
}

/// LUT remap: maps the frame's luminance through the animated table and
/// blends with the original by intensity. At intensity 1 the output is the
/// pure table lookup with no contribution from the original color.
pub fn lut(mode: LutMode, frame: &Frame, intensity: f32, time: f32) -> Frame {
    let table = build_lut(mode, time);
    let luma = frame.luminance();

    let mut out = frame.clone();
    let data = out.data_mut();
    for (i, l) in luma.iter().enumerate() {
        let mapped = table[l.clamp(0.0, 255.0) as usize];
        for c in 0..3 {
            let blended =
                mapped[c] as f32 * intensity + data[i * 3 + c] as f32 * (1.0 - intensity);
            data[i * 3 + c] = blended.clamp(0.0, 255.0).round() as u8;
        }
    }

    out
}

/// Gradient magnitude above which a pixel counts as an edge.
const EDGE_THRESHOLD: f32 = 100.0;

/// Edge glow: Sobel edge detection, blurred into a glow mask, colorized
/// with a hue that advances with time, and additively blended in.
pub fn edge_glow(frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let luma = frame.luminance();

    let sample = |x: i64, y: i64| -> f32 {
        let x = x.clamp(0, width as i64 - 1) as usize;
        let y = y.clamp(0, height as i64 - 1) as usize;
        luma[y * width + x]
    };

    let mut edges = vec![0.0f32; width * height];
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let gx = sample(x + 1, y - 1) + 2.0 * sample(x + 1, y) + sample(x + 1, y + 1)
                - sample(x - 1, y - 1)
                - 2.0 * sample(x - 1, y)
                - sample(x - 1, y + 1);
            let gy = sample(x - 1, y + 1) + 2.0 * sample(x, y + 1) + sample(x + 1, y + 1)
                - sample(x - 1, y - 1)
                - 2.0 * sample(x, y - 1)
                - sample(x + 1, y - 1);
            let magnitude = (gx * gx + gy * gy).sqrt();
            edges[y as usize * width + x as usize] = if magnitude > EDGE_THRESHOLD {
                255.0
            } else {
                0.0
            };
        }
    }

    let radius = (5.0 + intensity * 10.0) as usize;
    support::blur_plane(&mut edges, width, height, radius);

    let hue = (time * 50.0).rem_euclid(360.0);
    let neon = support::hsv_to_rgb(hue, 1.0, 1.0);

    let mut out = vec![0.0f32; width * height * 3];
    let data = frame.data();
    for (i, glow) in edges.iter().enumerate() {
        for c in 0..3 {
            out[i * 3 + c] =
                data[i * 3 + c] as f32 + glow / 255.0 * neon[c] * intensity * 2.0;
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posterize_coarsest_level_is_deterministic() {
        // Uniform 128 gray at intensity 1: two levels, step 127.5, and
        // 128 quantizes to 127. No dithering branch at intensity >= 0.5.
        let mut state = PosterizeState::default();
        let frame = Frame::filled(64, 64, [128, 128, 128]).unwrap();
        let out = posterize(&mut state, &frame, 1.0);
        assert_eq!(out, Frame::filled(64, 64, [127, 127, 127]).unwrap());
    }

    #[test]
    fn test_posterize_zero_intensity_stays_close() {
        let mut state = PosterizeState::default();
        let frame = Frame::filled(8, 8, [128, 128, 128]).unwrap();
        let out = posterize(&mut state, &frame, 0.0);
        // 256 levels plus a +/-10 dither bound.
        for (a, b) in out.data().iter().zip(frame.data().iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 11);
        }
    }

    #[test]
    fn test_posterize_dither_is_reproducible() {
        let frame = Frame::filled(16, 16, [100, 100, 100]).unwrap();
        let mut first = PosterizeState::default();
        let mut second = PosterizeState::default();
        assert_eq!(
            posterize(&mut first, &frame, 0.1),
            posterize(&mut second, &frame, 0.1)
        );
    }

    #[test]
    fn test_lut_full_intensity_is_pure_lookup() {
        let frame = Frame::filled(4, 4, [128, 128, 128]).unwrap();
        let out = lut(LutMode::Rainbow, &frame, 1.0, 0.0);
        let table = build_lut(LutMode::Rainbow, 0.0);
        let expected = table[128];
        assert_eq!(out.pixel(0, 0), expected);
    }

    #[test]
    fn test_lut_zero_intensity_is_identity() {
        let frame = Frame::filled(4, 4, [31, 87, 203]).unwrap();
        let out = lut(LutMode::Cyberpunk, &frame, 0.0, 3.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_infrared_lut_shape() {
        let table = build_lut(LutMode::Infrared, 0.0);
        assert_eq!(table[0], [0, 255, 128]);
        assert_eq!(table[255], [255, 0, 128]);
    }

    #[test]
    fn test_edge_glow_zero_intensity_is_identity() {
        let mut frame = Frame::filled(8, 8, [0, 0, 0]).unwrap();
        for y in 0..8 {
            for x in 4..8 {
                frame.put_pixel(x, y, [255, 255, 255]);
            }
        }
        let out = edge_glow(&frame, 0.0, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_edge_glow_brightens_edges() {
        let mut frame = Frame::filled(16, 16, [0, 0, 0]).unwrap();
        for y in 0..16 {
            for x in 8..16 {
                frame.put_pixel(x, y, [200, 200, 200]);
            }
        }
        let out = edge_glow(&frame, 1.0, 0.0);
        // Pixels near the vertical edge pick up glow.
        let near_edge: u32 = out.pixel(7, 8).iter().map(|&v| v as u32).sum();
        let original: u32 = frame.pixel(7, 8).iter().map(|&v| v as u32).sum();
        assert!(near_edge > original);
    }
}

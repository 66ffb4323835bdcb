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

//! Procedural generators: escape-time fractals and plane-wave
//! interference. These are pure per-pixel computations, so the row loops
//! run on the rayon pool; the chain fold around them stays sequential.

use std::f32::consts::PI;

use rayon::prelude::*;
use serde::Deserialize;

use crate::frame::Frame;

/// Escape-time iteration cap.
const MAX_ITERATIONS: u32 = 50;

/// Fractal generator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalMode {
    /// Fixed-parameter set; time pans the viewport.
    Mandelbrot,
    /// Variable-parameter set; time orbits the Julia constant.
    Julia,
}

#[derive(Debug)]
pub struct FractalState {
    mode: FractalMode,
}

impl FractalState {
    pub fn new(mode: FractalMode) -> Self {
        Self { mode }
    }
}

/// Counts escape-time iterations for one point of the complex plane.
#[inline]
fn escape_iterations(mut zr: f32, mut zi: f32, cr: f32, ci: f32) -> u32 {
    let mut count = 0;
    for _ in 0..MAX_ITERATIONS {
        if zr * zr + zi * zi > 4.0 {
            break;
        }
        let next_zr = zr * zr - zi * zi + cr;
        zi = 2.0 * zr * zi + ci;
        zr = next_zr;
        count += 1;
    }
    count
}

/// The "hot" color ramp: black through red and yellow to white.
#[inline]
fn hot_colormap(t: f32) -> [f32; 3] {
    [
        (3.0 * t).clamp(0.0, 1.0) * 255.0,
        (3.0 * t - 1.0).clamp(0.0, 1.0) * 255.0,
        (3.0 * t - 2.0).clamp(0.0, 1.0) * 255.0,
    ]
}

/// Fractal overlay: computes an escape-time field over a complex-plane
/// viewport (panned or parameter-orbited by time), normalizes it to the
/// hot color ramp, and blends it over the source by intensity. A field
/// whose maximum is zero carries no signal and leaves the frame untouched.
pub fn fractal(state: &mut FractalState, frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let zoom = 1.0 + intensity * 3.0;

    let iterations: Vec<u32> = match state.mode {
        FractalMode::Mandelbrot => {
            let offset_x = (time * 0.5).cos() * 0.5;
            let offset_y = (time * 0.5).sin() * 0.5;
            let x0 = -2.5 / zoom + offset_x;
            let x1 = 1.0 / zoom + offset_x;
            let y0 = -1.0 / zoom + offset_y;
            let y1 = 1.0 / zoom + offset_y;

            (0..height)
                .into_par_iter()
                .flat_map_iter(|y| {
                    let ci = y0 + (y1 - y0) * y as f32 / (height - 1).max(1) as f32;
                    (0..width).map(move |x| {
                        let cr = x0 + (x1 - x0) * x as f32 / (width - 1).max(1) as f32;
                        escape_iterations(0.0, 0.0, cr, ci)
                    })
                })
                .collect()
        }
        FractalMode::Julia => {
            let cr = -0.7 + time.cos() * 0.2;
            let ci = 0.27 + time.sin() * 0.2;
            let extent = 1.5 / zoom;

            (0..height)
                .into_par_iter()
                .flat_map_iter(|y| {
                    let zi = -extent + 2.0 * extent * y as f32 / (height - 1).max(1) as f32;
                    (0..width).map(move |x| {
                        let zr = -extent + 2.0 * extent * x as f32 / (width - 1).max(1) as f32;
                        escape_iterations(zr, zi, cr, ci)
                    })
                })
                .collect()
        }
    };

    let max = iterations.iter().copied().max().unwrap_or(0);
    if max == 0 {
        // Degenerate field: nothing escaped late enough to color.
        return frame.clone();
    }

    let blend = intensity * 0.5;
    let data = frame.data();
    let mut out = vec![0.0f32; width * height * 3];
    for (i, &count) in iterations.iter().enumerate() {
        let color = hot_colormap(count as f32 / max as f32);
        for c in 0..3 {
            out[i * 3 + c] = data[i * 3 + c] as f32 * (1.0 - blend) + color[c] * blend;
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &out)
}

/// Number of superposed plane waves in the interference pattern.
const HOLOGRAM_WAVES: usize = 3;

/// Horizontal offset between the color channels' copies of the pattern.
const HOLOGRAM_CHANNEL_SHIFT: i64 = 2;

/// Hologram: superposes plane waves whose angles and frequencies advance
/// with time, splits the pattern across channels with small opposing
/// horizontal offsets, multiplies it into the frame, and darkens every
/// third row to suggest scan structure.
///
/// The base pattern multiplies the frame by at most 0.7..=1.0, so even at
/// intensity zero the output sits at a 0.7 brightness floor with the scan
/// rows darkened further. That floor is inherent to the effect.
pub fn hologram(frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    // One normalized interference value per pixel.
    let pattern: Vec<f32> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..width).map(move |x| {
                let mut sum = 0.0f32;
                for k in 0..HOLOGRAM_WAVES {
                    let angle = k as f32 * PI / 3.0 + time * 0.5;
                    let frequency = 0.05 + k as f32 * 0.02;
                    sum += ((x as f32 * angle.cos() + y as f32 * angle.sin()) * frequency).sin();
                }
                (sum + HOLOGRAM_WAVES as f32) / (2.0 * HOLOGRAM_WAVES as f32)
            })
        })
        .collect();

    let shifted = |x: usize, y: usize, shift: i64| -> f32 {
        let sx = (x as i64 - shift).rem_euclid(width as i64) as usize;
        pattern[y * width + sx]
    };

    let data = frame.data();
    let mut out = vec![0.0f32; width * height * 3];
    for y in 0..height {
        let scan = if y % 3 == 0 { 0.8 } else { 1.0 };
        for x in 0..width {
            let i = y * width + x;
            let channel_pattern = [
                shifted(x, y, HOLOGRAM_CHANNEL_SHIFT),
                pattern[i],
                shifted(x, y, -HOLOGRAM_CHANNEL_SHIFT),
            ];
            for c in 0..3 {
                let gain = 0.7 + channel_pattern[c] * 0.3 * intensity;
                out[i * 3 + c] = data[i * 3 + c] as f32 * gain * scan;
            }
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractal_zero_intensity_is_identity() {
        let mut state = FractalState::new(FractalMode::Mandelbrot);
        let frame = Frame::filled(16, 16, [33, 66, 99]).unwrap();
        let out = fractal(&mut state, &frame, 0.0, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_fractal_overlays_at_full_intensity() {
        let mut state = FractalState::new(FractalMode::Mandelbrot);
        let frame = Frame::filled(32, 32, [0, 0, 0]).unwrap();
        let out = fractal(&mut state, &frame, 1.0, 0.0);
        // The hot ramp lights up interior regions over a black source.
        assert!(out.data().iter().any(|&v| v > 0));
    }

    #[test]
    fn test_julia_is_deterministic() {
        let mut first = FractalState::new(FractalMode::Julia);
        let mut second = FractalState::new(FractalMode::Julia);
        let frame = Frame::filled(24, 24, [50, 50, 50]).unwrap();
        assert_eq!(
            fractal(&mut first, &frame, 0.8, 1.25),
            fractal(&mut second, &frame, 0.8, 1.25)
        );
    }

    #[test]
    fn test_hot_colormap_endpoints() {
        assert_eq!(hot_colormap(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(hot_colormap(1.0), [255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_hologram_darkens_scan_rows() {
        let frame = Frame::filled(12, 12, [200, 200, 200]).unwrap();
        let out = hologram(&frame, 0.0, 0.0);

        // At intensity zero every pixel sits at the 0.7 floor, with scan
        // rows darkened by a further 0.8.
        assert_eq!(out.pixel(0, 1), [140, 140, 140]);
        assert_eq!(out.pixel(0, 0), [112, 112, 112]);
    }

    #[test]
    fn test_hologram_modulates_with_intensity() {
        let frame = Frame::filled(32, 32, [200, 200, 200]).unwrap();
        let out = hologram(&frame, 1.0, 0.0);
        let values: Vec<u8> = out.data().to_vec();
        let min = *values.iter().min().unwrap();
        let max = *values.iter().max().unwrap();
        assert!(max > min, "interference pattern should vary across pixels");
    }
}

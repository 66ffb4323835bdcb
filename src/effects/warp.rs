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

//! Geometric warps: each computes a per-pixel sampling coordinate and
//! resamples the source with clamped bilinear interpolation. Animated
//! warps advance an internal phase per call instead of reading wall-clock
//! time.

use std::f32::consts::PI;

use crate::frame::Frame;

use super::support;

/// Resamples `frame` through a displacement field, where `field(x, y)`
/// yields the source coordinate to sample for output pixel (x, y).
/// Sampling is clamped bilinear, so the field may point anywhere.
fn remap<F>(frame: &Frame, field: F) -> Frame
where
    F: Fn(u32, u32) -> (f32, f32),
{
    let width = frame.width();
    let height = frame.height();
    let mut out = vec![0.0f32; width as usize * height as usize * 3];

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = field(x, y);
            let sample = frame.sample_bilinear(sx, sy);
            let i = (y as usize * width as usize + x as usize) * 3;
            out[i..i + 3].copy_from_slice(&sample);
        }
    }

    Frame::from_f32(width, height, &out)
}

/// Internally advancing phase for the displacement noise.
#[derive(Debug, Default)]
pub struct DisplaceState {
    phase: f32,
}

/// Smooth periodic displacement: two interleaved sine/cosine octaves of
/// position, scaled by intensity and the frame dimensions.
pub fn displace(state: &mut DisplaceState, frame: &Frame, intensity: f32) -> Frame {
    state.phase += 0.05;
    let phase = state.phase;

    let w = frame.width() as f32;
    let h = frame.height() as f32;
    let scale = 0.01 + intensity * 0.05;

    remap(frame, |x, y| {
        let fx = x as f32 * scale;
        let fy = y as f32 * scale;
        let dx = (fx + phase).sin() * (fy * 2.0).cos() * w * intensity * 0.1;
        let dy = (fy + phase).cos() * (fx * 2.0).sin() * h * intensity * 0.1;
        (x as f32 + dx, y as f32 + dy)
    })
}

/// Internally advancing phase for the heat shimmer.
#[derive(Debug, Default)]
pub struct HeatHazeState {
    phase: f32,
}

/// Heat haze: multi-frequency horizontal waves plus a slower vertical
/// wave, followed by a small blur that stands in for refraction scatter.
pub fn heat_haze(state: &mut HeatHazeState, frame: &Frame, intensity: f32) -> Frame {
    state.phase += 0.1;
    let phase = state.phase;

    let warped = remap(frame, |x, y| {
        let yf = y as f32;
        let xf = x as f32;
        let dx = (yf * 0.05 + phase).sin() * intensity * 15.0
            + (yf * 0.1 + phase * 1.3).sin() * intensity * 8.0;
        let dy = (xf * 0.05 + phase * 0.7).cos() * intensity * 5.0;
        (xf + dx, yf + dy)
    });

    let radius = (1.0 + intensity * 3.0) as usize;
    let mut values = warped.to_f32();
    support::blur_rgb(
        &mut values,
        frame.width() as usize,
        frame.height() as usize,
        radius,
    );
    Frame::from_f32(frame.width(), frame.height(), &values)
}

/// Base segment multiplier for the kaleidoscope.
const KALEIDOSCOPE_SEGMENTS: f32 = 6.0;

#[derive(Debug, Default)]
pub struct KaleidoscopeState;

/// Number of mirrored segments at the given intensity. Three is the floor
/// so even intensity zero produces a valid radial partition.
pub fn kaleidoscope_segments(intensity: f32) -> u32 {
    (3.0 + KALEIDOSCOPE_SEGMENTS * intensity * 10.0) as u32
}

/// Kaleidoscope: folds each pixel's polar angle into a mirrored, rotating
/// segment and resamples at the unfolded coordinate, producing radial
/// symmetry. Segment count scales with intensity; rotation advances with
/// time.
pub fn kaleidoscope(
    _state: &mut KaleidoscopeState,
    frame: &Frame,
    intensity: f32,
    time: f32,
) -> Frame {
    let cx = (frame.width() / 2) as f32;
    let cy = (frame.height() / 2) as f32;

    let segments = kaleidoscope_segments(intensity);
    let segment_angle = 2.0 * PI / segments as f32;
    let rotation = time * intensity;

    remap(frame, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let angle = dy.atan2(dx);
        let radius = (dx * dx + dy * dy).sqrt();

        let mut folded = angle.rem_euclid(segment_angle);
        // Mirror every other segment so the seams match.
        if (angle / segment_angle).rem_euclid(2.0) > 1.0 {
            folded = segment_angle - folded;
        }
        folded += rotation;

        (cx + radius * folded.cos(), cy + radius * folded.sin())
    })
}

/// Previous-frame luminance for the flow estimate.
#[derive(Debug, Default)]
pub struct OpticalFlowState {
    prev_luma: Option<Vec<f32>>,
}

/// Guard added to the gradient denominator so flat regions produce zero
/// flow instead of dividing by zero.
const FLOW_EPSILON: f32 = 1.0;

/// Optical flow warp: estimates a per-pixel motion vector from the
/// luminance change against the spatial gradient, amplifies it by
/// intensity, and resamples along it. The first call has no previous frame
/// and passes the input through.
pub fn optical_flow(state: &mut OpticalFlowState, frame: &Frame, intensity: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let luma = frame.luminance();

    let prev = match &state.prev_luma {
        Some(prev) if prev.len() == luma.len() => prev,
        _ => {
            state.prev_luma = Some(luma);
            return frame.clone();
        }
    };

    let gain = 1.0 + intensity * 10.0;
    let sample_luma = |x: i64, y: i64| -> f32 {
        let x = x.clamp(0, width as i64 - 1) as usize;
        let y = y.clamp(0, height as i64 - 1) as usize;
        luma[y * width + x]
    };

    let out = remap(frame, |x, y| {
        let xi = x as i64;
        let yi = y as i64;
        let gx = (sample_luma(xi + 1, yi) - sample_luma(xi - 1, yi)) * 0.5;
        let gy = (sample_luma(xi, yi + 1) - sample_luma(xi, yi - 1)) * 0.5;
        let dt = luma[y as usize * width + x as usize] - prev[y as usize * width + x as usize];

        let denom = gx * gx + gy * gy + FLOW_EPSILON;
        let flow_x = -dt * gx / denom * gain;
        let flow_y = -dt * gy / denom * gain;

        (x as f32 + flow_x, y as f32 + flow_y)
    });

    state.prev_luma = Some(luma);
    out
}

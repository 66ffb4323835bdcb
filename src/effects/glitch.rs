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

//! Glitch and atmosphere overlays: datamosh-style pixel sorting, CRT/VHS
//! scan artifacts, and volumetric fog.

use crate::frame::Frame;

use super::support;

/// Pixel sort: sorts the pixels of every other row by luminance, covering
/// a fraction of the frame that grows with intensity, and blends the
/// sorted row with the original by intensity.
pub fn pixel_sort(frame: &Frame, intensity: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let luma = frame.luminance();

    let rows_to_sort = (height as f32 * intensity) as usize;
    let mut out = frame.clone();

    let mut order: Vec<usize> = Vec::with_capacity(width);
    for y in (0..rows_to_sort.min(height)).step_by(2) {
        order.clear();
        order.extend(0..width);
        let row_luma = &luma[y * width..(y + 1) * width];
        order.sort_by(|&a, &b| row_luma[a].total_cmp(&row_luma[b]));

        let row_start = y * width * 3;
        let original = frame.data()[row_start..row_start + width * 3].to_vec();
        let out_row = &mut out.data_mut()[row_start..row_start + width * 3];

        for (dst, &src) in order.iter().enumerate() {
            for c in 0..3 {
                let sorted = original[src * 3 + c] as f32;
                let current = original[dst * 3 + c] as f32;
                let blended = sorted * intensity + current * (1.0 - intensity);
                out_row[dst * 3 + c] = blended.clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    out
}

/// Accumulated vertical roll for the CRT effect.
#[derive(Debug, Default)]
pub struct ScanlinesState {
    roll: u32,
}

/// CRT scanlines: darkens every other row, accumulates a vertical roll,
/// and wobbles each row horizontally with a time-driven sine (the VHS
/// tracking error).
pub fn scanlines(state: &mut ScanlinesState, frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    let darken = 1.0 - intensity * 0.3;
    let mut values = frame.to_f32();
    for y in (0..height).step_by(2) {
        for v in &mut values[y * width * 3..(y + 1) * width * 3] {
            *v *= darken;
        }
    }

    state.roll = (state.roll + (intensity * 2.0) as u32) % height as u32;
    if state.roll > 0 {
        // Vertical wrap: move content down by `roll` rows.
        values.rotate_right(state.roll as usize * width * 3);
    }

    for y in 0..height {
        let shift = ((y as f32 * 0.1 + time * 5.0).sin() * intensity * 5.0) as i64;
        if shift != 0 {
            let row = &mut values[y * width * 3..(y + 1) * width * 3];
            let shift = shift.rem_euclid(width as i64) as usize * 3;
            row.rotate_right(shift);
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &values)
}

/// Fog tint, loosely a hazy sky blue.
const FOG_COLOR: [f32; 3] = [200.0, 220.0, 255.0];

/// Number of rotating light rays.
const RAY_COUNT: usize = 5;

/// Volumetric fog: treats blurred luminance as a depth map, tints it with
/// the fog color, adds rotating exponential-falloff light rays, and blends
/// the whole thing additively.
pub fn volumetric(frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    let mut depth = frame.luminance();
    support::blur_plane(&mut depth, width, height, 10);

    // Ray origins sit on a circle around the center, rotating with time.
    let mut rays: Vec<(f32, f32)> = Vec::with_capacity(RAY_COUNT);
    for k in 0..RAY_COUNT {
        let angle = (time * 20.0 + k as f32 * 36.0).to_radians();
        rays.push((
            width as f32 / 2.0 + angle.cos() * width as f32 * 0.4,
            height as f32 / 2.0 + angle.sin() * height as f32 * 0.4,
        ));
    }
    let falloff = 50.0 + intensity * 100.0;

    let data = frame.data();
    let mut out = vec![0.0f32; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let fog_strength = depth[i] / 255.0 * intensity;

            let mut ray_light = 0.0f32;
            for &(rx, ry) in &rays {
                let dx = x as f32 - rx;
                let dy = y as f32 - ry;
                let distance = (dx * dx + dy * dy).sqrt();
                ray_light += (-distance / falloff).exp();
            }
            ray_light *= 50.0 * intensity;

            for c in 0..3 {
                out[i * 3 + c] =
                    data[i * 3 + c] as f32 + FOG_COLOR[c] * fog_strength + ray_light;
            }
        }
    }

    Frame::from_f32(frame.width(), frame.height(), &out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_sort_zero_intensity_is_identity() {
        let mut frame = Frame::filled(8, 8, [0, 0, 0]).unwrap();
        frame.put_pixel(3, 0, [255, 0, 0]);
        let out = pixel_sort(&frame, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_pixel_sort_orders_rows_by_luminance() {
        let mut frame = Frame::filled(4, 2, [0, 0, 0]).unwrap();
        // Row 0 descending in brightness; full intensity sorts it
        // ascending.
        frame.put_pixel(0, 0, [200, 200, 200]);
        frame.put_pixel(1, 0, [150, 150, 150]);
        frame.put_pixel(2, 0, [100, 100, 100]);
        frame.put_pixel(3, 0, [50, 50, 50]);

        let out = pixel_sort(&frame, 1.0);
        assert_eq!(out.pixel(0, 0), [50, 50, 50]);
        assert_eq!(out.pixel(3, 0), [200, 200, 200]);
    }

    #[test]
    fn test_scanlines_zero_intensity_is_identity() {
        let mut state = ScanlinesState::default();
        let frame = Frame::filled(8, 8, [77, 88, 99]).unwrap();
        let out = scanlines(&mut state, &frame, 0.0, 1.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_scanlines_darken_alternating_rows() {
        let mut state = ScanlinesState::default();
        let frame = Frame::filled(4, 4, [100, 100, 100]).unwrap();
        let out = scanlines(&mut state, &frame, 1.0, 0.0);

        // With a uniform input the roll is invisible, but the darkened
        // rows alternate with untouched ones.
        let mut values: Vec<u8> = (0..4).map(|y| out.pixel(0, y)[0]).collect();
        values.sort_unstable();
        assert_eq!(values, vec![70, 70, 100, 100]);
    }

    #[test]
    fn test_volumetric_zero_intensity_is_identity() {
        let frame = Frame::filled(12, 12, [90, 90, 90]).unwrap();
        let out = volumetric(&frame, 0.0, 0.0);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_volumetric_adds_light() {
        let frame = Frame::filled(16, 16, [50, 50, 50]).unwrap();
        let out = volumetric(&frame, 1.0, 0.0);
        // Fog and rays only ever brighten.
        for (a, b) in out.data().iter().zip(frame.data().iter()) {
            assert!(a >= b);
        }
    }
}

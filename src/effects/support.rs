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

//! Shared pixel math for the effect families.

/// Converts HSV (h in degrees, s and v in 0..=1) to RGB in 0.0..=255.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    // Each 60 degree sector of the color wheel orders the components
    // differently.
    let sector = (h / 60.0).floor() as u8 % 6;
    let (r, g, b) = match sector {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [(r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0]
}

/// Box-blurs a single plane in place with the given radius, running a
/// horizontal then a vertical pass. Radius 0 is a no-op.
pub fn blur_plane(plane: &mut [f32], width: usize, height: usize, radius: usize) {
    if radius == 0 || plane.len() != width * height {
        return;
    }

    let mut scratch = vec![0.0f32; plane.len()];

    // Horizontal pass.
    for y in 0..height {
        let row = &plane[y * width..(y + 1) * width];
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            let sum: f32 = row[lo..=hi].iter().sum();
            scratch[y * width + x] = sum / (hi - lo + 1) as f32;
        }
    }

    // Vertical pass.
    for x in 0..width {
        for y in 0..height {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(height - 1);
            let mut sum = 0.0;
            for row in lo..=hi {
                sum += scratch[row * width + x];
            }
            plane[y * width + x] = sum / (hi - lo + 1) as f32;
        }
    }
}

/// Box-blurs an interleaved RGB buffer in place.
pub fn blur_rgb(values: &mut [f32], width: usize, height: usize, radius: usize) {
    if radius == 0 {
        return;
    }

    let mut plane = vec![0.0f32; width * height];
    for channel in 0..3 {
        for (i, v) in plane.iter_mut().enumerate() {
            *v = values[i * 3 + channel];
        }
        blur_plane(&mut plane, width, height, radius);
        for (i, v) in plane.iter().enumerate() {
            values[i * 3 + channel] = *v;
        }
    }
}

/// Shifts every row of a plane horizontally by `shift` pixels, wrapping at
/// the row boundary. Positive shifts move content to the right.
pub fn roll_plane_rows(plane: &mut [f32], width: usize, shift: i64) {
    if width == 0 {
        return;
    }
    let shift = shift.rem_euclid(width as i64) as usize;
    if shift == 0 {
        return;
    }

    for row in plane.chunks_exact_mut(width) {
        row.rotate_right(shift);
    }
}

/// Shifts every row of an interleaved RGB buffer horizontally, wrapping at
/// the row boundary.
pub fn roll_rgb_rows(values: &mut [f32], width: usize, shift: i64) {
    if width == 0 {
        return;
    }
    let shift = shift.rem_euclid(width as i64) as usize;
    if shift == 0 {
        return;
    }

    for row in values.chunks_exact_mut(width * 3) {
        row.rotate_right(shift * 3);
    }
}

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

//! Point-entity simulations driven by the underlying image. Both effects
//! lazily allocate their point sets on the first processed frame (the
//! frame dimensions size the spawn area) and keep them for the session.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::Frame;

/// Default particle count for the flow-field system.
const PARTICLE_COUNT: usize = 1000;

/// Default point count for the plexus network. The pairwise pass below is
/// O(N^2), so this number is the knob that bounds per-frame cost.
const PLEXUS_POINT_COUNT: usize = 100;

/// Seeds for the point spawns. Fixed so runs are reproducible.
const PARTICLE_SEED: u64 = 0x7061_7274;
const PLEXUS_SEED: u64 = 0x706c_6578;

/// Position/velocity arrays for a set of points.
#[derive(Debug)]
struct Points {
    x: Vec<f32>,
    y: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
}

impl Points {
    fn len(&self) -> usize {
        self.x.len()
    }
}

/// Draws a filled disc, clipped at the frame boundary. Radius 0 paints the
/// center pixel.
fn fill_disc(frame: &mut Frame, cx: i64, cy: i64, radius: i64, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let x = cx + dx;
            let y = cy + dy;
            if x >= 0 && y >= 0 {
                frame.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draws a line with Bresenham stepping, alpha-blended over the frame.
/// Thickness is painted as a small square stamp at each step.
fn draw_line(
    frame: &mut Frame,
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    color: [u8; 3],
    alpha: f32,
    thickness: i64,
) {
    let alpha = alpha.clamp(0.0, 1.0);
    let half = (thickness / 2).max(0);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        for oy in -half..=half {
            for ox in -half..=half {
                let px = x + ox;
                let py = y + oy;
                if px >= 0 && py >= 0 && px < frame.width() as i64 && py < frame.height() as i64 {
                    let existing = frame.pixel(px as u32, py as u32);
                    let mut blended = [0u8; 3];
                    for c in 0..3 {
                        let v = existing[c] as f32 * (1.0 - alpha) + color[c] as f32 * alpha;
                        blended[c] = v.clamp(0.0, 255.0).round() as u8;
                    }
                    frame.put_pixel(px as u32, py as u32, blended);
                }
            }
        }

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Flow-field particle system state.
#[derive(Debug)]
pub struct ParticleState {
    points: Option<Points>,
    count: usize,
}

impl Default for ParticleState {
    fn default() -> Self {
        Self {
            points: None,
            count: PARTICLE_COUNT,
        }
    }
}

fn spawn_particles(count: usize, width: f32, height: f32, seed: u64) -> Points {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Points {
        x: Vec::with_capacity(count),
        y: Vec::with_capacity(count),
        vx: vec![0.0; count],
        vy: vec![0.0; count],
    };
    for _ in 0..count {
        points.x.push(rng.gen::<f32>() * width);
        points.y.push(rng.gen::<f32>() * height);
    }
    points
}

/// Particle advection: each particle's velocity direction comes from the
/// brightness of the image under it (plus the time phase), its speed from
/// intensity. Positions wrap at the frame edges. Each particle renders as
/// a small disc in the color of the pixel it sits on.
pub fn particles(state: &mut ParticleState, frame: &Frame, intensity: f32, time: f32) -> Frame {
    let width = frame.width() as f32;
    let height = frame.height() as f32;

    let count = state.count;
    let points = state
        .points
        .get_or_insert_with(|| spawn_particles(count, width, height, PARTICLE_SEED));

    for i in 0..points.len() {
        let sample = frame.pixel(points.x[i] as u32, points.y[i] as u32);
        let brightness =
            (sample[0] as f32 + sample[1] as f32 + sample[2] as f32) / 3.0 / 255.0;
        let angle = brightness * 2.0 * PI + time;
        points.vx[i] = angle.cos() * intensity * 2.0;
        points.vy[i] = angle.sin() * intensity * 2.0;

        points.x[i] = (points.x[i] + points.vx[i]).rem_euclid(width);
        points.y[i] = (points.y[i] + points.vy[i]).rem_euclid(height);
    }

    let radius = (2.0 * intensity) as i64;
    let mut out = frame.clone();
    for i in 0..points.len() {
        let x = points.x[i] as u32;
        let y = points.y[i] as u32;
        let color = frame.pixel(x, y);
        fill_disc(&mut out, x as i64, y as i64, radius, color);
    }

    out
}

/// Plexus network state.
#[derive(Debug)]
pub struct PlexusState {
    points: Option<Points>,
    count: usize,
}

impl Default for PlexusState {
    fn default() -> Self {
        Self {
            points: None,
            count: PLEXUS_POINT_COUNT,
        }
    }
}

impl PlexusState {
    /// Overrides the point count. Takes effect at the next (re)spawn.
    pub fn with_count(count: usize) -> Self {
        Self {
            points: None,
            count,
        }
    }
}

fn spawn_plexus(count: usize, width: f32, height: f32, seed: u64) -> Points {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Points {
        x: Vec::with_capacity(count),
        y: Vec::with_capacity(count),
        vx: Vec::with_capacity(count),
        vy: Vec::with_capacity(count),
    };
    for _ in 0..count {
        points.x.push(rng.gen::<f32>() * width);
        points.y.push(rng.gen::<f32>() * height);
        points.vx.push((rng.gen::<f32>() - 0.5) * 2.0);
        points.vy.push((rng.gen::<f32>() - 0.5) * 2.0);
    }
    points
}

/// Plexus: points drift and bounce at the frame edges; every pair closer
/// than an intensity-scaled threshold is connected by a line whose opacity
/// falls off with distance. The pair check is deliberately O(N^2) with no
/// spatial index; the point count bounds the cost.
pub fn plexus(state: &mut PlexusState, frame: &Frame, intensity: f32) -> Frame {
    let width = frame.width() as f32;
    let height = frame.height() as f32;

    let count = state.count;
    let points = state
        .points
        .get_or_insert_with(|| spawn_plexus(count, width, height, PLEXUS_SEED));

    for i in 0..points.len() {
        points.x[i] += points.vx[i] * intensity;
        points.y[i] += points.vy[i] * intensity;

        if points.x[i] < 0.0 || points.x[i] >= width {
            points.vx[i] = -points.vx[i];
        }
        if points.y[i] < 0.0 || points.y[i] >= height {
            points.vy[i] = -points.vy[i];
        }
        points.x[i] = points.x[i].clamp(0.0, width - 1.0);
        points.y[i] = points.y[i].clamp(0.0, height - 1.0);
    }

    let mut overlay = frame.clone();
    let connection_distance = 50.0 + intensity * 100.0;
    let thickness = (1.0 + intensity * 2.0) as i64;
    let point_radius = (3.0 * intensity) as i64;

    for i in 0..points.len() {
        let a = (points.x[i] as i64, points.y[i] as i64);

        for j in (i + 1)..points.len() {
            let b = (points.x[j] as i64, points.y[j] as i64);
            let dx = (b.0 - a.0) as f32;
            let dy = (b.1 - a.1) as f32;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance < connection_distance {
                let alpha = 1.0 - distance / connection_distance;
                draw_line(&mut overlay, a, b, [255, 255, 255], alpha, thickness);
            }
        }

        fill_disc(&mut overlay, a.0, a.1, point_radius, [255, 255, 255]);
    }

    // Blend the overlay back over the source so the network never fully
    // replaces the image.
    let blend = 0.3 * intensity;
    let mut out = frame.clone();
    let overlay_data = overlay.data();
    for (i, value) in out.data_mut().iter_mut().enumerate() {
        let v = *value as f32 * (1.0 - blend) + overlay_data[i] as f32 * blend;
        *value = v.clamp(0.0, 255.0).round() as u8;
    }

    out
}

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

//! Source frames for a session: an image loaded from disk or a seeded
//! generative image.

use std::error::Error;
use std::path::Path;

use image::imageops::FilterType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::effects::support;
use crate::frame::Frame;

/// Loads an image and fits it to the target dimensions: center-cropped to
/// the target aspect ratio (no stretching), then resized with Lanczos
/// filtering.
pub fn load_image(path: &Path, width: u32, height: u32) -> Result<Frame, Box<dyn Error>> {
    let mut img = image::open(path)?;
    let (orig_width, orig_height) = (img.width(), img.height());

    let target_aspect = width as f64 / height as f64;
    let orig_aspect = orig_width as f64 / orig_height as f64;

    if (target_aspect - orig_aspect).abs() > 0.01 {
        if orig_aspect > target_aspect {
            // The original is wider, crop the width.
            let new_width = (orig_height as f64 * target_aspect) as u32;
            let left = (orig_width - new_width) / 2;
            img = img.crop_imm(left, 0, new_width, orig_height);
        } else {
            // The original is taller, crop the height.
            let new_height = (orig_width as f64 / target_aspect) as u32;
            let top = (orig_height - new_height) / 2;
            img = img.crop_imm(0, top, orig_width, new_height);
        }
    }

    let resized = img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8();
    info!(
        path = %path.display(),
        original = %format!("{}x{}", orig_width, orig_height),
        fitted = %format!("{}x{}", width, height),
        "Loaded source image"
    );
    Ok(Frame::from_raw(width, height, resized.into_raw())?)
}

/// Synthesizes a colorful source image from a seed: blurred noise blended
/// with an axis-aligned color gradient. The same seed and dimensions
/// always produce the same image.
pub fn generative(width: u32, height: u32, seed: u64) -> Result<Frame, Box<dyn Error>> {
    // Blurring low-frequency noise three times gives soft color blobs.
    let mut rng = StdRng::seed_from_u64(seed);
    let mut noise: Vec<f32> = (0..width as usize * height as usize * 3)
        .map(|_| rng.gen::<f32>() * 255.0)
        .collect();
    for _ in 0..3 {
        support::blur_rgb(&mut noise, width as usize, height as usize, 7);
    }

    let mut values = vec![0.0f32; noise.len()];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let i = (y * width as usize + x) * 3;
            let gradient = [
                x as f32 / width as f32 * 255.0,
                y as f32 / height as f32 * 255.0,
                (1.0 - x as f32 / width as f32) * 255.0,
            ];
            for c in 0..3 {
                values[i + c] = noise[i + c] * 0.5 + gradient[c] * 0.5;
            }
        }
    }

    info!(width, height, seed, "Created generative source image");
    Ok(Frame::from_f32(width, height, &values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generative_is_seed_deterministic() {
        let a = generative(32, 32, 7).unwrap();
        let b = generative(32, 32, 7).unwrap();
        assert_eq!(a, b);

        let c = generative(32, 32, 8).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generative_matches_dimensions() {
        let frame = generative(48, 20, 42).unwrap();
        assert_eq!((frame.width(), frame.height()), (48, 20));
    }

    #[test]
    fn test_load_image_center_crops_to_aspect() {
        let dir = tempfile::tempdir().expect("unable to create temp dir");
        let path = dir.path().join("source.png");

        // A wide image with a red left half and a blue right half. Fitting
        // it to a square crops the sides, leaving both halves represented.
        let mut img = image::RgbImage::new(64, 32);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < 32 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            };
        }
        img.save(&path).expect("unable to save test image");

        let frame = load_image(&path, 16, 16).expect("unable to load image");
        assert_eq!((frame.width(), frame.height()), (16, 16));

        let left = frame.pixel(0, 8);
        assert!(left[0] > 200 && left[2] < 50, "expected red, got {:?}", left);
        let right = frame.pixel(15, 8);
        assert!(
            right[2] > 200 && right[0] < 50,
            "expected blue, got {:?}",
            right
        );
    }

    #[test]
    fn test_load_image_missing_file() {
        assert!(load_image(Path::new("/nonexistent/source.png"), 16, 16).is_err());
    }
}

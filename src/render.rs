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

//! Offline rendering of a session to a numbered PNG frame sequence.

use std::error::Error;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::engine::EffectEngine;
use crate::frame::Frame;

/// Renders the source frame through the engine's active chain for
/// `duration` seconds at `fps`, writing one numbered PNG per tick into
/// `output`. Tick `i` runs at time `i / fps`, so a render is reproducible
/// independent of wall-clock speed. Returns the number of frames written.
pub fn render_sequence(
    engine: &mut EffectEngine,
    source: &Frame,
    duration: f64,
    fps: u32,
    output: &Path,
) -> Result<u32, Box<dyn Error>> {
    fs::create_dir_all(output)?;

    let total_frames = (duration * fps as f64).round() as u32;
    info!(
        frames = total_frames,
        fps,
        output = %output.display(),
        "Rendering frame sequence"
    );

    for i in 0..total_frames {
        let time = i as f64 / fps as f64;
        let processed = engine.process(source, time, 0.0)?;

        let (width, height) = (processed.width(), processed.height());
        let img = image::RgbImage::from_raw(width, height, processed.into_raw())
            .ok_or("processed frame does not fit its dimensions")?;
        img.save(output.join(format!("frame_{:05}.png", i)))?;

        if i % fps == 0 {
            info!(frame = i, total = total_frames, time, "Render progress");
        }
    }

    info!(frames = total_frames, "Render complete");
    Ok(total_frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;

    #[test]
    fn test_render_writes_numbered_frames() {
        let dir = tempfile::tempdir().expect("unable to create temp dir");
        let output = dir.path().join("frames");

        let mut engine = EffectEngine::new();
        engine.enable("posterize").unwrap();
        let frame = source::generative(8, 8, 1).unwrap();

        let count = render_sequence(&mut engine, &frame, 0.5, 6, &output).unwrap();
        assert_eq!(count, 3);

        for i in 0..3 {
            let path = output.join(format!("frame_{:05}.png", i));
            assert!(path.exists(), "missing {}", path.display());
            let img = image::open(&path).unwrap();
            assert_eq!((img.width(), img.height()), (8, 8));
        }
        assert!(!output.join("frame_00003.png").exists());
    }

    #[test]
    fn test_render_empty_chain_reproduces_source() {
        let dir = tempfile::tempdir().expect("unable to create temp dir");
        let output = dir.path().join("frames");

        let mut engine = EffectEngine::new();
        let frame = source::generative(8, 8, 2).unwrap();
        render_sequence(&mut engine, &frame, 1.0, 1, &output).unwrap();

        let img = image::open(output.join("frame_00000.png")).unwrap().to_rgb8();
        assert_eq!(img.as_raw(), frame.data());
    }
}

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
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Typed error for session load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Session load error: {0}")]
    Load(#[from] std::io::Error),
    #[error("Session parse error: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("Unsupported aspect ratio: {0} (supported: 1:1, 3:4, 4:3, 9:16, 16:9)")]
    AspectRatio(String),
    #[error("Unsupported resolution: {0} (supported: 720, 1080, 2k, 4k)")]
    Resolution(String),
    #[error("Custom dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// A YAML representation of an offline render session.
#[derive(Deserialize, Clone, Default)]
pub struct Session {
    /// The output format.
    format: Option<Format>,

    /// The path to the source image. When absent a generative source image
    /// is synthesized from the seed.
    image: Option<String>,

    /// The preset whose effects are enabled first.
    preset: Option<String>,

    /// Per-effect settings, applied after the preset.
    effects: Option<Vec<EffectSetting>>,

    /// A single intensity broadcast to every effect before per-effect
    /// intensities are applied.
    global_intensity: Option<f64>,

    /// The session length in seconds.
    duration: Option<f64>,

    /// Frames rendered per second of session time.
    fps: Option<u32>,

    /// The seed for the generative source image.
    seed: Option<u64>,

    /// The directory the frame sequence is written to.
    output: Option<String>,
}

/// A YAML representation of one effect's settings.
#[derive(Deserialize, Clone)]
pub struct EffectSetting {
    /// The registered effect name.
    name: String,

    /// The effect intensity in 0.0..=1.0. Out of range values are clamped.
    intensity: Option<f64>,

    /// Whether the effect joins the chain. Defaults to true, so a plain
    /// name entry enables the effect.
    enabled: Option<bool>,
}

/// A YAML representation of the output format.
#[derive(Deserialize, Clone, Default)]
pub struct Format {
    /// One of 1:1, 3:4, 4:3, 9:16 or 16:9.
    aspect_ratio: Option<String>,

    /// One of 720, 1080, 2k or 4k.
    resolution: Option<String>,

    /// Custom width override. When both width and height are set the
    /// aspect ratio and resolution are ignored.
    width: Option<u32>,

    /// Custom height override.
    height: Option<u32>,
}

/// The supported aspect ratios.
pub const ASPECT_RATIOS: &[(&str, u32, u32)] = &[
    ("1:1", 1, 1),
    ("3:4", 3, 4),
    ("4:3", 4, 3),
    ("9:16", 9, 16),
    ("16:9", 16, 9),
];

/// The supported named resolutions. The value is the long edge for
/// landscape formats and the short edge for square.
pub const RESOLUTIONS: &[(&str, u32)] = &[("720", 720), ("1080", 1080), ("2k", 1440), ("4k", 2160)];

impl Session {
    /// Gets the output format.
    pub fn format(&self) -> Format {
        self.format.clone().unwrap_or_default()
    }

    /// Gets the source image path.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Gets the preset name.
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    /// Gets the per-effect settings.
    pub fn effects(&self) -> Vec<EffectSetting> {
        self.effects.clone().unwrap_or_default()
    }

    /// Gets the global intensity, if one was given.
    pub fn global_intensity(&self) -> Option<f64> {
        self.global_intensity
    }

    /// Gets the session length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or(5.0)
    }

    /// Gets the frame rate.
    pub fn fps(&self) -> u32 {
        self.fps.unwrap_or(30)
    }

    /// Gets the generative image seed.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }

    /// Gets the output directory.
    pub fn output(&self) -> &str {
        self.output.as_deref().unwrap_or("output")
    }
}

impl EffectSetting {
    /// Gets the effect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the intensity, if one was given.
    pub fn intensity(&self) -> Option<f64> {
        self.intensity
    }

    /// Gets whether the effect should join the chain.
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

impl Format {
    /// Resolves the format into concrete frame dimensions.
    ///
    /// Custom width and height take precedence when both are given.
    /// Otherwise the named resolution sizes the long edge (the short edge
    /// for 1:1) and the aspect ratio determines the other dimension.
    pub fn dimensions(&self) -> Result<(u32, u32), ConfigError> {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            if width == 0 || height == 0 {
                return Err(ConfigError::ZeroDimension { width, height });
            }
            return Ok((width, height));
        }

        let aspect_ratio = self.aspect_ratio.as_deref().unwrap_or("1:1");
        let resolution = self.resolution.as_deref().unwrap_or("1080");

        let (_, ratio_w, ratio_h) = ASPECT_RATIOS
            .iter()
            .find(|(name, _, _)| *name == aspect_ratio)
            .ok_or_else(|| ConfigError::AspectRatio(aspect_ratio.to_string()))?;
        let (_, size) = RESOLUTIONS
            .iter()
            .find(|(name, _)| *name == resolution)
            .ok_or_else(|| ConfigError::Resolution(resolution.to_string()))?;

        Ok(if ratio_w == ratio_h {
            (*size, *size)
        } else if ratio_w > ratio_h {
            (*size, size * ratio_h / ratio_w)
        } else {
            (size * ratio_w / ratio_h, *size)
        })
    }
}

/// Parses a session from a YAML file.
pub fn parse_session(file: &Path) -> Result<Session, ConfigError> {
    Ok(serde_yml::from_str(&fs::read_to_string(file)?)?)
}

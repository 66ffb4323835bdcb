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

use crate::frame::Frame;

pub mod color;
pub mod generate;
pub mod glitch;
pub mod simulation;
pub mod support;
pub mod temporal;
pub mod warp;

use color::{LutMode, PosterizeState};
use generate::{FractalMode, FractalState};
use glitch::ScanlinesState;
use simulation::{ParticleState, PlexusState};
use temporal::{FeedbackState, RgbSplitState, SlitScanState, StrobeState};
use warp::{DisplaceState, HeatHazeState, KaleidoscopeState, OpticalFlowState};

/// The closed set of effect algorithms, one variant per effect.
///
/// Each stateful variant carries its own private state struct. State is
/// exclusively owned by the effect instance; nothing outside the effect
/// reads or mutates it.
#[derive(Debug)]
pub enum EffectKind {
    /// Feedback loop accumulator producing trails and smear.
    Feedback(FeedbackState),
    /// Warp/displacement driven by smooth periodic noise.
    Displace(DisplaceState),
    /// Motion-vector warp from frame-to-frame luminance differences.
    OpticalFlow(OpticalFlowState),
    /// RGB channel split with chromatic aberration and per-channel trails.
    RgbSplit(RgbSplitState),
    /// Mirrored, rotating radial segments.
    Kaleidoscope(KaleidoscopeState),
    /// Row-wise pixel sorting by luminance.
    PixelSort,
    /// Edge detection with a time-cycling neon glow.
    EdgeGlow,
    /// Color level quantization with optional dithering.
    Posterize(PosterizeState),
    /// Animated 256-entry color table applied to luminance.
    Lut(LutMode),
    /// Heat haze refraction shimmer.
    HeatHaze(HeatHazeState),
    /// Flow-field particle system rendered over the frame.
    Particles(ParticleState),
    /// Connected point network with pairwise proximity lines.
    Plexus(PlexusState),
    /// Freeze-frame strobe.
    Strobe(StrobeState),
    /// CRT scanlines, vertical roll, and VHS wobble.
    Scanlines(ScanlinesState),
    /// Vertical time displacement from a bounded frame history.
    SlitScan(SlitScanState),
    /// Luminance-depth fog with rotating light rays.
    Volumetric,
    /// Escape-time fractal blended over the frame.
    Fractal(FractalState),
    /// Superposed plane-wave interference with chromatic shimmer.
    Hologram,
}

/// A named, stateful visual transform.
///
/// The shared contract lives here: `intensity` is clamped to [0, 1] on
/// every write, and a disabled effect is the exact identity transform.
/// Everything algorithm-specific is dispatched to the family modules.
#[derive(Debug)]
pub struct Effect {
    name: &'static str,
    intensity: f64,
    enabled: bool,
    kind: EffectKind,
}

impl Effect {
    pub fn new(name: &'static str, kind: EffectKind) -> Effect {
        Effect {
            name,
            intensity: 0.5,
            enabled: false,
            kind,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Sets the effect intensity, clamping into [0, 1]. NaN is coerced to
    /// zero rather than stored.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
    }

    /// Processes one frame. Disabled effects return the input unchanged
    /// with no side effects. The output always has the input's dimensions.
    ///
    /// `audio_level` is part of the contract for callers that drive the
    /// engine from an audio analysis, but no current algorithm consumes it.
    pub fn process(&mut self, frame: &Frame, time: f64, _audio_level: f64) -> Frame {
        if !self.enabled {
            return frame.clone();
        }

        let intensity = self.intensity as f32;
        let time = time as f32;

        match &mut self.kind {
            EffectKind::Feedback(state) => temporal::feedback(state, frame, intensity),
            EffectKind::RgbSplit(state) => temporal::rgb_split(state, frame, intensity),
            EffectKind::Strobe(state) => temporal::strobe(state, frame, intensity),
            EffectKind::SlitScan(state) => temporal::slit_scan(state, frame, intensity),
            EffectKind::Displace(state) => warp::displace(state, frame, intensity),
            EffectKind::HeatHaze(state) => warp::heat_haze(state, frame, intensity),
            EffectKind::Kaleidoscope(state) => warp::kaleidoscope(state, frame, intensity, time),
            EffectKind::OpticalFlow(state) => warp::optical_flow(state, frame, intensity),
            EffectKind::Posterize(state) => color::posterize(state, frame, intensity),
            EffectKind::Lut(mode) => color::lut(*mode, frame, intensity, time),
            EffectKind::EdgeGlow => color::edge_glow(frame, intensity, time),
            EffectKind::Particles(state) => simulation::particles(state, frame, intensity, time),
            EffectKind::Plexus(state) => simulation::plexus(state, frame, intensity),
            EffectKind::Fractal(state) => generate::fractal(state, frame, intensity, time),
            EffectKind::Hologram => generate::hologram(frame, intensity, time),
            EffectKind::PixelSort => glitch::pixel_sort(frame, intensity),
            EffectKind::Scanlines(state) => glitch::scanlines(state, frame, intensity, time),
            EffectKind::Volumetric => glitch::volumetric(frame, intensity, time),
        }
    }
}

/// Builds the full effect catalog in its canonical order, one persistent
/// instance per name. All effects start disabled at intensity 0.5.
pub fn catalog() -> Vec<Effect> {
    vec![
        Effect::new("feedback", EffectKind::Feedback(FeedbackState::default())),
        Effect::new("displace", EffectKind::Displace(DisplaceState::default())),
        Effect::new(
            "optical_flow",
            EffectKind::OpticalFlow(OpticalFlowState::default()),
        ),
        Effect::new("rgb_split", EffectKind::RgbSplit(RgbSplitState::default())),
        Effect::new(
            "kaleidoscope",
            EffectKind::Kaleidoscope(KaleidoscopeState::default()),
        ),
        Effect::new("pixel_sort", EffectKind::PixelSort),
        Effect::new("edge_glow", EffectKind::EdgeGlow),
        Effect::new("posterize", EffectKind::Posterize(PosterizeState::default())),
        Effect::new("lut", EffectKind::Lut(LutMode::Cyberpunk)),
        Effect::new("heat_haze", EffectKind::HeatHaze(HeatHazeState::default())),
        Effect::new("particles", EffectKind::Particles(ParticleState::default())),
        Effect::new("plexus", EffectKind::Plexus(PlexusState::default())),
        Effect::new("strobe", EffectKind::Strobe(StrobeState::default())),
        Effect::new("scanlines", EffectKind::Scanlines(ScanlinesState::default())),
        Effect::new("slit_scan", EffectKind::SlitScan(SlitScanState::default())),
        Effect::new("volumetric", EffectKind::Volumetric),
        Effect::new(
            "fractal",
            EffectKind::Fractal(FractalState::new(FractalMode::Mandelbrot)),
        ),
        Effect::new("hologram", EffectKind::Hologram),
    ]
}

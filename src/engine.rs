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

use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::effects::{self, Effect};
use crate::frame::Frame;

#[cfg(test)]
mod tests;

/// Errors surfaced by the engine's control and frame surfaces.
#[derive(Debug)]
pub enum EngineError {
    /// The named effect is not in the registry. The registry and chain are
    /// unchanged.
    UnknownEffect(String),
    /// The frame's dimensions do not match the dimensions locked in by the
    /// first processed frame.
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownEffect(name) => write!(f, "Unknown effect: {}", name),
            EngineError::DimensionMismatch { expected, actual } => write!(
                f,
                "Frame dimension mismatch: engine locked to {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// A snapshot of one registered effect's public controls.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub intensity: f64,
}

/// The effect engine: owns one persistent instance of every effect in the
/// catalog plus the active chain, and folds frames through the chain.
///
/// Instances are created once and never recreated mid-session, so each
/// effect's internal state (accumulators, particle arrays, frame
/// histories) survives across frames. The chain is an ordered,
/// de-duplicated list of names; execution order is insertion order.
pub struct EffectEngine {
    effects: Vec<Effect>,
    chain: Vec<String>,
    dimensions: Option<(u32, u32)>,
    logged_effects: HashSet<String>,
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectEngine {
    pub fn new() -> Self {
        Self {
            effects: effects::catalog(),
            chain: Vec::new(),
            dimensions: None,
            logged_effects: HashSet::new(),
        }
    }

    /// The names of every registered effect, in catalog order.
    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// The controls of one registered effect.
    pub fn status(&self, name: &str) -> Option<EffectStatus> {
        self.effects.iter().find(|e| e.name() == name).map(|e| EffectStatus {
            name: e.name(),
            enabled: e.enabled(),
            intensity: e.intensity(),
        })
    }

    /// The controls of every registered effect, in catalog order.
    pub fn statuses(&self) -> Vec<EffectStatus> {
        self.effects
            .iter()
            .map(|e| EffectStatus {
                name: e.name(),
                enabled: e.enabled(),
                intensity: e.intensity(),
            })
            .collect()
    }

    /// The active chain, in execution order.
    pub fn active_chain(&self) -> &[String] {
        &self.chain
    }

    fn find_effect(&mut self, name: &str) -> Result<&mut Effect, EngineError> {
        self.effects
            .iter_mut()
            .find(|e| e.name() == name)
            .ok_or_else(|| EngineError::UnknownEffect(name.to_string()))
    }

    /// Enables an effect and appends it to the chain. Enabling an effect
    /// that is already active is a no-op; an unknown name leaves the
    /// engine untouched.
    pub fn enable(&mut self, name: &str) -> Result<(), EngineError> {
        let effect = self.find_effect(name)?;
        effect.set_enabled(true);

        if !self.chain.iter().any(|n| n == name) {
            self.chain.push(name.to_string());
            if self.logged_effects.insert(name.to_string()) {
                info!(effect = name, "Enabled effect");
            }
        }
        Ok(())
    }

    /// Disables an effect and removes it from the chain. Its internal
    /// state is kept, so re-enabling resumes where it left off.
    pub fn disable(&mut self, name: &str) -> Result<(), EngineError> {
        let effect = self.find_effect(name)?;
        effect.set_enabled(false);
        self.chain.retain(|n| n != name);
        Ok(())
    }

    /// Sets one effect's intensity. Values outside [0, 1] are clamped,
    /// never an error.
    pub fn set_intensity(&mut self, name: &str, intensity: f64) -> Result<(), EngineError> {
        self.find_effect(name)?.set_intensity(intensity);
        Ok(())
    }

    /// Broadcasts one intensity to every registered effect. This is a
    /// one-shot fan-out write: later per-effect changes are independent.
    pub fn set_global_intensity(&mut self, intensity: f64) {
        for effect in &mut self.effects {
            effect.set_intensity(intensity);
        }
    }

    /// The dimensions locked in by the first processed frame, if any.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Processes one frame through the active chain in insertion order.
    ///
    /// The first processed frame locks the engine's dimensions for its
    /// lifetime; a later mismatch is rejected before any effect runs, so
    /// no lazily-sized effect state can be corrupted. Chain edits made
    /// while this call runs are impossible (exclusive borrow), so the
    /// chain is stable for the whole fold.
    pub fn process(
        &mut self,
        frame: &Frame,
        time: f64,
        audio_level: f64,
    ) -> Result<Frame, EngineError> {
        let actual = (frame.width(), frame.height());
        match self.dimensions {
            None => {
                self.dimensions = Some(actual);
                info!(
                    width = actual.0,
                    height = actual.1,
                    "Engine locked to first frame dimensions"
                );
            }
            Some(expected) if expected != actual => {
                return Err(EngineError::DimensionMismatch { expected, actual });
            }
            Some(_) => {}
        }

        let mut current = frame.clone();
        for name in &self.chain {
            // Chain entries always resolve; enable() is the only writer.
            if let Some(effect) = self.effects.iter_mut().find(|e| e.name() == name.as_str()) {
                current = effect.process(&current, time, audio_level);
                debug_assert_eq!((current.width(), current.height()), actual);
            }
        }

        Ok(current)
    }
}

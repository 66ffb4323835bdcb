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
use crate::engine::tests::common::gray_frame;
use crate::engine::{EffectEngine, EngineError};

#[test]
fn test_unknown_effect_is_rejected_without_side_effects() {
    let mut engine = EffectEngine::new();
    engine.enable("posterize").unwrap();

    for result in [
        engine.enable("not_an_effect"),
        engine.disable("not_an_effect"),
        engine.set_intensity("not_an_effect", 0.5),
    ] {
        match result {
            Err(EngineError::UnknownEffect(name)) => assert_eq!(name, "not_an_effect"),
            other => panic!("expected UnknownEffect, got {:?}", other),
        }
    }

    // The registry and chain are unchanged.
    assert_eq!(engine.active_chain(), &["posterize"]);
    assert_eq!(engine.statuses().len(), 18);
}

#[test]
fn test_intensity_clamp_is_idempotent() {
    let mut engine = EffectEngine::new();
    let frame = gray_frame(16, 16);

    engine.enable("posterize").unwrap();

    engine.set_intensity("posterize", 2.0).unwrap();
    let clamped_high = engine.process(&frame, 0.0, 0.0).unwrap();
    engine.set_intensity("posterize", 1.0).unwrap();
    let exact_high = engine.process(&frame, 0.0, 0.0).unwrap();
    assert_eq!(clamped_high, exact_high);

    assert_eq!(engine.status("posterize").unwrap().intensity, 1.0);
    engine.set_intensity("posterize", -1.0).unwrap();
    assert_eq!(engine.status("posterize").unwrap().intensity, 0.0);
}

#[test]
fn test_global_intensity_broadcasts_once() {
    let mut engine = EffectEngine::new();
    engine.set_global_intensity(0.25);
    for status in engine.statuses() {
        assert_eq!(status.intensity, 0.25);
    }

    // A later per-effect change is independent; the broadcast is not a
    // live link.
    engine.set_intensity("feedback", 0.75).unwrap();
    assert_eq!(engine.status("feedback").unwrap().intensity, 0.75);
    assert_eq!(engine.status("posterize").unwrap().intensity, 0.25);
}

#[test]
fn test_global_intensity_is_clamped() {
    let mut engine = EffectEngine::new();
    engine.set_global_intensity(7.0);
    for status in engine.statuses() {
        assert_eq!(status.intensity, 1.0);
    }
}

#[test]
fn test_status_reports_controls() {
    let mut engine = EffectEngine::new();
    assert!(engine.status("missing").is_none());

    let initial = engine.status("fractal").unwrap();
    assert!(!initial.enabled);
    assert_eq!(initial.intensity, 0.5);

    engine.enable("fractal").unwrap();
    engine.set_intensity("fractal", 0.9).unwrap();
    let updated = engine.status("fractal").unwrap();
    assert!(updated.enabled);
    assert_eq!(updated.intensity, 0.9);
}

#[test]
fn test_effect_names_cover_the_catalog() {
    let engine = EffectEngine::new();
    let names = engine.effect_names();
    assert_eq!(names.len(), 18);
    for expected in [
        "feedback",
        "displace",
        "optical_flow",
        "rgb_split",
        "kaleidoscope",
        "pixel_sort",
        "edge_glow",
        "posterize",
        "lut",
        "heat_haze",
        "particles",
        "plexus",
        "strobe",
        "scanlines",
        "slit_scan",
        "volumetric",
        "fractal",
        "hologram",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
}

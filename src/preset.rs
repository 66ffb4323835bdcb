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

//! Curated effect chains. A preset is nothing more than a named list of
//! effects enabled in order; intensities stay at their per-effect values.

/// A named, ordered effect chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub effects: [&'static str; 4],
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "cyber_glitch",
        description: "Cyberpunk glitch aesthetic",
        effects: ["rgb_split", "displace", "scanlines", "edge_glow"],
    },
    Preset {
        name: "psychedelic",
        description: "Psychedelic kaleidoscope visuals",
        effects: ["kaleidoscope", "feedback", "lut", "heat_haze"],
    },
    Preset {
        name: "holographic",
        description: "Sci-fi hologram interference",
        effects: ["hologram", "rgb_split", "edge_glow", "volumetric"],
    },
    Preset {
        name: "datamosh",
        description: "Compression-artifact glitch",
        effects: ["pixel_sort", "feedback", "displace", "strobe"],
    },
    Preset {
        name: "retro_vhs",
        description: "Retro VHS tape look",
        effects: ["scanlines", "feedback", "rgb_split", "posterize"],
    },
    Preset {
        name: "particle_flow",
        description: "Particles following image structure",
        effects: ["particles", "optical_flow", "plexus", "edge_glow"],
    },
    Preset {
        name: "fractal_dream",
        description: "Fractal overlays and mirrored color",
        effects: ["fractal", "kaleidoscope", "lut", "feedback"],
    },
    Preset {
        name: "neon_city",
        description: "Neon edges over warm haze",
        effects: ["edge_glow", "lut", "heat_haze", "scanlines"],
    },
    Preset {
        name: "time_warp",
        description: "Temporal smearing and motion trails",
        effects: ["slit_scan", "optical_flow", "feedback", "displace"],
    },
    Preset {
        name: "volumetric_fog",
        description: "Light rays through depth fog",
        effects: ["volumetric", "heat_haze", "edge_glow", "lut"],
    },
];

/// All presets, in definition order.
pub fn all() -> &'static [Preset] {
    PRESETS
}

/// Finds a preset by name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

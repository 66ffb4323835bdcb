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
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand};

use vizflow::config::{self, ASPECT_RATIOS, RESOLUTIONS};
use vizflow::engine::EffectEngine;
use vizflow::{preset, render, source};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A video effects engine."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the registered effects.
    Effects {},
    /// Lists the effect presets.
    Presets {},
    /// Lists the supported aspect ratios and resolutions.
    Formats {},
    /// Renders a session to a PNG frame sequence.
    Render {
        /// The path to the session config.
        session_path: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Effects {} => {
            let engine = EffectEngine::new();
            let names = engine.effect_names();
            println!("Effects (count: {}):", names.len());
            for name in names {
                println!("- {}", name);
            }
        }
        Commands::Presets {} => {
            let presets = preset::all();
            println!("Presets (count: {}):", presets.len());
            for preset in presets {
                println!("- {:<15} {}", preset.name, preset.description);
                println!("  effects: {}", preset.effects.join(", "));
            }
        }
        Commands::Formats {} => {
            println!("Aspect ratios:");
            for (name, _, _) in ASPECT_RATIOS {
                println!("- {}", name);
            }
            println!("\nResolutions:");
            for (name, size) in RESOLUTIONS {
                println!("- {:<4} ({})", name, size);
            }
        }
        Commands::Render { session_path } => {
            render_session(&PathBuf::from(session_path))?;
        }
    }

    Ok(())
}

/// Loads a session, builds the engine it describes and renders the frame
/// sequence.
fn render_session(session_path: &Path) -> Result<(), Box<dyn Error>> {
    let session = config::parse_session(session_path)?;
    let (width, height) = session.format().dimensions()?;

    let source = match session.image() {
        Some(path) => source::load_image(Path::new(path), width, height)?,
        None => source::generative(width, height, session.seed())?,
    };

    let mut engine = EffectEngine::new();
    if let Some(name) = session.preset() {
        let preset = preset::find(name).ok_or_else(|| {
            format!(
                "unknown preset {} (available: {})",
                name,
                preset::all()
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        for effect in preset.effects {
            engine.enable(effect)?;
        }
    }
    if let Some(intensity) = session.global_intensity() {
        engine.set_global_intensity(intensity);
    }
    for setting in session.effects() {
        if setting.enabled() {
            engine.enable(setting.name())?;
        } else {
            engine.disable(setting.name())?;
        }
        if let Some(intensity) = setting.intensity() {
            engine.set_intensity(setting.name(), intensity)?;
        }
    }

    render_sequence_summary(&mut engine, &source, &session)?;
    Ok(())
}

fn render_sequence_summary(
    engine: &mut EffectEngine,
    source: &vizflow::frame::Frame,
    session: &config::Session,
) -> Result<(), Box<dyn Error>> {
    let frames = render::render_sequence(
        engine,
        source,
        session.duration(),
        session.fps(),
        Path::new(session.output()),
    )?;

    println!(
        "Rendered {} frames ({}x{}) to {}",
        frames,
        source.width(),
        source.height(),
        session.output()
    );
    println!("Chain: {}", engine.active_chain().join(", "));
    Ok(())
}

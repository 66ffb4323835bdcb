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

//! A stateful video effects engine and offline renderer. Frames flow
//! through an ordered chain of persistent effect instances; the same
//! chain, source and time sequence always produce the same frames.

pub mod config;
pub mod effects;
pub mod engine;
pub mod frame;
pub mod preset;
pub mod render;
pub mod source;

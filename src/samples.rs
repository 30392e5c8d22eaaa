// Copyright (C) 2026 Patrick Stephansen
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

//! Cue sample storage and loading.
//!
//! This module provides:
//! - Full in-memory decoding of cue files (zero-latency playback)
//! - Stereo-only enforcement and load-time resampling
//! - The fixed, ordered playlist the playback engine cycles through

mod decode;
mod loader;
mod store;

pub use loader::SampleLoader;
pub use store::{Sample, SampleStore};

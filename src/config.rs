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

//! Cue-sheet configuration.
//!
//! A cue sheet is a small YAML document naming the playlist files and the
//! default processing parameters:
//!
//! ```yaml
//! playlist:
//!   - cues/intro.wav
//!   - cues/drop.flac
//! output_gain_db: -3.0
//! threshold_db: -20.0
//! cool_down_ms: 250.0
//! ```
//!
//! Relative playlist paths are resolved against the cue sheet's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::BlockParams;

fn default_output_gain_db() -> f32 {
    0.0
}

fn default_threshold_db() -> f32 {
    -20.0
}

/// Typed error for cue sheet load/parse failures so callers can distinguish
/// file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read cue sheet {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse cue sheet {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("Cue sheet {0} has an empty playlist")]
    EmptyPlaylist(PathBuf),
}

/// A YAML representation of a cue sheet.
#[derive(Deserialize, Debug)]
pub struct CueSheet {
    /// Ordered playlist of audio files to cycle through.
    playlist: Vec<PathBuf>,

    /// Output gain applied to rendered cues, in dB.
    #[serde(default = "default_output_gain_db")]
    output_gain_db: f32,

    /// Input level above which a hit is detected, in dB.
    #[serde(default = "default_threshold_db")]
    threshold_db: f32,

    /// Minimum interval between accepted hits, in ms. Defaults to 0,
    /// meaning every first-in-block crossing is eligible.
    #[serde(default)]
    cool_down_ms: f32,
}

impl CueSheet {
    /// Parses a cue sheet from a YAML file. Playlist paths are resolved
    /// relative to the file's directory. An empty playlist is rejected here,
    /// before any loading starts.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut sheet: CueSheet =
            serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if sheet.playlist.is_empty() {
            return Err(ConfigError::EmptyPlaylist(path.to_path_buf()));
        }

        if let Some(base) = path.parent() {
            sheet.playlist = sheet
                .playlist
                .into_iter()
                .map(|p| if p.is_absolute() { p } else { base.join(p) })
                .collect();
        }

        Ok(sheet)
    }

    /// Gets the ordered playlist file paths.
    pub fn playlist(&self) -> &[PathBuf] {
        &self.playlist
    }

    /// Gets the default block parameters for this cue sheet.
    pub fn block_params(&self) -> BlockParams {
        BlockParams {
            output_gain_db: self.output_gain_db,
            threshold_db: self.threshold_db,
            cool_down_ms: self.cool_down_ms,
        }
    }
}

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

//! The trigger-and-playback core.
//!
//! One [`BlockProcessor`] call handles one audio block: scan the mono input
//! for a hit, apply the resulting toggle if any, and render stereo output.
//! The per-block path never allocates, blocks, or performs I/O; all sample
//! data is resident in the [`SampleStore`] before the first block.

mod playback;
mod trigger;

use playback::PlaybackEngine;
use trigger::{TriggerDetector, TriggerEvent};

use crate::gain;
use crate::samples::SampleStore;

/// Host-controlled parameters, read fresh on every block.
#[derive(Debug, Clone, Copy)]
pub struct BlockParams {
    /// Output gain applied to rendered sample audio, in dB.
    pub output_gain_db: f32,
    /// Input level above which a hit is detected, in dB.
    pub threshold_db: f32,
    /// Minimum interval between accepted hits, in ms. Zero means every
    /// block-first crossing is eligible.
    pub cool_down_ms: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Cue playlist is empty; nothing to play")]
    EmptyPlaylist,
}

/// Wires the trigger detector, playback engine, and sample store together.
/// Holds no block-spanning logic of its own.
pub struct BlockProcessor {
    store: SampleStore,
    detector: TriggerDetector,
    playback: PlaybackEngine,
}

impl BlockProcessor {
    /// Creates a processor over a non-empty playlist at the given sample
    /// rate. An empty playlist is fatal: there is nothing to cue.
    pub fn new(samples: Vec<crate::samples::Sample>, sample_rate: f64) -> Result<Self, EngineError> {
        let store = SampleStore::new(samples).ok_or(EngineError::EmptyPlaylist)?;
        Ok(Self {
            store,
            detector: TriggerDetector::new(sample_rate),
            playback: PlaybackEngine::new(),
        })
    }

    /// Processes one block: `input` is the mono trigger signal; `left` and
    /// `right` receive the stereo output. All three slices have the same
    /// length, which may differ from call to call.
    pub fn process(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32], params: &BlockParams) {
        debug_assert_eq!(input.len(), left.len());
        debug_assert_eq!(input.len(), right.len());

        let event = self
            .detector
            .scan(input, params.threshold_db, params.cool_down_ms);

        let offset = match event {
            Some(TriggerEvent { offset }) => {
                self.playback.apply_trigger(&self.store);
                offset
            }
            None => 0,
        };

        let coefficient = gain::db_to_coefficient(params.output_gain_db);
        self.playback
            .render(&self.store, offset, coefficient, left, right);
    }

    /// Returns the sample store backing this processor.
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Returns whether a cue is currently sounding.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Returns the playlist position of the current cue.
    pub fn playlist_position(&self) -> usize {
        self.playback.active_index()
    }
}

impl std::fmt::Debug for BlockProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockProcessor")
            .field("playlist_len", &self.store.len())
            .field("playback", &self.playback)
            .finish()
    }
}

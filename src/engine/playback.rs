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

//! Toggle playback of playlist samples into a stereo block.

use tracing::{debug, trace};

use crate::samples::SampleStore;

/// Owns the play/stop state and the frame cursor into the active sample.
///
/// A trigger toggles playback. Stopping advances the playlist, so the next
/// start plays the next cue; starting does not advance. The cursor resets on
/// every trigger regardless of direction.
pub struct PlaybackEngine {
    is_playing: bool,
    active_index: usize,
    frame_cursor: usize,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self {
            is_playing: false,
            active_index: 0,
            frame_cursor: 0,
        }
    }

    /// Returns whether sample audio is currently being rendered.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Returns the playlist position of the sample that plays (or is
    /// playing) on the current toggle state.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Applies an accepted trigger: toggles playback, advances the playlist
    /// on the stop edge, and rewinds the cursor.
    pub fn apply_trigger(&mut self, store: &SampleStore) {
        self.is_playing = !self.is_playing;
        if !self.is_playing {
            self.active_index = store.next_index(self.active_index);
        }
        self.frame_cursor = 0;

        trace!(
            is_playing = self.is_playing,
            active_index = self.active_index,
            "Playback toggled"
        );
    }

    /// Renders one block of stereo output.
    ///
    /// Frames before `offset` are always silenced, even when a sample was
    /// playing right up to a stop-triggering hit; stop edges are therefore
    /// slightly more responsive than start edges. Deliberate: cutting a cue
    /// dead matters more on stage than keeping its last few frames.
    ///
    /// While playing, interleaved stereo frames are copied from the active
    /// sample scaled by `gain`, advancing the cursor one frame per output
    /// frame. If the sample ends mid-block, playback stops, the playlist
    /// advances (an end is a stop, whether hit-driven or natural), and the
    /// rest of the block is silence.
    pub fn render(
        &mut self,
        store: &SampleStore,
        offset: usize,
        gain: f32,
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let frames = left.len();
        let offset = offset.min(frames);

        left[..offset].fill(0.0);
        right[..offset].fill(0.0);

        if !self.is_playing {
            left[offset..].fill(0.0);
            right[offset..].fill(0.0);
            return;
        }

        let sample = store.get(self.active_index);
        let remaining = sample.frames().saturating_sub(self.frame_cursor);
        let to_copy = remaining.min(frames - offset);

        for position in offset..offset + to_copy {
            let (l, r) = sample.frame(self.frame_cursor);
            left[position] = l * gain;
            right[position] = r * gain;
            self.frame_cursor += 1;
        }

        if self.frame_cursor >= sample.frames() {
            self.is_playing = false;
            self.active_index = store.next_index(self.active_index);
            debug!(
                frames = sample.frames(),
                next_index = self.active_index,
                "Sample exhausted"
            );
        }

        left[offset + to_copy..].fill(0.0);
        right[offset + to_copy..].fill(0.0);
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("is_playing", &self.is_playing)
            .field("active_index", &self.active_index)
            .field("frame_cursor", &self.frame_cursor)
            .finish()
    }
}

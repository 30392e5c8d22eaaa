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

//! Immutable sample storage for the cue playlist.
//!
//! Samples are decoded fully into memory before processing starts and are
//! never mutated afterwards. The store is the single owner of all sample
//! data; everything is released together at teardown.

use std::path::{Path, PathBuf};

/// A fully decoded stereo sample: interleaved left/right f32 frames.
pub struct Sample {
    /// Interleaved stereo data, length == frames * 2.
    data: Vec<f32>,
    /// Number of stereo frames.
    frames: usize,
    /// Where the sample came from. Diagnostic only.
    path: PathBuf,
}

impl Sample {
    /// Creates a sample from interleaved stereo data. The data length must
    /// be even; the caller (the loader) guarantees a stereo channel layout.
    pub fn new(data: Vec<f32>, path: PathBuf) -> Self {
        let frames = data.len() / 2;
        Self { data, frames, path }
    }

    /// Returns the number of stereo frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the left/right pair at the given frame.
    /// Frames at or past the end read as silence.
    pub fn frame(&self, index: usize) -> (f32, f32) {
        if index >= self.frames {
            return (0.0, 0.0);
        }
        (self.data[index * 2], self.data[index * 2 + 1])
    }

    /// Returns the source path this sample was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the memory size of the sample data in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

/// The ordered, fixed playlist of cue samples.
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    /// Creates a store from an ordered list of samples. Returns `None` for
    /// an empty list; the caller treats that as a fatal init error.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            None
        } else {
            Some(Self { samples })
        }
    }

    /// Returns the number of samples in the playlist. Always non-zero.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Looks up a sample by playlist position. The index is taken modulo the
    /// playlist length so it can never escape the list.
    pub fn get(&self, index: usize) -> &Sample {
        &self.samples[index % self.samples.len()]
    }

    /// Returns the playlist position following `index`, wrapping at the end.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.samples.len()
    }

    /// Returns the total memory used by all samples.
    pub fn total_memory_usage(&self) -> usize {
        self.samples.iter().map(|s| s.memory_size()).sum()
    }
}

impl std::fmt::Debug for SampleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleStore")
            .field("samples", &self.samples.len())
            .field("total_memory_kb", &(self.total_memory_usage() / 1024))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_of(frames: usize, value: f32) -> Sample {
        Sample::new(vec![value; frames * 2], PathBuf::from("test.wav"))
    }

    #[test]
    fn test_empty_store_is_rejected() {
        assert!(SampleStore::new(Vec::new()).is_none());
    }

    #[test]
    fn test_indexing_wraps() {
        let store = SampleStore::new(vec![sample_of(10, 0.1), sample_of(20, 0.2)]).unwrap();

        assert_eq!(store.get(0).frames(), 10);
        assert_eq!(store.get(1).frames(), 20);
        assert_eq!(store.get(2).frames(), 10);
        assert_eq!(store.get(5).frames(), 20);

        assert_eq!(store.next_index(0), 1);
        assert_eq!(store.next_index(1), 0);
    }

    #[test]
    fn test_frame_reads_interleaved_pairs() {
        let sample = Sample::new(vec![0.1, -0.1, 0.2, -0.2], PathBuf::from("test.wav"));
        assert_eq!(sample.frames(), 2);
        assert_eq!(sample.frame(0), (0.1, -0.1));
        assert_eq!(sample.frame(1), (0.2, -0.2));
        // Past the end reads silence rather than panicking.
        assert_eq!(sample.frame(2), (0.0, 0.0));
    }
}

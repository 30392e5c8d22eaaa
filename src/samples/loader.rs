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

//! Loading cue samples into memory.
//!
//! All loading happens once, before block processing starts. Files are
//! decoded in full, checked for a stereo layout, and resampled to the
//! processing rate when needed, so the real-time path never touches a file.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::decode::{decode_file, DecodedAudio};
use super::store::Sample;

/// Errors raised while loading an individual sample file.
#[derive(Debug, thiserror::Error)]
pub enum SampleLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unrecognized audio format in {path}: {source}")]
    UnrecognizedFormat {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },

    #[error("Decode error in {path}: {source}")]
    Decode {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },

    #[error("No audio track found in {0}")]
    NoAudioTrack(PathBuf),

    #[error("Sample rate not specified in {0}")]
    MissingSampleRate(PathBuf),

    #[error("{path} has {channels} channels; cue samples must be stereo")]
    NotStereo { path: PathBuf, channels: u16 },

    #[error("{0} contains no audio frames")]
    Empty(PathBuf),
}

/// Decodes cue files into [`Sample`]s at a fixed processing rate.
pub struct SampleLoader {
    /// The rate block processing runs at; files are resampled to match.
    target_sample_rate: u32,
}

impl SampleLoader {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    /// Loads a single cue file. Rejects anything that is not stereo and
    /// anything with zero frames; resamples when the file's rate differs
    /// from the processing rate.
    pub fn load(&self, path: &Path) -> Result<Sample, SampleLoadError> {
        let DecodedAudio {
            samples,
            channels,
            sample_rate,
        } = decode_file(path)?;

        if channels != 2 {
            return Err(SampleLoadError::NotStereo {
                path: path.to_path_buf(),
                channels,
            });
        }
        if samples.is_empty() {
            return Err(SampleLoadError::Empty(path.to_path_buf()));
        }

        let data = if sample_rate != self.target_sample_rate {
            info!(
                path = ?path,
                source_rate = sample_rate,
                target_rate = self.target_sample_rate,
                "Resampling cue"
            );
            resample(&samples, 2, sample_rate, self.target_sample_rate)
        } else {
            samples
        };

        let sample = Sample::new(data, path.to_path_buf());
        info!(
            path = ?path,
            frames = sample.frames(),
            memory_kb = sample.memory_size() / 1024,
            "Cue loaded"
        );
        Ok(sample)
    }

    /// Loads an ordered playlist of cue files.
    ///
    /// A file that fails to load is skipped with a warning rather than
    /// poisoning the playlist; the surviving cues keep their relative order
    /// so indexing stays dense. Returns the error of the first failure only
    /// when nothing loads at all.
    pub fn load_playlist(&self, paths: &[PathBuf]) -> Result<Vec<Sample>, SampleLoadError> {
        let mut samples = Vec::with_capacity(paths.len());
        let mut first_error = None;

        for path in paths {
            match self.load(path) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Skipping cue that failed to load");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match (samples.is_empty(), first_error) {
            (true, Some(e)) => Err(e),
            _ => Ok(samples),
        }
    }
}

/// Linear-interpolation resampling of interleaved samples. Plenty for
/// one-shot cues; a band-limited resampler would be overkill here.
fn resample(samples: &[f32], channel_count: u16, source_rate: u32, target_rate: u32) -> Vec<f32> {
    let ratio = target_rate as f64 / source_rate as f64;
    let channels = channel_count as usize;
    let source_frames = samples.len() / channels;
    // Integer arithmetic so exact ratios convert exactly; the f64 ratio can
    // land a hair above the true value and ceil would add a phantom frame.
    let target_frames =
        (source_frames as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;

    let mut output = Vec::with_capacity(target_frames * channels);
    for target_frame in 0..target_frames {
        let source_pos = target_frame as f64 / ratio;
        let source_frame = source_pos.floor() as usize;
        let frac = source_pos.fract() as f32;

        for channel in 0..channels {
            let idx0 = source_frame * channels + channel;
            let idx1 = (source_frame + 1) * channels + channel;

            let s0 = samples.get(idx0).copied().unwrap_or(0.0);
            let s1 = samples.get(idx1).copied().unwrap_or(s0);
            output.push(s0 + (s1 - s0) * frac);
        }
    }

    output
}

impl std::fmt::Debug for SampleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleLoader")
            .field("target_sample_rate", &self.target_sample_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(
        dir: &Path,
        name: &str,
        channels: u16,
        sample_rate: u32,
        frames: usize,
    ) -> PathBuf {
        let path = dir.join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..frames {
            for _ in 0..channels {
                writer.write_sample(8192i16).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_load_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "cue.wav", 2, 48000, 100);

        let loader = SampleLoader::new(48000);
        let sample = loader.load(&path).unwrap();

        assert_eq!(sample.frames(), 100);
        let (l, r) = sample.frame(0);
        assert!((l - 0.25).abs() < 1e-3);
        assert!((r - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_mono_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "mono.wav", 1, 48000, 100);

        let loader = SampleLoader::new(48000);
        assert!(matches!(
            loader.load(&path),
            Err(SampleLoadError::NotStereo { channels: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = SampleLoader::new(48000);
        assert!(loader.load(Path::new("/does/not/exist.wav")).is_err());
    }

    #[test]
    fn test_rate_mismatch_resamples_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "cue44.wav", 2, 44100, 441);

        let loader = SampleLoader::new(48000);
        let sample = loader.load(&path).unwrap();

        // 441 frames at 44.1kHz come out as 480 at 48kHz.
        assert_eq!(sample.frames(), 480);
    }

    #[test]
    fn test_playlist_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_wav(dir.path(), "good.wav", 2, 48000, 10);
        let mono = write_wav(dir.path(), "mono.wav", 1, 48000, 10);
        let missing = dir.path().join("missing.wav");

        let loader = SampleLoader::new(48000);
        let samples = loader
            .load_playlist(&[good.clone(), mono, missing, good])
            .unwrap();

        // Both copies of the good cue survive, in order; failures vanish.
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].frames(), 10);
        assert_eq!(samples[1].frames(), 10);
    }

    #[test]
    fn test_playlist_with_nothing_loadable_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mono = write_wav(dir.path(), "mono.wav", 1, 48000, 10);

        let loader = SampleLoader::new(48000);
        assert!(loader.load_playlist(&[mono]).is_err());
    }

    #[test]
    fn test_resample_exact_ratio_gives_exact_length() {
        // 441 frames at 44.1kHz is exactly 480 frames at 48kHz; float
        // rounding must not produce a phantom 481st frame.
        let interleaved = vec![0.5f32; 441 * 2];
        let output = resample(&interleaved, 2, 44100, 48000);
        assert_eq!(output.len() / 2, 480);

        // Inexact ratios still round up to cover the last partial frame.
        let interleaved = vec![0.5f32; 100 * 2];
        let output = resample(&interleaved, 2, 44100, 48000);
        assert_eq!(output.len() / 2, 109);
    }

    #[test]
    fn test_resample_preserves_channels() {
        // L and R carry different constants; resampling must not mix them.
        let interleaved = vec![1.0f32, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let output = resample(&interleaved, 2, 44100, 48000);

        assert!(output.len() >= interleaved.len());
        for frame in output.chunks(2) {
            assert!((frame[0] - 1.0).abs() < 1e-6);
            assert!((frame[1] + 1.0).abs() < 1e-6);
        }
    }
}

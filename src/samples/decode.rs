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

//! One-shot decoding of audio files to interleaved f32.
//!
//! Cue samples are small one-shots that live in memory for the whole run,
//! so the whole file is decoded up front; there is no streaming path.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use super::loader::SampleLoadError;

/// The result of decoding a file: interleaved samples plus stream metadata.
pub struct DecodedAudio {
    /// Interleaved samples, frame-major.
    pub samples: Vec<f32>,
    /// Channel count as observed in the decoded stream.
    pub channels: u16,
    /// Sample rate of the decoded stream in Hz.
    pub sample_rate: u32,
}

/// Decodes an entire audio file (WAV, FLAC, MP3, anything symphonia probes)
/// into interleaved f32 samples.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, SampleLoadError> {
    let file = File::open(path).map_err(|e| {
        SampleLoadError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| SampleLoadError::UnrecognizedFormat {
            path: path.to_path_buf(),
            source: e,
        })?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SampleLoadError::NoAudioTrack(path.to_path_buf()))?;
    let track_id = track.id;
    let params = &track.codec_params;

    let sample_rate = params
        .sample_rate
        .ok_or_else(|| SampleLoadError::MissingSampleRate(path.to_path_buf()))?;
    let metadata_channels = params.channels.map(|c| c.count() as u16).unwrap_or(0);

    let decoder_opts: DecoderOptions = Default::default();
    let mut decoder =
        get_codecs()
            .make(params, &decoder_opts)
            .map_err(|e| SampleLoadError::Decode {
                path: path.to_path_buf(),
                source: e,
            })?;

    // Decode every packet for our track. Channel count is taken from the
    // first decoded buffer when the container does not report it.
    let mut samples = Vec::new();
    let mut channels = metadata_channels;
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            // Some decoders report EOF as a decode error.
            Err(SymphoniaError::DecodeError(_)) => break,
            Err(e) => {
                return Err(SampleLoadError::Decode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                decoder
                    .decode(&packet)
                    .map_err(|e| SampleLoadError::Decode {
                        path: path.to_path_buf(),
                        source: e,
                    })?
            }
            Err(e) => {
                return Err(SampleLoadError::Decode {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let (packet_samples, packet_channels) = interleave(decoded);
        if channels == 0 {
            channels = packet_channels as u16;
        }
        samples.extend_from_slice(&packet_samples);
    }

    if channels == 0 {
        return Err(SampleLoadError::NoAudioTrack(path.to_path_buf()));
    }

    Ok(DecodedAudio {
        samples,
        channels,
        sample_rate,
    })
}

/// Converts a decoded buffer of any sample format to interleaved f32 and
/// reports the channel count observed in the buffer.
fn interleave(decoded: AudioBufferRef) -> (Vec<f32>, usize) {
    match decoded {
        AudioBufferRef::F32(buf) => interleave_planar(&buf, |s| s),
        AudioBufferRef::F64(buf) => interleave_planar(&buf, |s| s as f32),
        AudioBufferRef::S8(buf) => interleave_planar(&buf, |s| s as f32 / (1i64 << 7) as f32),
        AudioBufferRef::S16(buf) => interleave_planar(&buf, |s| s as f32 / (1i64 << 15) as f32),
        AudioBufferRef::S24(buf) => {
            interleave_planar(&buf, |s| s.inner() as f32 / (1i64 << 23) as f32)
        }
        AudioBufferRef::S32(buf) => interleave_planar(&buf, |s| s as f32 / (1i64 << 31) as f32),
        AudioBufferRef::U8(buf) => {
            interleave_planar(&buf, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            interleave_planar(&buf, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => interleave_planar(&buf, |s| {
            (s.inner() as f32 / ((1u32 << 24) - 1) as f32) * 2.0 - 1.0
        }),
        AudioBufferRef::U32(buf) => {
            interleave_planar(&buf, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0)
        }
    }
}

fn interleave_planar<T, F>(buf: &AudioBuffer<T>, convert: F) -> (Vec<f32>, usize)
where
    T: symphonia::core::sample::Sample,
    F: Fn(T) -> f32,
{
    let frames = buf.frames();
    let channels = buf.spec().channels.count();
    let planes = buf.planes();
    let mut samples = Vec::with_capacity(frames * channels);
    for frame_idx in 0..frames {
        for ch_idx in 0..channels {
            samples.push(convert(planes.planes()[ch_idx][frame_idx]));
        }
    }
    (samples, channels)
}

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
mod config;
mod engine;
mod gain;
mod samples;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use tracing::info;

use crate::config::CueSheet;
use crate::engine::BlockProcessor;
use crate::samples::SampleLoader;

#[derive(Parser)]
#[clap(
    author = "Patrick Stephansen",
    version = crate_version!(),
    about = "A threshold-triggered stereo sample cue player."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists and verifies the cues in a cue sheet.
    Cues {
        /// The path to the cue sheet.
        cue_sheet: String,
        /// The sample rate to load cues at.
        #[arg(short, long, default_value_t = 48000)]
        sample_rate: u32,
    },
    /// Processes a mono trigger signal through the cue player, writing
    /// stereo output. Stands in for a real-time audio host.
    Process {
        /// The path to the cue sheet.
        cue_sheet: String,
        /// The mono input WAV carrying the trigger signal. Only the first
        /// channel of a multichannel file is used.
        input: String,
        /// The stereo output WAV to write.
        output: String,
        /// The number of frames per processing block.
        #[arg(short, long, default_value_t = 512)]
        block_size: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cues {
            cue_sheet,
            sample_rate,
        } => {
            let sheet = CueSheet::from_file(&PathBuf::from(&cue_sheet))?;
            let loader = SampleLoader::new(sample_rate);
            let cues = loader.load_playlist(sheet.playlist())?;

            println!("Cues (count: {}):", cues.len());
            for cue in &cues {
                let seconds = cue.frames() as f64 / sample_rate as f64;
                println!(
                    "- {} ({} frames, {:.2}s, {} KiB)",
                    cue.path().display(),
                    cue.frames(),
                    seconds,
                    cue.memory_size() / 1024
                );
            }
        }
        Commands::Process {
            cue_sheet,
            input,
            output,
            block_size,
        } => {
            if block_size == 0 {
                return Err("block size must be at least 1".into());
            }

            let sheet = CueSheet::from_file(&PathBuf::from(&cue_sheet))?;
            let (trigger_signal, sample_rate) = read_mono_wav(&input)?;

            let loader = SampleLoader::new(sample_rate);
            let cues = loader.load_playlist(sheet.playlist())?;
            let mut processor = BlockProcessor::new(cues, sample_rate as f64)?;
            let params = sheet.block_params();

            info!(
                %input,
                %output,
                sample_rate,
                block_size,
                playlist_len = processor.store().len(),
                "Processing trigger signal"
            );

            let spec = hound::WavSpec {
                channels: 2,
                sample_rate,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            };
            let mut writer = hound::WavWriter::create(&output, spec)?;

            let mut left = vec![0.0f32; block_size];
            let mut right = vec![0.0f32; block_size];
            for block in trigger_signal.chunks(block_size) {
                let left = &mut left[..block.len()];
                let right = &mut right[..block.len()];
                processor.process(block, left, right, &params);

                for frame in 0..block.len() {
                    writer.write_sample(left[frame])?;
                    writer.write_sample(right[frame])?;
                }
            }
            writer.finalize()?;

            info!(
                %output,
                still_playing = processor.is_playing(),
                playlist_position = processor.playlist_position(),
                "Done"
            );
        }
    }

    Ok(())
}

/// Reads the first channel of a WAV file as f32 along with its sample rate.
fn read_mono_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| format!("Failed to open input {}: {}", path, e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame[0])
        .collect();
    Ok((mono, spec.sample_rate))
}

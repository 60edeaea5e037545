//! Test signal generation command.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use vowelscope_analysis::VowelTable;
use vowelscope_analysis::synth::{Resonance, VOWEL_PEAK, sine, synthetic_vowel};
use vowelscope_io::{Encoding, write_wav};

/// F3 used when neither `--f3` nor a table entry provides one.
const DEFAULT_F3: f32 = 2500.0;

/// Resonator bandwidths for F1, F2, F3 in Hz.
const BANDWIDTHS: [f32; 3] = [80.0, 100.0, 120.0];

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Sine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "220.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate a synthetic vowel: a pulse train through formant resonators
    Vowel {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// IPA symbol whose reference F1/F2 to use (see `vowelscope vowels`)
        #[arg(long, conflicts_with_all = ["f1", "f2"])]
        vowel: Option<String>,

        /// First formant in Hz
        #[arg(long, requires = "f2")]
        f1: Option<f32>,

        /// Second formant in Hz
        #[arg(long, requires = "f1")]
        f2: Option<f32>,

        /// Third formant in Hz
        #[arg(long)]
        f3: Option<f32>,

        /// Fundamental frequency of the pulse train in Hz
        #[arg(long, default_value = "120.0")]
        f0: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Peak amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },

    /// Generate white noise
    Noise {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Generator seed
        #[arg(long, default_value = "305419896")]
        seed: u32,
    },

    /// Generate silence
    Silence {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Sine {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            println!("Generating {freq} Hz sine...");
            let num_samples = sample_count(duration, sample_rate)?;
            let samples = sine(sample_rate as f32, freq, num_samples, amplitude);
            save(&output, &samples, sample_rate)
        }

        GenerateCommand::Vowel {
            output,
            vowel,
            f1,
            f2,
            f3,
            f0,
            duration,
            sample_rate,
            amplitude,
        } => {
            let (f1, f2) = match (vowel.as_deref(), f1, f2) {
                (Some(symbol), _, _) => {
                    let entry = VowelTable::ipa().get(symbol).with_context(|| {
                        format!("unknown vowel '{symbol}'; run `vowelscope vowels` for the table")
                    })?;
                    (entry.f1, entry.f2)
                }
                (None, Some(f1), Some(f2)) => (f1, f2),
                _ => anyhow::bail!("give either --vowel or both --f1 and --f2"),
            };
            if f0 <= 0.0 {
                anyhow::bail!("--f0 must be positive");
            }
            let f3 = f3.unwrap_or(DEFAULT_F3.max(f2 + 300.0));

            println!("Generating vowel: F0 {f0} Hz, formants {f1}/{f2}/{f3} Hz...");
            let formants = [
                Resonance::new(f1, BANDWIDTHS[0]),
                Resonance::new(f2, BANDWIDTHS[1]),
                Resonance::new(f3, BANDWIDTHS[2]),
            ];
            let num_samples = sample_count(duration, sample_rate)?;
            let scale = amplitude / VOWEL_PEAK;
            let samples: Vec<f32> = synthetic_vowel(sample_rate as f32, f0, &formants, num_samples)
                .into_iter()
                .map(|s| s * scale)
                .collect();
            save(&output, &samples, sample_rate)
        }

        GenerateCommand::Noise {
            output,
            duration,
            sample_rate,
            amplitude,
            seed,
        } => {
            println!("Generating white noise...");
            let num_samples = sample_count(duration, sample_rate)?;
            let mut rng = XorShift::new(seed);
            let samples: Vec<f32> = (0..num_samples)
                .map(|_| rng.next_bipolar() * amplitude)
                .collect();
            save(&output, &samples, sample_rate)
        }

        GenerateCommand::Silence {
            output,
            duration,
            sample_rate,
        } => {
            println!("Generating silence...");
            let samples = vec![0.0; sample_count(duration, sample_rate)?];
            save(&output, &samples, sample_rate)
        }
    }
}

fn sample_count(duration: f32, sample_rate: u32) -> anyhow::Result<usize> {
    if sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }
    if !(duration.is_finite() && duration >= 0.0) {
        anyhow::bail!("--duration must be a non-negative number of seconds");
    }
    Ok((duration * sample_rate as f32).round() as usize)
}

fn save(output: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    write_wav(output, samples, sample_rate, Encoding::Float)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} samples to {}", samples.len(), output.display());
    Ok(())
}

/// Xorshift32 noise source.
struct XorShift(u32);

impl XorShift {
    fn new(seed: u32) -> Self {
        // Zero is a fixed point of the generator.
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    fn next_bipolar(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

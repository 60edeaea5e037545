//! WAV loading and saving for analysis.
//!
//! Analysis is mono: reads average all channels into one signal and writes
//! produce single-channel files.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How samples are stored in a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Signed integer PCM of the given bit depth.
    Int(u16),
    /// 32-bit IEEE float.
    Float,
}

impl Encoding {
    /// Bits per sample.
    pub fn bits(self) -> u16 {
        match self {
            Encoding::Int(bits) => bits,
            Encoding::Float => 32,
        }
    }

    fn sample_format(self) -> SampleFormat {
        match self {
            Encoding::Int(_) => SampleFormat::Int,
            Encoding::Float => SampleFormat::Float,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Int(bits) => write!(f, "{bits}-bit PCM"),
            Encoding::Float => f.write_str("32-bit float"),
        }
    }
}

/// Header facts of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    /// Channels stored in the file (before any mixdown).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample encoding.
    pub encoding: Encoding,
    /// Samples per channel.
    pub frames: u64,
}

impl WavInfo {
    fn from_reader<R: std::io::Read>(reader: &WavReader<R>) -> Self {
        let spec = reader.spec();
        let encoding = match spec.sample_format {
            SampleFormat::Float => Encoding::Float,
            SampleFormat::Int => Encoding::Int(spec.bits_per_sample),
        };
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            encoding,
            frames: u64::from(reader.len()) / u64::from(spec.channels.max(1)),
        }
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate.max(1))
    }
}

fn open(path: &Path) -> Result<(WavReader<BufReader<File>>, WavInfo)> {
    let reader = WavReader::open(path)?;
    let info = WavInfo::from_reader(&reader);
    Ok((reader, info))
}

/// Full-scale value of an integer encoding.
fn full_scale(bits: u16) -> f32 {
    (1i64 << (bits.clamp(1, 32) - 1)) as f32
}

/// Read the header of a WAV file without decoding samples.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    open(path.as_ref()).map(|(_, info)| info)
}

/// Average interleaved channels into one.
///
/// A trailing partial frame is averaged over the channels it has.
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect()
}

/// Decode a WAV file to a mono signal in `[-1, 1]`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavInfo)> {
    let path = path.as_ref();
    let (reader, info) = open(path)?;

    let interleaved = match info.encoding {
        Encoding::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        Encoding::Int(bits) => {
            let scale = full_scale(bits);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    let mono = mix_to_mono(&interleaved, usize::from(info.channels));

    tracing::debug!(
        path = %path.display(),
        channels = info.channels,
        sample_rate = info.sample_rate,
        encoding = %info.encoding,
        frames = mono.len(),
        "wav loaded"
    );
    Ok((mono, info))
}

/// Write a mono signal. Integer encodings clip to full scale.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
    encoding: Encoding,
) -> Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: encoding.bits(),
        sample_format: encoding.sample_format(),
    };
    let mut writer = WavWriter::create(path, spec)?;

    match encoding {
        Encoding::Float => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        Encoding::Int(bits) => {
            let scale = full_scale(bits);
            for &sample in samples {
                writer.write_sample((sample * scale).clamp(-scale, scale - 1.0) as i32)?;
            }
        }
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        sample_rate,
        encoding = %encoding,
        frames = samples.len(),
        "wav written"
    );
    Ok(())
}

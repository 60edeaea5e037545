//! Integration tests for vowelscope-io WAV I/O and framing.

use tempfile::NamedTempFile;
use vowelscope_analysis::synth::{Resonance, sine, synthetic_vowel};
use vowelscope_analysis::{FormantAlgorithm, FrameAnalyzer, PitchAlgorithm, SpectrumKind};
use vowelscope_io::{Encoding, FrameReader, TimedFrame, read_wav, read_wav_info, write_wav};

// ---------------------------------------------------------------------------
// Saving and loading
// ---------------------------------------------------------------------------

/// Save `samples`, load them back and return the worst sample error.
fn save_and_load(samples: &[f32], sample_rate: u32, encoding: Encoding) -> f32 {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), samples, sample_rate, encoding).unwrap();

    let (loaded, info) = read_wav(file.path()).unwrap();
    assert_eq!(info.sample_rate, sample_rate);
    assert_eq!(info.encoding, encoding);
    assert_eq!(info.channels, 1);
    assert_eq!(loaded.len(), samples.len());

    samples
        .iter()
        .zip(&loaded)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f32::max)
}

#[test]
fn analysis_rates_survive_saving() {
    for sr in [8000, 16000, 22050, 44100, 48000] {
        let samples = sine(sr as f32, 220.0, sr as usize / 20, 0.8);
        assert_eq!(save_and_load(&samples, sr, Encoding::Float), 0.0);
    }
}

#[test]
fn integer_encodings_quantize_within_one_step() {
    let samples = sine(44100.0, 440.0, 1000, 0.9);
    for bits in [16u16, 24] {
        let step = 1.0 / (1u32 << (bits - 1)) as f32;
        let error = save_and_load(&samples, 44100, Encoding::Int(bits));
        assert!(error <= step, "{bits}-bit error {error}");
    }
}

#[test]
fn empty_signal_writes_a_valid_file() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[], 16000, Encoding::Int(16)).unwrap();

    let (loaded, info) = read_wav(file.path()).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(info.frames, 0);
    assert_eq!(info.duration_secs(), 0.0);
}

#[test]
fn missing_file_is_a_wav_error() {
    let file = NamedTempFile::new().unwrap();
    let path = file.path().with_extension("missing.wav");
    assert!(matches!(read_wav(&path), Err(vowelscope_io::Error::Wav(_))));
    assert!(matches!(read_wav_info(&path), Err(vowelscope_io::Error::Wav(_))));
}

// ---------------------------------------------------------------------------
// Header inspection
// ---------------------------------------------------------------------------

#[test]
fn info_matches_written_signal() {
    let samples = sine(48000.0, 440.0, 2400, 0.5);
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, 48000, Encoding::Float).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.encoding.to_string(), "32-bit float");
    assert_eq!(info.frames, 2400);
    assert!((info.duration_secs() - 0.05).abs() < 1e-9);
}

#[test]
fn stereo_info_counts_frames_and_mixdown_cancels() {
    let frames = 4410;
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
    for i in 0..frames {
        writer.write_sample(i as i16).unwrap();
        writer.write_sample(-(i as i16)).unwrap();
    }
    writer.finalize().unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.encoding, Encoding::Int(16));
    assert_eq!(info.frames, frames as u64);

    let (mono, _) = read_wav(file.path()).unwrap();
    assert_eq!(mono.len(), frames);
    assert!(mono.iter().all(|&s| s == 0.0));
}

// ---------------------------------------------------------------------------
// Framing and analysis
// ---------------------------------------------------------------------------

#[test]
fn wav_frames_feed_the_analyzer() {
    let sr = 22050;
    let signal = synthetic_vowel(
        sr as f32,
        125.0,
        &[Resonance::new(700.0, 90.0), Resonance::new(1200.0, 110.0)],
        sr as usize / 2,
    );
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &signal, sr, Encoding::Int(16)).unwrap();

    let (samples, info) = read_wav(file.path()).unwrap();
    let frames: Vec<TimedFrame> = FrameReader::new(&samples, info.sample_rate, 1024, 512)
        .unwrap()
        .with_spectrum(SpectrumKind::Bytes)
        .collect::<vowelscope_io::Result<_>>()
        .unwrap();
    assert_eq!(frames.len(), vowelscope_io::frame_count(samples.len(), 1024, 512));

    let mut analyzer = FrameAnalyzer::new(PitchAlgorithm::Yin, FormantAlgorithm::TwoPeak);
    let mut full = 0;
    let mut voiced = 0;
    for timed in &frames {
        let analysis = analyzer.analyze(&timed.frame).unwrap();
        assert!(analysis.formants.len() <= 3);
        // The zero-padded tail frame is only checked for running cleanly.
        if timed.offset + 1024 > samples.len() {
            continue;
        }
        full += 1;
        if let Some(pitch) = analysis.pitch {
            assert!((pitch - 125.0).abs() < 5.0, "frame {}: {pitch}", timed.index);
            voiced += 1;
        }
    }
    assert!(voiced + 1 >= full, "{voiced} of {full} frames voiced");
}

//! Integration tests for vowelscope-config.
//!
//! These tests verify end-to-end functionality across modules.

use tempfile::TempDir;
use vowelscope_analysis::synth::{Resonance, synthetic_vowel};
use vowelscope_analysis::{AudioFrame, FormantAlgorithm, PitchAlgorithm, SpectrumKind};
use vowelscope_config::{AnalysisConfig, ConfigError, FileOp, PROFILE_NAMES, get_profile};

/// Save then load through the filesystem, including a missing parent directory.
#[test]
fn test_config_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("nested").join("analysis.toml");

    let mut config = AnalysisConfig::default()
        .with_pitch_algorithm(PitchAlgorithm::Autocorrelation)
        .with_formant_algorithm(FormantAlgorithm::Mfcc)
        .with_framing(1024, 256);
    config.formant.params.mel_filters = 32;
    config.vowel.max_distance = 250.0;

    config.save(&path).expect("should save config");
    assert!(path.exists());

    let loaded = AnalysisConfig::load(&path).expect("should load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let err = AnalysisConfig::load(temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::File { op: FileOp::Read, .. }),
        "{err}"
    );
}

#[test]
fn test_load_rejects_bad_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "fft_size = \"big\"").unwrap();
    assert!(matches!(
        AnalysisConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

/// A profile builds an analyzer that actually analyses frames.
#[test]
fn test_profiles_drive_analysis() {
    let samples = synthetic_vowel(
        44100.0,
        140.0,
        &[Resonance::new(600.0, 90.0), Resonance::new(1700.0, 110.0)],
        4096,
    );

    for name in PROFILE_NAMES {
        let config = get_profile(name).expect("profile should exist");
        let mut analyzer = config.build_analyzer().expect("profile should be valid");

        let frame = AudioFrame::from_samples(samples[..config.fft_size].to_vec(), 44100)
            .expect("frame should be valid")
            .with_derived_spectrum(config.spectrum);
        let analysis = analyzer.analyze(&frame).expect("analysis should succeed");

        if config.pitch.algorithm == PitchAlgorithm::Yin {
            let pitch = analysis.pitch.expect("voiced frame should have pitch");
            assert!((pitch - 140.0).abs() < 5.0, "{name}: pitch = {pitch}");
        } else if let Some(pitch) = analysis.pitch {
            assert!(pitch.is_finite() && pitch > 0.0, "{name}: pitch = {pitch}");
        }
        assert!(analysis.formants.len() <= 3, "{name}");
    }
}

/// The default spectrum kind lets the density search place F2 on the
/// second resonance rather than just above F1.
#[test]
fn test_default_spectrum_keeps_density_f2() {
    let config = AnalysisConfig::default().with_formant_algorithm(FormantAlgorithm::Density);
    assert_eq!(config.spectrum, SpectrumKind::Magnitude);
    assert_eq!(get_profile("fast").unwrap().spectrum, SpectrumKind::Magnitude);

    let samples = synthetic_vowel(
        44100.0,
        100.0,
        &[Resonance::new(500.0, 80.0), Resonance::new(1500.0, 80.0)],
        config.fft_size,
    );
    let frame = AudioFrame::from_samples(samples, 44100)
        .expect("frame should be valid")
        .with_derived_spectrum(config.spectrum);
    let mut analyzer = config.build_analyzer().expect("config should be valid");
    let analysis = analyzer.analyze(&frame).expect("analysis should succeed");

    let f2 = analysis.formants.f2().expect("density should find F2").frequency_hz;
    assert!((f2 - 1500.0).abs() <= 150.0, "F2 = {f2}");
}

/// Editing a loaded config and re-validating catches the bad value.
#[test]
fn test_invalid_edit_is_reported() {
    let mut config = get_profile("speech").unwrap();
    config.formant.params.lpc_order = 0;
    let err = config.build_analyzer().unwrap_err();
    assert!(err.to_string().contains("formant.lpc_order"), "{err}");
}

/// An oversized history from a config file is rejected before any analyzer is built.
#[test]
fn test_oversized_history_is_rejected() {
    let config = AnalysisConfig::from_toml("[formant]\nhistory_len = 9223372036854775807\n")
        .expect("should parse config");
    assert!(matches!(
        config.build_analyzer(),
        Err(ConfigError::Validation(_))
    ));
}

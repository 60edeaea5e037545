//! Configuration validation.
//!
//! Checks an [`AnalysisConfig`] before it is turned into an analyzer: frame
//! sizes, threshold ranges, band ordering and linear prediction orders. All
//! problems are collected, not just the first.
//!
//! # Example
//!
//! ```rust
//! use vowelscope_config::{AnalysisConfig, ValidationError, validate_config};
//!
//! validate_config(&AnalysisConfig::default()).expect("defaults are valid");
//!
//! let mut config = AnalysisConfig::default();
//! config.fft_size = 1000;
//! config.hop_size = 500;
//! assert!(matches!(
//!     validate_config(&config),
//!     Err(ValidationError::InvalidFormat { .. })
//! ));
//! ```

use thiserror::Error;

use crate::config::AnalysisConfig;

/// Smallest accepted frame.
pub const MIN_FFT_SIZE: usize = 64;

/// Largest accepted frame.
pub const MAX_FFT_SIZE: usize = 65536;

/// Longest rolling history an estimator may keep.
pub const MAX_HISTORY_LEN: usize = 64;

/// Cepstral lifter cutoff bounds in milliseconds.
const MIN_LIFTER_MS: f32 = 0.05;
const MAX_LIFTER_MS: f32 = 20.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accumulates problems while walking a config.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<ValidationError>,
}

impl Checker {
    fn range(&mut self, param: &str, value: f32, min: f32, max: f32) {
        if !(value.is_finite() && value >= min && value <= max) {
            self.errors.push(ValidationError::OutOfRange {
                param: param.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn count(&mut self, param: &str, value: usize, min: usize, max: usize) {
        self.range(param, value as f32, min as f32, max as f32);
    }

    fn positive(&mut self, param: &str, value: f32) {
        if !(value.is_finite() && value > 0.0) {
            self.format(param, format!("must be positive, got {value}"));
        }
    }

    fn ordered(&mut self, param: &str, low: f32, high: f32) {
        if !(low.is_finite() && high.is_finite() && low >= 0.0 && low < high) {
            self.format(param, format!("expected 0 <= low < high, got [{low}, {high}]"));
        }
    }

    fn format(&mut self, param: &str, reason: String) {
        self.errors.push(ValidationError::InvalidFormat {
            param: param.to_string(),
            reason,
        });
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

/// Validate a whole configuration.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut check = Checker::default();

    if config.fft_size.is_power_of_two() {
        check.count("fft_size", config.fft_size, MIN_FFT_SIZE, MAX_FFT_SIZE);
    } else {
        check.format(
            "fft_size",
            format!("must be a power of two, got {}", config.fft_size),
        );
    }
    check.count("hop_size", config.hop_size, 1, config.fft_size.max(1));

    let pitch = &config.pitch.params;
    check.range("pitch.silence_rms", pitch.silence_rms, 0.0, 1.0);
    check.positive("pitch.min_frequency", pitch.min_frequency);
    check.ordered("pitch.frequency_range", pitch.min_frequency, pitch.max_frequency);
    check.range(
        "pitch.autocorrelation_threshold",
        pitch.autocorrelation_threshold,
        0.0,
        f32::MAX,
    );
    check.range("pitch.yin_threshold", pitch.yin_threshold, 0.0, 1.0);
    check.range(
        "pitch.yin_fallback_threshold",
        pitch.yin_fallback_threshold,
        pitch.yin_threshold,
        1.0,
    );
    check.positive(
        "pitch.max_borderline_deviation",
        pitch.max_borderline_deviation,
    );
    check.count("pitch.history_len", pitch.history_len, 0, MAX_HISTORY_LEN);

    let formant = &config.formant.params;
    let max_order = config.fft_size.saturating_sub(1).max(1);
    check.range("formant.silence_rms", formant.silence_rms, 0.0, 1.0);
    check.ordered(
        "formant.frequency_range",
        formant.min_frequency,
        formant.max_frequency,
    );
    check.count("formant.lpc_order", formant.lpc_order, 1, max_order);
    check.count("formant.burg_order", formant.burg_order, 1, max_order);
    check.count(
        "formant.autocorrelation_order",
        formant.autocorrelation_order,
        1,
        max_order,
    );
    check.count(
        "formant.envelope_points",
        formant.envelope_points,
        2,
        MAX_FFT_SIZE,
    );
    check.range(
        "formant.cepstral_lifter_ms",
        formant.cepstral_lifter_ms,
        MIN_LIFTER_MS,
        MAX_LIFTER_MS,
    );
    check.count("formant.mel_filters", formant.mel_filters, 2, 256);
    check.count(
        "formant.mfcc_coefficients",
        formant.mfcc_coefficients,
        1,
        formant.mel_filters.max(1),
    );
    for (param, [low, high]) in [
        ("formant.two_peak_f1_band", formant.two_peak_f1_band),
        ("formant.two_peak_f2_band", formant.two_peak_f2_band),
        ("formant.envelope_f1_band", formant.envelope_f1_band),
        ("formant.envelope_f2_band", formant.envelope_f2_band),
        ("formant.density_f1_band", formant.density_f1_band),
    ] {
        check.ordered(param, low, high);
    }
    check.range("formant.pre_emphasis", formant.pre_emphasis, 0.0, 0.999);
    check.count(
        "formant.smoothing_window",
        formant.smoothing_window,
        1,
        config.fft_size / 2,
    );
    check.range(
        "formant.min_formant_spacing",
        formant.min_formant_spacing,
        0.0,
        f32::MAX,
    );
    check.range("formant.valley_ratio", formant.valley_ratio, 0.01, 0.99);
    check.range("formant.f2_energy_ratio", formant.f2_energy_ratio, 0.01, 1.0);
    check.positive("formant.density_window", formant.density_window);
    check.positive("formant.max_valley_width", formant.max_valley_width);
    check.count(
        "formant.history_len",
        formant.history_len,
        0,
        MAX_HISTORY_LEN,
    );

    check.positive("vowel.max_distance", config.vowel.max_distance);

    check.finish()
}

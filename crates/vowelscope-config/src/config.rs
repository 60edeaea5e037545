//! Analysis configuration file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use vowelscope_analysis::vowel::MAX_MATCH_DISTANCE;
use vowelscope_analysis::{
    FormantAlgorithm, FormantParams, FrameAnalyzer, PitchAlgorithm, PitchParams, SpectrumKind,
};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Default transform length in samples.
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Default hop between consecutive frames in samples.
pub const DEFAULT_HOP_SIZE: usize = 1024;

/// Complete analysis configuration.
///
/// Every field has a default, so a file only needs the values it changes.
///
/// # TOML Format
///
/// ```toml
/// fft_size = 2048
/// hop_size = 512
/// spectrum = "magnitude"
///
/// [pitch]
/// algorithm = "yin"
/// yin_threshold = 0.1
///
/// [formant]
/// algorithm = "burg"
/// burg_order = 18
///
/// [vowel]
/// max_distance = 300.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples per analysis frame (power of two).
    pub fft_size: usize,

    /// Samples between the starts of consecutive frames.
    pub hop_size: usize,

    /// Spectrum attached to each frame for spectrum-based formant algorithms.
    pub spectrum: SpectrumKind,

    /// Pitch detector selection and tunables.
    pub pitch: PitchSection,

    /// Formant estimator selection and tunables.
    pub formant: FormantSection,

    /// Vowel classification.
    pub vowel: VowelSection,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            spectrum: SpectrumKind::default(),
            pitch: PitchSection::default(),
            formant: FormantSection::default(),
            vowel: VowelSection::default(),
        }
    }
}

/// `[pitch]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchSection {
    /// Detector to run.
    pub algorithm: PitchAlgorithm,
    /// Detector tunables, flattened into the table.
    #[serde(flatten)]
    pub params: PitchParams,
}

/// `[formant]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormantSection {
    /// Estimator to run.
    pub algorithm: FormantAlgorithm,
    /// Estimator tunables, flattened into the table.
    #[serde(flatten)]
    pub params: FormantParams,
}

/// `[vowel]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VowelSection {
    /// Largest F1/F2 distance in Hz still reported as a match.
    pub max_distance: f32,
}

impl Default for VowelSection {
    fn default() -> Self {
        Self {
            max_distance: MAX_MATCH_DISTANCE,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value, collecting all problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)?;
        Ok(())
    }

    /// Set the pitch detector.
    pub fn with_pitch_algorithm(mut self, algorithm: PitchAlgorithm) -> Self {
        self.pitch.algorithm = algorithm;
        self
    }

    /// Set the formant estimator.
    pub fn with_formant_algorithm(mut self, algorithm: FormantAlgorithm) -> Self {
        self.formant.algorithm = algorithm;
        self
    }

    /// Set frame and hop sizes.
    pub fn with_framing(mut self, fft_size: usize, hop_size: usize) -> Self {
        self.fft_size = fft_size;
        self.hop_size = hop_size;
        self
    }

    /// Validate, then build a [`FrameAnalyzer`] for this configuration.
    pub fn build_analyzer(&self) -> Result<FrameAnalyzer, ConfigError> {
        self.validate()?;
        Ok(FrameAnalyzer::with_params(
            self.pitch.algorithm,
            self.pitch.params.clone(),
            self.formant.algorithm,
            self.formant.params.clone(),
        )
        .with_max_vowel_distance(self.vowel.max_distance))
    }
}

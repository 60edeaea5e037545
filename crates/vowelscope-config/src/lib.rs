//! Configuration for vowelscope analysis runs.
//!
//! This crate describes a complete analysis setup (frame sizes, pitch and
//! formant algorithms with their tunables, vowel matching) as a TOML file.
//!
//! # Features
//!
//! - **Config files**: Load and save [`AnalysisConfig`] as TOML; every field is optional
//! - **Validation**: Collect every out-of-range or malformed value in one pass
//! - **Profiles**: Built-in profiles for speech, singing and quick scans
//! - **Analyzer construction**: Turn a validated config into a `FrameAnalyzer`
//!
//! # Example
//!
//! ```rust,no_run
//! use vowelscope_config::{AnalysisConfig, get_profile};
//!
//! // Load a config from file
//! let config = AnalysisConfig::load("analysis.toml").unwrap();
//! let mut analyzer = config.build_analyzer().unwrap();
//!
//! // Start from a built-in profile and save a tweaked copy
//! let mut singing = get_profile("singing").unwrap();
//! singing.hop_size = 512;
//! singing.save("singing.toml").unwrap();
//! ```

mod config;
mod error;

/// Configuration validation.
pub mod validation;

/// Built-in analysis profiles.
pub mod profiles;

pub use config::{
    AnalysisConfig, DEFAULT_FFT_SIZE, DEFAULT_HOP_SIZE, FormantSection, PitchSection,
    VowelSection,
};
pub use error::{ConfigError, FileOp};
pub use profiles::{PROFILE_NAMES, get_profile, is_profile, profiles};
pub use validation::{ValidationError, ValidationResult, validate_config};

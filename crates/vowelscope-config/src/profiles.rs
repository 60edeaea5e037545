//! Built-in analysis profiles.
//!
//! Profiles are embedded TOML documents parsed on demand, so they go through
//! exactly the same path as user config files.

use crate::config::AnalysisConfig;
use crate::error::ConfigError;

/// Names of every built-in profile.
pub static PROFILE_NAMES: &[&str] = &["default", "speech", "singing", "fast"];

static PROFILES_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PROFILE),
    ("speech", SPEECH_PROFILE),
    ("singing", SINGING_PROFILE),
    ("fast", FAST_PROFILE),
];

/// Library defaults.
const DEFAULT_PROFILE: &str = "";

/// Spoken voice: narrow pitch range, finer hop.
const SPEECH_PROFILE: &str = r#"
fft_size = 2048
hop_size = 512

[pitch]
algorithm = "yin"
min_frequency = 60.0
max_frequency = 500.0

[formant]
algorithm = "lpc"
lpc_order = 14
"#;

/// Sung vowels: long frames, wide pitch range, Burg envelope.
const SINGING_PROFILE: &str = r#"
fft_size = 4096
hop_size = 1024

[pitch]
algorithm = "yin"
min_frequency = 70.0
max_frequency = 1500.0
yin_threshold = 0.12

[formant]
algorithm = "burg"
burg_order = 18
envelope_f2_band = [800.0, 3200.0]

[vowel]
max_distance = 450.0
"#;

/// Short frames and the cheap density search.
const FAST_PROFILE: &str = r#"
fft_size = 1024
hop_size = 256
spectrum = "magnitude"

[pitch]
algorithm = "autocorrelation"

[formant]
algorithm = "density"
"#;

/// Look up a built-in profile by name (case-insensitive).
pub fn get_profile(name: &str) -> Result<AnalysisConfig, ConfigError> {
    let wanted = name.trim().to_ascii_lowercase();
    let (_, toml_str) = PROFILES_TOML
        .iter()
        .find(|(profile, _)| *profile == wanted)
        .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
    AnalysisConfig::from_toml(toml_str)
}

/// True if `name` is a built-in profile.
pub fn is_profile(name: &str) -> bool {
    let wanted = name.trim().to_ascii_lowercase();
    PROFILE_NAMES.contains(&wanted.as_str())
}

/// Every built-in profile with its name.
pub fn profiles() -> Vec<(&'static str, AnalysisConfig)> {
    PROFILES_TOML
        .iter()
        .filter_map(|(name, toml_str)| {
            AnalysisConfig::from_toml(toml_str)
                .ok()
                .map(|config| (*name, config))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vowelscope_analysis::{FormantAlgorithm, PitchAlgorithm, SpectrumKind};

    #[test]
    fn every_profile_parses_and_validates() {
        assert_eq!(profiles().len(), PROFILE_NAMES.len());
        for name in PROFILE_NAMES {
            let config = get_profile(name).unwrap();
            config
                .validate()
                .unwrap_or_else(|e| panic!("profile '{name}' invalid: {e}"));
        }
    }

    #[test]
    fn default_profile_is_default_config() {
        assert_eq!(get_profile("default").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn singing_profile_values() {
        let config = get_profile("Singing").unwrap();
        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.spectrum, SpectrumKind::Magnitude);
        assert_eq!(config.formant.algorithm, FormantAlgorithm::Burg);
        assert_eq!(config.formant.params.burg_order, 18);
        assert_eq!(config.pitch.algorithm, PitchAlgorithm::Yin);
    }

    #[test]
    fn unknown_profile() {
        assert!(matches!(
            get_profile("opera"),
            Err(ConfigError::UnknownProfile(name)) if name == "opera"
        ));
        assert!(!is_profile("opera"));
        assert!(is_profile(" FAST "));
    }
}

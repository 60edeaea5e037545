//! Configuration errors.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem step that failed while loading or saving a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a config file.
    Read,
    /// Writing a config file.
    Write,
    /// Creating the directory a config is saved into.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "cannot read",
            FileOp::Write => "cannot write",
            FileOp::CreateDir => "cannot create directory",
        })
    }
}

/// Why a config could not be loaded, saved or turned into an analyzer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem failure on `path`.
    #[error("{op} {}: {source}", .path.display())]
    File {
        /// What was being attempted.
        op: FileOp,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`AnalysisConfig`](crate::AnalysisConfig).
    #[error("invalid config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("cannot render config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// `name` is not one of [`PROFILE_NAMES`](crate::PROFILE_NAMES).
    #[error("no profile named '{0}'")]
    UnknownProfile(String),

    /// Parameters out of range or malformed.
    #[error("invalid config: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    fn file(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::File {
            op,
            path: path.into(),
            source,
        }
    }

    /// Reading `path` failed.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::Read, path, source)
    }

    /// Writing `path` failed.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::Write, path, source)
    }

    /// Creating directory `path` failed.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::CreateDir, path, source)
    }
}

use std::path::PathBuf;

use crate::interpolate::InterpolationError;
use crate::merge::MergeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read descriptor {path}")]
    DescriptorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse descriptor {path}")]
    DescriptorParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("descriptor {path} must be a mapping at the top level, found {found}")]
    DescriptorShape { path: PathBuf, found: &'static str },

    #[error("failed to apply `{env_type}` overrides")]
    Override {
        env_type: String,
        source: MergeError,
    },

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    // ── Section extraction ──
    #[error("`{section}` is missing required key `{key}`")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("`{key}` must be {expected}, found {found}")]
    InvalidSection {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{section}.version` must look like X.Y (e.g. 3.9), got {version:?}")]
    InvalidVersion {
        section: &'static str,
        version: String,
    },

    #[error("only one language runtime may be configured, found both `python` and `php`")]
    ConflictingRuntimes,
}

use std::path::PathBuf;

use weaver_core::InterpolationError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] weaver_core::Error),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error("failed to install dependency `{requirement}`")]
    Install {
        requirement: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write runtime config {path}")]
    WriteRuntimeConfig {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RecipeWriteError {
    #[error("source checkout {0} does not exist")]
    MissingCheckout(PathBuf),

    #[error("failed to write build recipe at {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

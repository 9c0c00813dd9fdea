use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::RecipeWriteError;
use crate::recipe::RECIPE_FILENAME;

/// Write the rendered recipe into the checkout, replacing any previous one.
pub fn write_recipe(source_dir: &Path, content: &str) -> Result<PathBuf, RecipeWriteError> {
    if !source_dir.is_dir() {
        return Err(RecipeWriteError::MissingCheckout(source_dir.to_path_buf()));
    }

    let path = source_dir.join(RECIPE_FILENAME);
    std::fs::write(&path, content).map_err(|e| RecipeWriteError::Write {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), "wrote build recipe");
    Ok(path)
}

/// Recipe path inside `source_dir`.
pub fn recipe_path(source_dir: &Path) -> PathBuf {
    source_dir.join(RECIPE_FILENAME)
}

use std::path::Path;

use tracing::info;
use weaver_build::write::write_recipe;
use weaver_build::{DependencyInstaller, RecipeRenderer, RenderedRecipe};
use weaver_core::{Descriptor, Interpolator};

/// Load the descriptor from `checkout`, render it and write the recipe
/// next to it.
pub(crate) async fn render_checkout<I: DependencyInstaller>(
    checkout: &Path,
    file: &str,
    env_type: Option<&str>,
    installer: &I,
) -> anyhow::Result<RenderedRecipe> {
    let descriptor_path = checkout.join(file);
    info!(
        path = %descriptor_path.display(),
        env_type = env_type.unwrap_or("-"),
        "loading descriptor"
    );
    let descriptor = Descriptor::load(&descriptor_path, env_type)?;

    let interpolator = Interpolator::new();
    let recipe = RecipeRenderer::new(&interpolator, checkout)
        .render(&descriptor, installer)
        .await?;

    write_recipe(checkout, &recipe.dockerfile())?;
    Ok(recipe)
}

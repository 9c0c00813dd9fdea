use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::warn;
use weaver_build::DependencyInstaller;

use super::pipeline;

/// Logs dependency installs instead of running them.
struct DryRunInstaller;

impl DependencyInstaller for DryRunInstaller {
    type Error = std::convert::Infallible;

    async fn install(&self, _source_dir: &Path, requirement: &str) -> Result<(), Self::Error> {
        warn!(%requirement, "dry run: skipping dependency install");
        Ok(())
    }
}

#[derive(Serialize)]
struct RenderReport<'a> {
    args: &'a [String],
    env: BTreeMap<&'a str, &'a str>,
    recipe: String,
}

/// Render the descriptor in `dir` and print the result.
pub async fn render(
    dir: &Path,
    file: &str,
    env_type: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let recipe = pipeline::render_checkout(dir, file, env_type, &DryRunInstaller).await?;

    if json {
        let report = RenderReport {
            args: recipe.args.as_slice(),
            env: recipe.env.iter().collect(),
            recipe: recipe.dockerfile(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", recipe.dockerfile());
    }
    Ok(())
}

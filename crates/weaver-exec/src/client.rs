use std::path::Path;

use tracing::info;
use weaver_build::DependencyInstaller;
use weaver_build::recipe::RECIPE_FILENAME;

use crate::command::{CommandError, Invocation};
use crate::executor::{CommandExecutor, RealExecutor};

/// Container CLI used when none is configured.
pub const DEFAULT_CONTAINER_CLI: &str = "docker";

/// Source checkout, image build/push and dependency install operations,
/// parameterized over the executor for testability.
pub struct WeaverClient<E: CommandExecutor = RealExecutor> {
    executor: E,
    container_cli: String,
}

impl WeaverClient<RealExecutor> {
    pub fn new(container_cli: &str) -> Self {
        Self::with_executor(RealExecutor, container_cli)
    }
}

impl Default for WeaverClient<RealExecutor> {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_CLI)
    }
}

impl<E: CommandExecutor> WeaverClient<E> {
    pub fn with_executor(executor: E, container_cli: &str) -> Self {
        Self {
            executor,
            container_cli: container_cli.to_owned(),
        }
    }

    // ── Source ──

    /// Clone `source` into `workdir`, replacing any previous checkout, then
    /// check out `reference` when one is given.
    pub async fn clone_source(
        &self,
        source: &str,
        reference: Option<&str>,
        workdir: &Path,
    ) -> Result<(), CommandError> {
        let workdir_error = |e: std::io::Error| CommandError::Workdir {
            path: workdir.to_path_buf(),
            source: e,
        };
        if tokio::fs::try_exists(workdir).await.map_err(workdir_error)? {
            tokio::fs::remove_dir_all(workdir)
                .await
                .map_err(workdir_error)?;
        }

        let dir = workdir.to_string_lossy().into_owned();
        info!(%source, dir = %dir, "cloning source");
        self.executor
            .exec(&Invocation::new("git", ["clone", source, dir.as_str()]))
            .await?;

        if let Some(reference) = reference.filter(|r| !r.is_empty()) {
            info!(%reference, "checking out reference");
            self.executor
                .exec(&Invocation::new(
                    "git",
                    ["-C", dir.as_str(), "checkout", reference],
                ))
                .await?;
        }
        Ok(())
    }

    // ── Image ──

    /// Build the recipe in `workdir` as `tag`.
    pub async fn build_image(&self, workdir: &Path, tag: &str) -> Result<(), CommandError> {
        let dir = workdir.to_string_lossy().into_owned();
        let recipe = workdir.join(RECIPE_FILENAME).to_string_lossy().into_owned();
        info!(%tag, "building image");
        self.executor
            .exec(&Invocation::new(
                &self.container_cli,
                ["build", "-f", recipe.as_str(), "-t", tag, dir.as_str()],
            ))
            .await
            .map(drop)
    }

    pub async fn push_image(&self, tag: &str) -> Result<(), CommandError> {
        info!(%tag, "pushing image");
        self.executor
            .exec(&Invocation::new(&self.container_cli, ["push", tag]))
            .await
            .map(drop)
    }

    // ── Dependencies ──

    /// `composer require` one package into the checkout without resolving.
    pub async fn composer_require(
        &self,
        source_dir: &Path,
        package: &str,
    ) -> Result<(), CommandError> {
        self.executor
            .exec(
                &Invocation::new(
                    "composer",
                    ["require", "--no-update", "--no-interaction", package],
                )
                .current_dir(source_dir),
            )
            .await
            .map(drop)
    }
}

impl<E: CommandExecutor> DependencyInstaller for WeaverClient<E> {
    type Error = CommandError;

    async fn install(&self, source_dir: &Path, requirement: &str) -> Result<(), Self::Error> {
        self.composer_require(source_dir, requirement).await
    }
}

/// `image:tag` reference for build and push.
pub fn image_reference(image: &str, tag: &str) -> String {
    format!("{image}:{tag}")
}

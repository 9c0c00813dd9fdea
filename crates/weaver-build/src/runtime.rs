//! Language runtime blocks: plugin selection, entry point, base image and
//! dependency installation.

use std::path::Path;

use tracing::{debug, info};
use weaver_core::sections::validate_version;
use weaver_core::{EnvVarMap, Interpolator, PhpSection, PythonSection, RuntimeSection};

use crate::args::RuntimeArgs;
use crate::error::RenderError;
use crate::install::DependencyInstaller;
use crate::php::{PHP_INI_FILENAME, PhpIni};
use crate::recipe::APP_DIR;

/// Virtualenv the Python runtime installs requirements into.
pub const PYTHON_VENV: &str = "/app/.venv";

const PYTHON_IMAGE: &str = "weaver/uwsgi-python";
const PHP_IMAGE: &str = "weaver/uwsgi-php";

/// What a runtime block contributes to the build recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuntimeRecipe {
    pub base_image: String,
    /// The single dependency-install `RUN` command, if any.
    pub install: Option<String>,
}

/// Shared state a runtime block reads and extends.
pub(crate) struct RuntimeContext<'a> {
    pub interpolator: &'a Interpolator,
    pub source_dir: &'a Path,
    pub docroot: &'a str,
    pub args: &'a mut RuntimeArgs,
    pub env: &'a mut EnvVarMap,
}

pub(crate) async fn apply<I: DependencyInstaller>(
    section: &RuntimeSection,
    ctx: RuntimeContext<'_>,
    installer: &I,
) -> Result<RuntimeRecipe, RenderError> {
    match section {
        RuntimeSection::Python(python) => apply_python(python, ctx),
        RuntimeSection::Php(php) => apply_php(php, ctx, installer).await,
    }
}

fn apply_python(
    python: &PythonSection,
    ctx: RuntimeContext<'_>,
) -> Result<RuntimeRecipe, RenderError> {
    let version = ctx.interpolator.interpolate(&python.version, ctx.env)?;
    validate_version("python", &version)?;
    let wsgi = ctx.interpolator.interpolate(&python.wsgi, ctx.env)?;

    debug!(%version, %wsgi, "python runtime");
    ctx.args.option("plugin", format!("python{}", version.replace('.', "")));
    ctx.args.option("virtualenv", PYTHON_VENV);
    ctx.args.option("wsgi", &wsgi);

    let path = format!(
        "{PYTHON_VENV}/bin:{}",
        ctx.env.get("PATH").unwrap_or(weaver_core::env::BASELINE_PATH)
    );
    ctx.env.insert("PATH", path);

    let mut install = format!("python3 -m venv {PYTHON_VENV}");
    if let Some(requirements) = &python.requirements {
        let requirements = ctx.interpolator.interpolate(requirements, ctx.env)?;
        install.push_str(&format!(
            " && {PYTHON_VENV}/bin/pip install --no-cache-dir -r {requirements}"
        ));
    }

    Ok(RuntimeRecipe {
        base_image: format!("{PYTHON_IMAGE}:{version}"),
        install: Some(install),
    })
}

async fn apply_php<I: DependencyInstaller>(
    php: &PhpSection,
    ctx: RuntimeContext<'_>,
    installer: &I,
) -> Result<RuntimeRecipe, RenderError> {
    let interp = ctx.interpolator;
    let version = interp.interpolate(&php.version, ctx.env)?;
    validate_version("php", &version)?;
    let fallback = interp.interpolate(&php.fallback, ctx.env)?;

    debug!(%version, %fallback, "php runtime");
    ctx.args.option("plugin", format!("php{}", version.replace('.', "")));
    ctx.args.option("php-docroot", ctx.docroot);
    for index in &php.index {
        ctx.args.option("php-index", interp.interpolate(index, ctx.env)?);
    }
    ctx.args.option("php-allowed-ext", ".php");
    ctx.args.option("static-skip-ext", ".php");
    ctx.args.option("php-fallback", &fallback);
    ctx.args.option("php-ini", format!("{APP_DIR}/{PHP_INI_FILENAME}"));

    let ini = PhpIni {
        extensions: php
            .extensions
            .iter()
            .map(|ext| interp.interpolate(ext, ctx.env))
            .collect::<Result<_, _>>()?,
        directives: php
            .ini_set
            .iter()
            .map(|line| interp.interpolate(line, ctx.env))
            .collect::<Result<_, _>>()?,
    };
    let ini_path = ini.write(ctx.source_dir)?;
    debug!(path = %ini_path.display(), "wrote php ini");

    for requirement in &php.requirements {
        let requirement = interp.interpolate(requirement, ctx.env)?;
        info!(%requirement, "installing php dependency");
        installer
            .install(ctx.source_dir, &requirement)
            .await
            .map_err(|e| RenderError::Install {
                requirement: requirement.clone(),
                source: Box::new(e),
            })?;
    }

    let install = (!php.requirements.is_empty() || ctx.source_dir.join("composer.json").exists())
        .then(|| "composer install --no-dev --no-interaction --optimize-autoloader".to_owned());

    Ok(RuntimeRecipe {
        base_image: format!("{PHP_IMAGE}:{version}"),
        install,
    })
}

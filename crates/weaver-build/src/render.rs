use std::path::Path;

use tracing::{debug, info};
use weaver_core::{Descriptor, EnvVarMap, InterpolationError, Interpolator};

use crate::args::{self, HTTP_PORT, RuntimeArgs};
use crate::error::RenderError;
use crate::install::DependencyInstaller;
use crate::recipe::{APP_DIR, BuildInstructions, DEFAULT_BASE_IMAGE, Instruction};
use crate::routes::{self, StaticRules};
use crate::runtime::{self, RuntimeContext};

/// Output of one renderer pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecipe {
    pub env: EnvVarMap,
    pub args: RuntimeArgs,
    pub instructions: BuildInstructions,
}

impl RenderedRecipe {
    /// Dockerfile text for [`Self::instructions`].
    pub fn dockerfile(&self) -> String {
        self.instructions.render()
    }
}

/// Renders an effective descriptor into uWSGI arguments and a build recipe.
///
/// Section order is fixed: baseline flags, language runtime, HTTPS redirect,
/// static files, access control, environment. Routing rules rely on it.
pub struct RecipeRenderer<'a> {
    interpolator: &'a Interpolator,
    source_dir: &'a Path,
}

impl<'a> RecipeRenderer<'a> {
    /// `source_dir` is the checkout; runtime config files and dependency
    /// installs land there.
    pub fn new(interpolator: &'a Interpolator, source_dir: &'a Path) -> Self {
        Self {
            interpolator,
            source_dir,
        }
    }

    pub async fn render<I: DependencyInstaller>(
        &self,
        descriptor: &Descriptor,
        installer: &I,
    ) -> Result<RenderedRecipe, RenderError> {
        let interp = self.interpolator;
        let mut env = self.initial_env(descriptor)?;
        let docroot = interp.interpolate(&descriptor.docroot()?, &env)?;

        let mut args = RuntimeArgs::new();
        args::baseline(&mut args, &docroot);

        let mut base_image = DEFAULT_BASE_IMAGE.to_owned();
        let mut install = None;
        if let Some(section) = descriptor.runtime()? {
            let ctx = RuntimeContext {
                interpolator: interp,
                source_dir: self.source_dir,
                docroot: &docroot,
                args: &mut args,
                env: &mut env,
            };
            let recipe = runtime::apply(&section, ctx, installer).await?;
            base_image = recipe.base_image;
            install = recipe.install;
        }

        if descriptor.ssl()?.is_some_and(|ssl| ssl.force) {
            debug!("forcing https");
            routes::ssl_redirect(&mut args);
        }

        let rules = StaticRules {
            public_dirs: self.interpolate_all(&descriptor.public_dirs()?, &env)?,
            maps: descriptor
                .static_maps()?
                .into_iter()
                .map(|(prefix, dir)| {
                    Ok((
                        interp.interpolate(&prefix, &env)?,
                        interp.interpolate(&dir, &env)?,
                    ))
                })
                .collect::<Result<_, InterpolationError>>()?,
            index: self.interpolate_all(&descriptor.static_index()?, &env)?,
        };
        routes::static_files(&mut args, &rules);

        routes::access_control(&mut args, descriptor.auth()?.as_ref(), interp, &env)?;

        for (name, value) in env.iter() {
            args.option("env", format!("{name}={value}"));
        }

        let commands = self.interpolate_all(&descriptor.commands()?, &env)?;
        let instructions = assemble(base_image, install, commands, &env, &args);

        info!(
            args = args.len(),
            instructions = instructions.len(),
            "rendered recipe"
        );
        Ok(RenderedRecipe {
            env,
            args,
            instructions,
        })
    }

    /// Baseline variables plus the descriptor's `env`, each value
    /// interpolated against the baseline.
    fn initial_env(&self, descriptor: &Descriptor) -> Result<EnvVarMap, RenderError> {
        let mut env = EnvVarMap::baseline();
        let resolved = descriptor
            .env_entries()?
            .into_iter()
            .map(|(name, raw)| Ok((name, self.interpolator.interpolate(&raw, &env)?)))
            .collect::<Result<Vec<_>, InterpolationError>>()?;
        for (name, value) in resolved {
            env.insert(name, value);
        }
        Ok(env)
    }

    fn interpolate_all(
        &self,
        values: &[String],
        env: &EnvVarMap,
    ) -> Result<Vec<String>, InterpolationError> {
        values
            .iter()
            .map(|value| self.interpolator.interpolate(value, env))
            .collect()
    }
}

fn assemble(
    base_image: String,
    install: Option<String>,
    commands: Vec<String>,
    env: &EnvVarMap,
    args: &RuntimeArgs,
) -> BuildInstructions {
    let mut instructions = BuildInstructions::new();
    instructions.push(Instruction::From(base_image));
    instructions.push(Instruction::Expose(HTTP_PORT));
    instructions.push(Instruction::Workdir(APP_DIR.to_owned()));
    instructions.push(Instruction::Copy {
        from: ".".to_owned(),
        to: APP_DIR.to_owned(),
    });
    if let Some(install) = install {
        instructions.push(Instruction::Run(install));
    }
    for command in commands {
        instructions.push(Instruction::Run(command));
    }
    for (name, value) in env.iter() {
        instructions.push(Instruction::Env {
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }
    instructions.push(Instruction::server_cmd(args));
    instructions
}

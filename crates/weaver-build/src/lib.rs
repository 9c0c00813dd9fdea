//! uWSGI argument and container recipe generation for weaver.
//!
//! # Render pipeline
//!
//! ```text
//! RecipeRenderer::render()
//!   1. Baseline    ── bind address, process names, chdir, threads, log format
//!   2. Runtime     ── python / php plugin, entry point, base image, installs
//!   3. HTTPS       ── redirect chain ending in the `ssl-okay` label
//!   4. Static      ── --check-static / --static-map / --static-index
//!   5. Auth        ── whitelist, ACME bypass, basic auth, `auth-done` label
//!   6. Environment ── one --env per variable
//! ```
//!
//! # Recipe layout
//!
//! `FROM` → `EXPOSE` → `WORKDIR`/`COPY` → dependency install → custom
//! commands → `ENV` → `CMD ["uwsgi", ...]`.

pub mod args;
pub mod error;
pub mod install;
pub mod php;
pub mod recipe;
pub mod render;
pub mod routes;
mod runtime;
pub mod write;

pub use args::RuntimeArgs;
pub use error::{RecipeWriteError, RenderError};
pub use install::DependencyInstaller;
pub use recipe::{BuildInstructions, Instruction, RECIPE_FILENAME};
pub use render::{RecipeRenderer, RenderedRecipe};
pub use runtime::PYTHON_VENV;

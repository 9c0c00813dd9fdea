//! External commands weaver drives: `git`, the container CLI and
//! `composer`.
//!
//! Every invocation blocks until the process exits. Output is captured and
//! logged on failure; a non-zero exit becomes a [`CommandError`].

pub mod client;
pub mod command;
pub mod executor;

pub use client::{DEFAULT_CONTAINER_CLI, WeaverClient, image_reference};
pub use command::{CommandError, Invocation};
pub use executor::{CommandExecutor, RealExecutor};

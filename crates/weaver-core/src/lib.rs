//! Core types and configuration for weaver.
//!
//! This crate loads the Weaverfile ([`Descriptor`]), merges the selected
//! environment-type section over it ([`merge`]), expands `${...}`
//! placeholders ([`Interpolator`]) and exposes typed section views
//! ([`sections`]).

pub mod config;
pub mod env;
pub mod error;
pub mod interpolate;
pub mod merge;
pub mod sections;
pub mod tree;

pub use config::{DEFAULT_DESCRIPTOR, Descriptor, apply_environment, load};
pub use env::EnvVarMap;
pub use error::{Error, Result};
pub use interpolate::{FunctionHandler, InterpolationError, Interpolator};
pub use merge::{MergeError, merge, merge_into};
pub use sections::{AuthSection, PhpSection, PythonSection, RuntimeSection, SslSection};
pub use tree::ConfigTree;

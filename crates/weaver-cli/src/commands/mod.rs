mod build;
mod pipeline;
mod render;

pub use build::{BuildOptions, build};
pub use render::render;

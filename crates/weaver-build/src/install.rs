use std::path::Path;

/// Installs one declared runtime dependency into the source checkout.
///
/// Called during rendering, once per requirement, in declaration order.
#[allow(async_fn_in_trait)]
pub trait DependencyInstaller {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn install(&self, source_dir: &Path, requirement: &str) -> Result<(), Self::Error>;
}

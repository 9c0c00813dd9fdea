use std::path::PathBuf;

use weaver_exec::{CommandExecutor, WeaverClient, image_reference};

use super::pipeline;

/// Inputs for [`build`].
pub struct BuildOptions {
    pub image: String,
    pub source: String,
    pub reference: Option<String>,
    pub file: String,
    pub env_type: Option<String>,
    pub tag: String,
    pub workdir: PathBuf,
    pub container_cli: String,
}

/// Execute the full pipeline: clone → render → build → push.
pub async fn build(opts: BuildOptions) -> anyhow::Result<()> {
    let client = WeaverClient::new(&opts.container_cli);
    run(&opts, &client).await
}

/// Pipeline body; stops at the first failing step.
pub(crate) async fn run<E: CommandExecutor>(
    opts: &BuildOptions,
    client: &WeaverClient<E>,
) -> anyhow::Result<()> {
    println!("Cloning {}...", opts.source);
    client
        .clone_source(&opts.source, opts.reference.as_deref(), &opts.workdir)
        .await?;

    println!("Rendering {}...", opts.file);
    pipeline::render_checkout(&opts.workdir, &opts.file, opts.env_type.as_deref(), client)
        .await?;

    let tag = image_reference(&opts.image, &opts.tag);
    println!("Building {tag}...");
    client.build_image(&opts.workdir, &tag).await?;

    println!("Pushing {tag}...");
    client.push_image(&tag).await?;

    println!();
    println!("Published: {tag}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mockall::{Sequence, mock};
    use tempfile::TempDir;
    use weaver_exec::{CommandError, Invocation};

    use super::*;

    mock! {
        Executor {}

        impl CommandExecutor for Executor {
            async fn exec(&self, invocation: &Invocation) -> Result<String, CommandError>;
        }
    }

    fn options(workdir: &Path) -> BuildOptions {
        BuildOptions {
            image: "repo/app".to_owned(),
            source: "https://example.com/app.git".to_owned(),
            reference: None,
            file: "Weaverfile".to_owned(),
            env_type: None,
            tag: "v1".to_owned(),
            workdir: workdir.to_path_buf(),
            container_cli: "docker".to_owned(),
        }
    }

    /// Stands in for `git clone`: creates the checkout with a descriptor.
    fn fake_clone(inv: &Invocation) -> Result<String, CommandError> {
        let dir = Path::new(&inv.args[2]);
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("Weaverfile"), "docroot: /www\n").unwrap();
        Ok(String::new())
    }

    fn failed(command: &str) -> CommandError {
        CommandError::CommandFailed {
            command: command.to_owned(),
            status: "exit status: 1".to_owned(),
            output: "boom".to_owned(),
        }
    }

    #[tokio::test]
    async fn runs_clone_render_build_push_in_order() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("src");
        let recipe = workdir.join("Weaver.Dockerfile");
        let mut mock = MockExecutor::new();
        let mut seq = Sequence::new();

        mock.expect_exec()
            .withf(|inv| inv.program == "git" && inv.has_arg("clone"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(fake_clone);
        mock.expect_exec()
            .withf(|inv| inv.program == "docker" && inv.args[0] == "build")
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |inv| {
                assert!(recipe.exists(), "recipe must be written before build");
                assert!(inv.has_arg("repo/app:v1"));
                Ok(String::new())
            });
        mock.expect_exec()
            .withf(|inv| inv.program == "docker" && inv.args == ["push", "repo/app:v1"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(String::new()));

        let client = WeaverClient::with_executor(mock, "docker");
        run(&options(&workdir), &client).await.unwrap();
    }

    #[tokio::test]
    async fn clone_failure_stops_pipeline() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("src");
        let mut mock = MockExecutor::new();

        mock.expect_exec()
            .times(1)
            .returning(|_| Err(failed("git clone")));

        let client = WeaverClient::with_executor(mock, "docker");
        let err = run(&options(&workdir), &client).await.unwrap_err();

        assert!(err.to_string().contains("git clone"));
        assert!(!workdir.join("Weaver.Dockerfile").exists());
    }

    #[tokio::test]
    async fn render_failure_skips_build_and_push() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("src");
        let mut mock = MockExecutor::new();

        mock.expect_exec()
            .withf(|inv| inv.has_arg("clone"))
            .times(1)
            .returning(|inv| {
                std::fs::create_dir_all(&inv.args[2]).unwrap();
                Ok(String::new())
            });

        let client = WeaverClient::with_executor(mock, "docker");
        let err = run(&options(&workdir), &client).await.unwrap_err();

        assert!(format!("{err:#}").contains("failed to read descriptor"));
    }

    #[tokio::test]
    async fn build_failure_skips_push() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("src");
        let mut mock = MockExecutor::new();
        let mut seq = Sequence::new();

        mock.expect_exec()
            .withf(|inv| inv.has_arg("clone"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(fake_clone);
        mock.expect_exec()
            .withf(|inv| inv.args[0] == "build")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(failed("docker build")));

        let client = WeaverClient::with_executor(mock, "docker");
        let err = run(&options(&workdir), &client).await.unwrap_err();

        assert!(err.to_string().contains("docker build"));
        assert!(workdir.join("Weaver.Dockerfile").exists());
    }
}

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use weaver_core::DEFAULT_DESCRIPTOR;
use weaver_exec::DEFAULT_CONTAINER_CLI;

#[derive(Parser)]
#[command(
    name = "weaver",
    about = "Render a Weaverfile into a uWSGI container image and publish it"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the source, render the recipe, build and push the image
    Build {
        /// Target image repository
        #[arg(long, env = "WEAVER_IMAGE")]
        image: String,
        /// Source repository URI
        #[arg(long, env = "WEAVER_SOURCE")]
        source: String,
        /// Branch, tag or commit to check out (default: repository default branch)
        #[arg(long = "ref", env = "WEAVER_REF")]
        reference: Option<String>,
        #[command(flatten)]
        descriptor: DescriptorArgs,
        /// Image tag to build and push
        #[arg(long, env = "WEAVER_TAG", default_value = "latest")]
        tag: String,
        /// Directory the source is cloned into (replaced if present)
        #[arg(long, env = "WEAVER_WORKDIR", default_value = "weaver-src")]
        workdir: PathBuf,
        /// Container CLI used for build and push
        #[arg(long, env = "WEAVER_CONTAINER_CLI", default_value = DEFAULT_CONTAINER_CLI)]
        container_cli: String,
    },
    /// Render the recipe for a local checkout without building
    Render {
        /// Checkout directory containing the descriptor
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        descriptor: DescriptorArgs,
        /// Print arguments, environment and recipe as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct DescriptorArgs {
    /// Descriptor filename inside the checkout
    #[arg(long, env = "WEAVER_FILE", default_value = DEFAULT_DESCRIPTOR)]
    file: String,
    /// Environment type whose override section is merged (e.g. staging)
    #[arg(long, env = "WEAVER_ENV_TYPE")]
    env_type: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            image,
            source,
            reference,
            descriptor,
            tag,
            workdir,
            container_cli,
        } => {
            commands::build(commands::BuildOptions {
                image,
                source,
                reference,
                file: descriptor.file,
                env_type: descriptor.env_type,
                tag,
                workdir,
                container_cli,
            })
            .await
        }
        Commands::Render {
            dir,
            descriptor,
            json,
        } => commands::render(&dir, &descriptor.file, descriptor.env_type.as_deref(), json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

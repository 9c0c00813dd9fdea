use std::process::Stdio;

use tracing::{debug, error};

use crate::command::{CommandError, Invocation};

/// Abstraction over external process execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Run to completion and return captured stdout.
    ///
    /// A non-zero exit is an error carrying the captured output.
    async fn exec(&self, invocation: &Invocation) -> Result<String, CommandError>;
}

/// Runs commands with `tokio::process`, capturing stdout and stderr.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        debug!(command = %invocation, "running");
        let output = command.output().await.map_err(|e| CommandError::NotFound {
            program: invocation.program.clone(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            debug!(command = %invocation, %stdout, %stderr, "finished");
            Ok(stdout)
        } else {
            error!(
                command = %invocation,
                status = %output.status,
                %stdout,
                %stderr,
                "command failed"
            );
            Err(CommandError::CommandFailed {
                command: invocation.to_string(),
                status: output.status.to_string(),
                output: format!("{stdout}{stderr}").trim().to_owned(),
            })
        }
    }
}

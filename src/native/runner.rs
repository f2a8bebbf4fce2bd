use std::process::Stdio;

use tokio::{process::Command, time::Instant};
use tracing::{Instrument, Span};

use crate::core::{
    domain::{CommandSpec, ExecutionResult},
    traits::runner::{ProcessRunner, SpawnError},
};

/// Runs commands as child processes of this server and waits for them.
#[derive(Clone, Debug)]
pub struct NativeRunner {
    span: Span,
}

impl NativeRunner {
    pub fn new(span: Span) -> Self {
        NativeRunner { span }
    }

    async fn spawn_and_wait(&self, spec: &CommandSpec) -> Result<ExecutionResult, SpawnError> {
        let command_line = spec.to_string();
        if spec.program.is_empty() {
            tracing::error!("Refusing to run an empty command");
            return Err(SpawnError::EmptyCommand);
        }

        let (stdout, stderr) = if spec.captures_output() {
            (Stdio::piped(), Stdio::piped())
        } else {
            (Stdio::inherit(), Stdio::inherit())
        };

        tracing::info!("Running> {}", command_line);
        let start_time = Instant::now();

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|e| {
                tracing::error!("Failed to spawn {}: {}", command_line, e);
                SpawnError::FailedToLaunch {
                    command: command_line.clone(),
                    kind: e.kind(),
                    msg: e.to_string(),
                }
            })?;

        let out = child.wait_with_output().await.map_err(|e| {
            tracing::error!("Failed to wait for {}: {}", command_line, e);
            SpawnError::FailedToWait {
                command: command_line.clone(),
                msg: e.to_string(),
            }
        })?;

        let duration = start_time.elapsed();
        let result = ExecutionResult {
            // Processes killed by a signal have no exit code.
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            duration,
        };

        if result.success() {
            tracing::info!("Finished in {:.3} s", result.duration.as_secs_f64());
        } else {
            tracing::error!(
                "Failed (code {}) in {:.3} s",
                result.exit_code,
                result.duration.as_secs_f64()
            );
        }

        Ok(result)
    }
}

#[async_trait::async_trait]
impl ProcessRunner for NativeRunner {
    async fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, SpawnError> {
        self.spawn_and_wait(spec)
            .instrument(self.span.clone())
            .await
    }
}

use std::sync::Mutex;
use std::time::Duration;

use crate::core::{
    domain::{CommandSpec, ExecutionResult},
    traits::runner::{ProcessRunner, SpawnError},
};

/// Answers every command with the same scripted result, without spawning.
#[derive(Debug)]
pub struct RunnerStub {
    result: Result<ExecutionResult, SpawnError>,
    delay: Duration,
    executed: Mutex<Vec<CommandSpec>>,
}

impl RunnerStub {
    pub fn new(result: Result<ExecutionResult, SpawnError>, delay: Duration) -> Self {
        Self {
            result,
            delay,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Every command received so far, in order.
    pub fn executed(&self) -> Vec<CommandSpec> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ProcessRunner for RunnerStub {
    #[tracing::instrument(skip(self), fields(command = %spec))]
    async fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, SpawnError> {
        tracing::debug!("Start execution: spec={:?}", spec);
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(spec.clone());
        }
        tokio::time::sleep(self.delay).await;
        tracing::debug!("Execution result: {:?}", self.result);

        self.result.clone()
    }
}

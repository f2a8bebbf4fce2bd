use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::{
    domain::{Action, ExecutionResult, ResponsePayload, UnknownAction},
    errors::DispatchError,
    locks::WorkdirLocks,
    pipeline::commands::{Plan, Toolchain},
    traits::runner::{ProcessRunner, SpawnError},
};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    runner: Arc<dyn ProcessRunner>,
    toolchain: Toolchain,
    locks: Arc<WorkdirLocks>,
}

impl Dispatcher {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        toolchain: Toolchain,
        locks: Arc<WorkdirLocks>,
    ) -> Self {
        Self {
            runner,
            toolchain,
            locks,
        }
    }

    /// Validates `action`, runs its commands and shapes the reported result.
    ///
    /// A non-zero exit code still yields a payload; only rejected requests and
    /// commands that could not be started are errors.
    #[tracing::instrument(skip(self, params), fields(request_id = %Uuid::new_v4()))]
    pub async fn dispatch(
        &self,
        action: &str,
        params: &HashMap<String, String>,
    ) -> Result<ResponsePayload, DispatchError> {
        let action = action.parse::<Action>().map_err(|UnknownAction(action)| {
            tracing::warn!("Unknown action: {}", action);
            DispatchError::InvalidAction { action }
        })?;

        let plan = self.toolchain.plan(action, params)?;
        let result = self.execute(action, &plan).await?;

        Ok(ResponsePayload::from_result(
            &result,
            action == Action::Query,
        ))
    }

    async fn execute(&self, action: Action, plan: &Plan) -> Result<ExecutionResult, SpawnError> {
        let lock = self.locks.for_dir(&plan.step.working_dir);

        if action.mutates_workspace() {
            let _guard = lock.write().await;
            self.run_plan(plan).await
        } else {
            let _guard = lock.read().await;
            self.run_plan(plan).await
        }
    }

    async fn run_plan(&self, plan: &Plan) -> Result<ExecutionResult, SpawnError> {
        for spec in &plan.preparation {
            // Only the final step is reported; the runner has already logged
            // the outcome of this one.
            if let Err(err) = self.runner.execute(spec).await {
                tracing::debug!("Ignoring failed preparation step: {}", err);
            }
        }

        self.runner.execute(&plan.step).await
    }
}

use std::sync::Arc;
use std::time::Duration;

use tonic::transport::Server;

use crate::config::Config;
use crate::core::domain::ExecutionResult;
use crate::core::locks::WorkdirLocks;
use crate::core::pipeline::dispatching::Dispatcher;
use crate::core::traits::runner::ProcessRunner;
use crate::grpc::models::control_service_server::ControlServiceServer;
use crate::grpc::services::ControlServiceImpl;
use crate::native::runner::NativeRunner;
use crate::stubs::runner::RunnerStub;

mod config;
mod constants;
mod core;
mod grpc;
mod logging;
mod native;
mod stubs;

#[cfg(test)]
mod integration_test;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);
    config.check_workdir()?;

    tracing::info!("Loaded config: {:?}", config);

    let runner: Arc<dyn ProcessRunner> = if config.dry_run {
        tracing::warn!("Dry run: commands are logged but not executed");
        Arc::new(RunnerStub::new(
            Ok(ExecutionResult {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::ZERO,
            }),
            Duration::ZERO,
        ))
    } else {
        Arc::new(NativeRunner::new(logging::runner_span(&config.workdir)))
    };

    let dispatcher = Dispatcher::new(runner, config.toolchain(), Arc::new(WorkdirLocks::new()));
    let service = ControlServiceServer::new(ControlServiceImpl::new(dispatcher));

    tracing::info!("gRPC server listening on {}", config.addr);
    Server::builder()
        .add_service(service)
        .serve_with_shutdown(config.addr, shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

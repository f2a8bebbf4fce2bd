use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Code, transport::Server};
use uuid::Uuid;

use crate::config::Config;
use crate::core::domain::ResponsePayload;
use crate::core::errors::DispatchError;
use crate::core::locks::WorkdirLocks;
use crate::core::pipeline::commands::Toolchain;
use crate::core::pipeline::dispatching::Dispatcher;
use crate::grpc::models::DispatchRequest;
use crate::grpc::models::control_service_client::ControlServiceClient;
use crate::grpc::models::control_service_server::ControlServiceServer;
use crate::grpc::services::ControlServiceImpl;
use crate::native::runner::NativeRunner;

const FAKE_MAKE: &str = r#"#!/bin/sh
echo "${1:-build}" >> calls.log
case "$1" in
    clean) echo "removed orderbook" ;;
    test) echo "2 passed"; echo "1 failed" >&2; exit 1 ;;
    *) echo "built orderbook" ;;
esac
"#;

const FAKE_ORDERBOOK: &str = r#"#!/bin/sh
if [ "$1" = "query" ]; then
    shift
    echo "rows for $*"
else
    echo "OK"
fi
"#;

struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        Self::in_dir(std::env::temp_dir().join(format!("actionrunner_{}", Uuid::new_v4())))
    }

    /// Workspace addressed by a path relative to the current directory.
    fn relative() -> Self {
        Self::in_dir(PathBuf::from(format!("actionrunner_{}", Uuid::new_v4())))
    }

    fn in_dir(dir: PathBuf) -> Self {
        std::fs::create_dir_all(&dir).expect("Failed to create workspace");
        write_script(&dir.join("make"), FAKE_MAKE);
        write_script(&dir.join("orderbook"), FAKE_ORDERBOOK);
        Self { dir }
    }

    fn toolchain(&self) -> Toolchain {
        Toolchain {
            build_tool: self.dir.join("make").display().to_string(),
            binary: self.dir.join("orderbook").display().to_string(),
            working_dir: self.dir.clone(),
        }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::new(NativeRunner::new(tracing::Span::none())),
            self.toolchain(),
            Arc::new(WorkdirLocks::new()),
        )
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

fn query_params(fields: &str) -> HashMap<String, String> {
    HashMap::from([
        ("symbols".to_string(), "SCH".to_string()),
        ("start_timestamp".to_string(), "1609724964077464154".to_string()),
        ("end_timestamp".to_string(), "1609724964129550454".to_string()),
        ("fields".to_string(), fields.to_string()),
    ])
}

#[tokio::test]
async fn test_compile_cleans_before_building() {
    let workspace = Workspace::new();

    let payload = workspace
        .dispatcher()
        .dispatch("compile", &HashMap::new())
        .await
        .expect("Compile should be dispatched");

    assert_eq!(
        payload,
        ResponsePayload {
            output: "built orderbook\n".to_string(),
            elapsed_ms: None,
        }
    );
    assert_eq!(workspace.calls(), ["clean", "build"]);
}

#[tokio::test]
async fn test_failing_tests_still_return_output() {
    let workspace = Workspace::new();

    let payload = workspace
        .dispatcher()
        .dispatch("test", &HashMap::new())
        .await
        .expect("Test should be dispatched");

    assert_eq!(payload.output, "2 passed\n\n\n1 failed\n");
    assert_eq!(payload.elapsed_ms, None);
    assert_eq!(workspace.calls(), ["test"]);
}

#[tokio::test]
async fn test_run_and_query_use_binary() {
    let workspace = Workspace::new();
    let dispatcher = workspace.dispatcher();

    let run = dispatcher.dispatch("run", &HashMap::new()).await.unwrap();
    assert_eq!(run.output, "OK\n");
    assert_eq!(run.elapsed_ms, None);

    let query = dispatcher.dispatch("query", &query_params(" ")).await.unwrap();
    assert_eq!(
        query.output,
        "rows for SCH 1609724964077464154 1609724964129550454\n"
    );
    assert!(query.elapsed_ms.is_some_and(|ms| ms >= 0.0));

    let query = dispatcher
        .dispatch("query", &query_params("symbol,epoch"))
        .await
        .unwrap();
    assert_eq!(
        query.output,
        "rows for SCH 1609724964077464154 1609724964129550454 symbol,epoch\n"
    );

    assert!(workspace.calls().is_empty());
}

#[tokio::test]
async fn test_relative_workdir_from_config_runs_binary() {
    let workspace = Workspace::relative();
    let workdir = workspace.dir.display().to_string();
    let vars = HashMap::from([
        ("ACTIONRUNNER_WORKDIR", workdir.as_str()),
        ("ACTIONRUNNER_BINARY", "./orderbook"),
    ]);
    let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    config.check_workdir().unwrap();

    let dispatcher = Dispatcher::new(
        Arc::new(NativeRunner::new(tracing::Span::none())),
        config.toolchain(),
        Arc::new(WorkdirLocks::new()),
    );

    let run = dispatcher.dispatch("run", &HashMap::new()).await.unwrap();
    assert_eq!(run.output, "OK\n");

    let query = dispatcher.dispatch("query", &query_params("")).await.unwrap();
    assert_eq!(
        query.output,
        "rows for SCH 1609724964077464154 1609724964129550454\n"
    );
}

#[tokio::test]
async fn test_missing_binary_is_a_spawn_error() {
    let workspace = Workspace::new();
    std::fs::remove_file(workspace.dir.join("orderbook")).unwrap();

    let result = workspace.dispatcher().dispatch("run", &HashMap::new()).await;

    assert!(matches!(result, Err(DispatchError::Spawn(_))));
}

#[tokio::test]
async fn test_grpc_round_trip() {
    let workspace = Workspace::new();
    let service = ControlServiceServer::new(ControlServiceImpl::new(workspace.dispatcher()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
    });

    let mut client = ControlServiceClient::connect(format!("http://{}", addr))
        .await
        .expect("Failed to connect");

    let response = client
        .dispatch(DispatchRequest {
            action: "query".to_string(),
            params: query_params("a,b,c"),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(
        response.output,
        "rows for SCH 1609724964077464154 1609724964129550454 a,b,c\n"
    );
    assert!(response.elapsed_ms.is_some());

    let response = client
        .dispatch(DispatchRequest {
            action: "clean".to_string(),
            params: HashMap::new(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response.output, "removed orderbook\n");
    assert_eq!(response.elapsed_ms, None);

    let status = client
        .dispatch(DispatchRequest {
            action: "deploy".to_string(),
            params: HashMap::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    assert_eq!(workspace.calls(), ["clean"]);
}

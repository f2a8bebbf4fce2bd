use tonic::{Request, Response, Status};

use crate::{
    core::pipeline::dispatching::Dispatcher,
    grpc::models::{DispatchRequest, DispatchResponse, control_service_server::ControlService},
};

#[derive(Clone, Debug)]
pub struct ControlServiceImpl {
    dispatcher: Dispatcher,
}

impl ControlServiceImpl {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[tonic::async_trait]
impl ControlService for ControlServiceImpl {
    #[tracing::instrument(skip(self))]
    async fn dispatch(
        &self,
        request: Request<DispatchRequest>,
    ) -> Result<Response<DispatchResponse>, Status> {
        let DispatchRequest { action, params } = request.into_inner();

        match self.dispatcher.dispatch(&action, &params).await {
            Ok(payload) => Ok(Response::new(payload.into())),
            Err(err) => {
                if !err.is_client_error() {
                    tracing::error!("Dispatch of {} failed: {}", action, err);
                }
                Err(err.into())
            }
        }
    }
}

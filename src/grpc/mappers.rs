use tonic::Status;

use crate::core::{domain::ResponsePayload, errors::DispatchError};
use crate::grpc::models::DispatchResponse;

impl From<ResponsePayload> for DispatchResponse {
    fn from(payload: ResponsePayload) -> Self {
        Self {
            output: payload.output,
            elapsed_ms: payload.elapsed_ms,
        }
    }
}

impl From<DispatchError> for Status {
    fn from(err: DispatchError) -> Self {
        if err.is_client_error() {
            Status::invalid_argument(err.to_string())
        } else {
            Status::internal(err.to_string())
        }
    }
}

use crate::{PredictionRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one prediction request to the configured endpoint.
    SubmitPrediction {
        request_id: RequestId,
        request: PredictionRequest,
    },
    /// Show a blocking notice; the shell waits for acknowledgement.
    NotifyValidation { message: String },
}

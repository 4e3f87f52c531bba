//! FactCheck engine: prediction service client and background executor.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, PredictionClient, ReqwestPredictionClient, DEFAULT_ENDPOINT};
pub use engine::EngineHandle;
pub use types::{
    EngineEvent, FailureKind, PredictionError, PredictionRequest, PredictionResponse, RequestId,
};

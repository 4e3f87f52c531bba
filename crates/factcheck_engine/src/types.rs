use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub type RequestId = u64;

/// JSON body sent to the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    pub title: String,
    pub text: String,
}

/// JSON body returned by the prediction endpoint.
///
/// `prediction` is kept as a raw integer; mapping it to a label is up to the
/// caller. Any JSON integer is accepted, as is an integral float such as
/// `1.0`. Fractional numbers and non-numbers make the body malformed.
/// `probability` is optional and informational only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(deserialize_with = "integral_prediction")]
    pub prediction: i128,
    #[serde(default)]
    pub probability: Option<f64>,
}

fn integral_prediction<'de, D>(deserializer: D) -> Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value.into());
    }
    if let Some(value) = number.as_u64() {
        return Ok(value.into());
    }
    match number.as_f64() {
        // Saturates for magnitudes beyond i128; still unmapped either way.
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i128),
        _ => Err(D::Error::custom(format!(
            "prediction {number} is not an integer"
        ))),
    }
}

/// Error body the service sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PredictionCompleted {
        request_id: RequestId,
        result: Result<PredictionResponse, PredictionError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct PredictionError {
    pub kind: FailureKind,
    pub message: String,
}

impl PredictionError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    Network,
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}

use crate::core::errors::{AnyPayError, DECODE_FAILURE_CODE};
use crate::core::kernel::HttpResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

pub const MISSING_PROPERTIES_MESSAGE: &str = "Required properties not found in response";

/// Error object returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: i32,
    pub message: String,
}

/// Outcome of a single API call: a payload or the service's error, never both
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Error(ApiErrorBody),
}

impl<T> ApiResult<T> {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<T, AnyPayError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(ApiErrorBody { code, message }) => Err(AnyPayError::Api { code, message }),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

fn decode_failure(message: impl Into<String>) -> AnyPayError {
    AnyPayError::Decode {
        code: DECODE_FAILURE_CODE,
        message: message.into(),
    }
}

/// Decode a `{result?, error?}` envelope. The error object wins when both are present.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiResult<T>, AnyPayError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        trace!("Undecodable response body: {}", e);
        decode_failure(MISSING_PROPERTIES_MESSAGE)
    })?;

    if let Some(error) = envelope.error {
        return Ok(ApiResult::Error(error));
    }

    match envelope.result {
        None | Some(Value::Null) => Err(decode_failure(MISSING_PROPERTIES_MESSAGE)),
        Some(result) => serde_json::from_value(result)
            .map(ApiResult::Success)
            .map_err(|e| decode_failure(format!("{}: {}", MISSING_PROPERTIES_MESSAGE, e))),
    }
}

/// Classify a raw transport outcome.
///
/// Non-2xx statuses become [`AnyPayError::HttpStatus`] without looking at the body.
pub fn interpret<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, AnyPayError> {
    if !response.is_success() {
        warn!(status = response.status, "Non-success response status");
        return Err(AnyPayError::HttpStatus {
            code: i32::from(response.status),
            message: format!("Response error: {}", response.status),
        });
    }

    decode_envelope(&response.body)?.into_result()
}

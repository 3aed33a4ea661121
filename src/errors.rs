//! Error types for dynotable.
//!
//! Maps AWS SDK failures onto a small tagged enum. Uses typed `SdkError`
//! variant matching — no string parsing of debug output. The "resource not
//! found" case is its own variant because the lazy-provisioning retry and the
//! destroy success path match on it structurally.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// `init` was invoked with no schema available, neither as an argument
    /// nor via a prior `define`.
    #[error("missing schema definition for table '{table}'")]
    MissingSchema { table: String },

    /// The store reported that the table does not exist. Triggers the
    /// lazy-provisioning retry on data operations and the already-absent /
    /// confirmed-deleted paths on `destroy`.
    #[error("resource not found: {message}")]
    ResourceNotFound { message: String },

    /// Any other service error returned by the store, code preserved.
    #[error("store error [{}]: {message}", code.as_deref().unwrap_or("unknown"))]
    Store {
        code: Option<String>,
        message: String,
    },

    /// The request never produced a service response: dispatch failure,
    /// timeout, missing credentials, or a malformed response.
    #[error("connection failure: {message}")]
    Connection { message: String },

    /// A request could not be assembled locally before being sent.
    #[error("failed to build request: {0}")]
    BuildRequest(String),

    /// A value could not be converted to or from a DynamoDB attribute value.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Error::ResourceNotFound { .. })
    }
}

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `Some` for non-service errors, `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<Error>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let message = if dispatch.is_timeout() {
                "connection timed out; check your network or endpoint".to_string()
            } else if dispatch.is_io() {
                "connection failed (I/O error); check if the endpoint is reachable".to_string()
            } else {
                "connection failed; check if the endpoint is reachable".to_string()
            };
            Some(Error::Connection { message })
        }
        SdkError::TimeoutError(_) => Some(Error::Connection {
            message: "connection timed out; check your network or endpoint".to_string(),
        }),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials") || msg.contains("Credentials") {
                Some(Error::Connection {
                    message: "no AWS credentials found; configure credentials via environment \
                              variables, an AWS profile, or an IAM role"
                        .to_string(),
                })
            } else {
                Some(Error::BuildRequest(msg))
            }
        }
        SdkError::ResponseError(err) => Some(Error::Connection {
            message: format!("invalid response from store: {:?}", err),
        }),
        SdkError::ServiceError(_) => None,
        _ => Some(Error::Connection {
            message: format!("unknown error: {:?}", err),
        }),
    }
}

/// Map a DynamoDB `SdkError` to an [`Error`], using typed metadata for
/// service errors.
pub(crate) fn map_sdk_error<E, R>(err: SdkError<E, R>, table: &str) -> Error
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err) {
        return mapped;
    }

    // It's a ServiceError — use typed metadata
    if let Some(service_err) = err.as_service_error() {
        let meta = ProvideErrorMetadata::meta(service_err);
        let code = meta.code();
        let message = meta
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service_err.to_string());

        return match code {
            Some("ResourceNotFoundException") => Error::ResourceNotFound {
                message: format!("table '{}' not found", table),
            },
            code => Error::Store {
                code: code.map(str::to_string),
                message,
            },
        };
    }

    // Unreachable in practice; map_outer_sdk_error covers every non-service variant
    Error::Connection {
        message: format!("unexpected error: {:?}", err),
    }
}

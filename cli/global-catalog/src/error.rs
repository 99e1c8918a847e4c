//! Error handling for catalog API operations.

use global_catalog_api_v1::types::{self as api_types, error as api_error};
use global_catalog_api_v1::{Error as APIError, ResponseValue};
use reqwest::StatusCode;
use thiserror::Error;

/// Error body documented for the catalog API.
pub type ApiErrorResponse = api_types::ErrorResponse;
pub type ApiErrorResponseValue = ResponseValue<ApiErrorResponse>;

/// Common error type for catalog API operations.
///
/// Errors are never recovered from inside the client;
/// every variant is handed to the caller as is.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The request was rejected before it was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No response was obtained (connection, TLS, timeout).
    #[error("failed to reach the catalog service")]
    Transport(#[source] reqwest::Error),
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{}", fmt_api_error(.0))]
    APIError(APIError<ApiErrorResponse>),
    #[error("{}", .0)]
    Other(String),
}

impl CatalogClientError {
    /// HTTP status of the failed call, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CatalogClientError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            CatalogClientError::APIError(err) => err.status(),
            _ => None,
        }
    }
}

/// Missing or malformed input, detected locally.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("invalid catalog entry id '{id}'")]
    InvalidId {
        id: String,
        #[source]
        source: api_error::ConversionError,
    },
    #[error("invalid artifact name '{0}'")]
    InvalidArtifactName(String),
}

/// Extension trait for converting API errors into client errors.
pub trait MapApiErrorExt<T> {
    /// Consumes a `Result<T, APIError<ApiErrorResponse>>`, maps any APIError
    /// into `CatalogClientError`, and returns `Ok(T)` or `Err(...)`.
    fn map_api_error(
        self,
    ) -> impl std::future::Future<Output = Result<T, CatalogClientError>> + Send;
}

impl<T: Send> MapApiErrorExt<T> for Result<T, APIError<ApiErrorResponse>> {
    async fn map_api_error(self) -> Result<T, CatalogClientError> {
        let err = match self {
            Ok(v) => return Ok(v),
            Err(err) => err,
        };

        match err {
            APIError::CommunicationError(source) => Err(CatalogClientError::Transport(source)),
            // Attempt to parse errors with a status the client does not
            // expect but that still carry an error body.
            APIError::UnexpectedResponse(resp) => parse_api_error(resp).await,
            err => Err(CatalogClientError::APIError(err)),
        }
    }
}

/// Turn a 404 into [CatalogClientError::NotFound] for the named resource.
pub(crate) fn not_found_as(
    resource: impl Into<String>,
) -> impl FnOnce(CatalogClientError) -> CatalogClientError {
    move |err| match err {
        CatalogClientError::APIError(ref api_err)
            if api_err.status() == Some(StatusCode::NOT_FOUND) =>
        {
            CatalogClientError::NotFound {
                resource: resource.into(),
            }
        },
        other => other,
    }
}

async fn parse_api_error<T>(resp: reqwest::Response) -> Result<T, CatalogClientError> {
    let status = resp.status();
    match ApiErrorResponseValue::from_response::<ApiErrorResponse>(resp).await {
        Ok(resp_parsed) => Err(CatalogClientError::APIError(APIError::ErrorResponse(
            resp_parsed,
        ))),
        Err(_) => {
            // We couldn't parse but consumed the response body, which we don't
            // format anyway because it may contain HTML garbage, so recreate a
            // response with the right status.
            let resp_bare = http::Response::builder()
                .status(status)
                .body("response body omitted by error parsing")
                .map_err(|e| CatalogClientError::Other(e.to_string()))?
                .into();
            Err(CatalogClientError::APIError(APIError::UnexpectedResponse(
                resp_bare,
            )))
        },
    }
}

fn fmt_api_error(api_error: &APIError<ApiErrorResponse>) -> String {
    match api_error {
        APIError::ErrorResponse(error_response) => {
            let status = error_response.status();
            match error_response.message() {
                Some(message) => format!("{status}: {message}"),
                None => format!("{status}"),
            }
        },
        APIError::UnexpectedResponse(resp) => {
            let status = resp.status();
            format!("{status}")
        },
        _ => format!("{api_error}"),
    }
}

//! Transport-level error types.
//!
//! These describe failures of the HTTP round trip itself. A GraphQL response
//! that carries an `errors` array still arrives with status 200 and is *not*
//! an [`HttpError`]; it is handed back as a normal
//! [`GraphqlResponse`](crate::clients::GraphqlResponse).
//!
//! - [`HttpResponseError`]: non-2xx response from the storefront
//! - [`MaxHttpRetriesExceededError`]: 429/500 retries exhausted
//! - [`HttpError`]: unified transport error

use thiserror::Error;

/// Error returned when the storefront answers with a non-2xx status.
///
/// ```rust
/// use storefront_gateway::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: r#"{"errors":"Not Found"}"#.to_string(),
///     error_reference: Some("req-1".to_string()),
/// };
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, Error)]
#[error("Storefront responded with status {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error body, as JSON text.
    pub message: String,
    /// Value of the `X-Request-Id` response header, if present.
    pub error_reference: Option<String>,
}

/// Error returned when HTTP-level retries for 429/500 are exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Serialized error body of the last response.
    pub message: String,
    /// Value of the `X-Request-Id` response header, if present.
    pub error_reference: Option<String>,
}

/// Unified transport error.
///
/// ```rust,ignore
/// match transport.execute(&query).await {
///     Ok(response) => { /* inspect response.data() / response.errors() */ }
///     Err(HttpError::Network(e)) => { /* device offline, DNS, TLS ... */ }
///     Err(e) => { /* storefront rejected the request */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// HTTP retries exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// The response body was not a GraphQL envelope.
    #[error("Malformed storefront response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns `true` when the storefront was never reached.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

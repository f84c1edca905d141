//! Errors returned by [`Api`](crate::Api) operations.
//!
//! Every operation resolves to exactly one of a value or an [`ApiError`].
//! The variants group failures by what a UI can do about them:
//!
//! | Variant | Meaning | Typical reaction |
//! |---|---|---|
//! | [`ApiError::Unauthorized`] | no valid session | send the user to sign-in |
//! | [`ApiError::NonCritical`] | business rule rejected the request | show the message |
//! | [`ApiError::Content`] | network failure or missing payload | offer a retry |
//! | [`ApiError::Critical`] | the backend broke a structural promise | report a bug |

use thiserror::Error;

use crate::clients::{GraphqlResponse, HttpError};

/// Display text of [`ApiError::Unauthorized`].
pub const UNAUTHORIZED_ERROR: &str = "Unauthorized";

/// Error returned by gateway operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No valid customer session exists.
    ///
    /// Returned before any network call is made.
    #[error("Unauthorized")]
    Unauthorized,

    /// The storefront rejected the request with a message meant for the user,
    /// e.g. wrong credentials or an invalid address.
    #[error("{message}")]
    NonCritical {
        /// The first server message, verbatim.
        message: String,
    },

    /// The request failed or came back without the expected payload.
    #[error("Content unavailable (network error: {is_network_error})")]
    Content {
        /// Whether the failure happened below HTTP (DNS, TLS, connection).
        is_network_error: bool,
    },

    /// The payload contradicted the shape the gateway relies on.
    #[error("Unexpected storefront response: {message}")]
    Critical {
        /// What was wrong with the payload.
        message: String,
    },
}

/// Coarse grouping of [`ApiError`] for callers that only branch on severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// User-facing, recoverable by the user.
    NonCritical,
    /// Transient or content-level failure.
    Content,
    /// Structural failure.
    Critical,
}

impl ApiError {
    /// Creates a [`ApiError::NonCritical`] error.
    #[must_use]
    pub fn non_critical(message: impl Into<String>) -> Self {
        Self::NonCritical {
            message: message.into(),
        }
    }

    /// Creates a non-network [`ApiError::Content`] error.
    #[must_use]
    pub const fn content() -> Self {
        Self::Content {
            is_network_error: false,
        }
    }

    /// Creates a [`ApiError::Critical`] error.
    #[must_use]
    pub fn critical(message: impl Into<String>) -> Self {
        Self::Critical {
            message: message.into(),
        }
    }

    /// Returns the severity group of this error.
    ///
    /// [`ApiError::Unauthorized`] is non-critical.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::NonCritical { .. } => ErrorKind::NonCritical,
            Self::Content { .. } => ErrorKind::Content,
            Self::Critical { .. } => ErrorKind::Critical,
        }
    }

    /// Returns `true` if the caller has to sign in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` for content errors caused by the network.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Content {
                is_network_error: true
            }
        )
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        tracing::debug!(error = %err, "Storefront round trip failed");
        Self::Content {
            is_network_error: err.is_network(),
        }
    }
}

/// Applies the envelope-level checks shared by every operation.
///
/// Returns the `data` object once the response carries no GraphQL errors and
/// a non-null payload.
///
/// # Errors
///
/// - [`ApiError::NonCritical`] with the first GraphQL error message
/// - [`ApiError::Content`] if `data` is null or absent
pub fn classify(response: &GraphqlResponse) -> Result<&serde_json::Value, ApiError> {
    if let Some(first) = response.first_error() {
        return Err(ApiError::non_critical(first));
    }
    response
        .data()
        .filter(|data| !data.is_null())
        .ok_or_else(ApiError::content)
}

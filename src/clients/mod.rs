//! Backend client layer.
//!
//! # Overview
//!
//! - [`GraphqlQuery`] / [`GraphqlResponse`]: plain-data request and envelope
//! - [`Transport`]: the `execute(query) -> response | transport error` seam
//! - [`StorefrontClient`]: the HTTP implementation of [`Transport`]
//! - [`HttpError`]: transport failures (network, non-2xx, retries exhausted)
//!
//! # Retry Behavior
//!
//! Two retry layers exist and must not be confused:
//!
//! - **HTTP retries** inside [`StorefrontClient`]: 429 (honouring
//!   `Retry-After`) and 500 are re-sent up to
//!   [`GatewayConfig::http_tries`](crate::GatewayConfig::http_tries) times.
//!   The default of 1 disables them.
//! - **Polling** in [`crate::polling`]: a *successful* response whose payload
//!   says "not ready yet" is re-queried on a fixed interval. A transport
//!   error ends polling immediately.

mod errors;
mod query;
pub mod storefront;
mod transport;

pub use errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
pub use query::{GraphqlErrorMessage, GraphqlQuery, GraphqlResponse};
pub use storefront::{StorefrontClient, StorefrontToken, SDK_VERSION};
pub use transport::Transport;

//! The seam between the gateway and whatever executes GraphQL documents.

use crate::clients::{GraphqlQuery, GraphqlResponse, HttpError};

/// Executes GraphQL documents against the storefront.
///
/// There are exactly two outcomes per call: a [`GraphqlResponse`] (which may
/// itself carry GraphQL `errors` or a not-yet-ready payload), or an
/// [`HttpError`] when the round trip failed. The polling retrier and the
/// session manager rely on this split: responses are inspected, transport
/// errors end the operation.
///
/// [`StorefrontClient`](crate::StorefrontClient) is the production
/// implementation; tests substitute scripted doubles.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Sends `query` once and returns the decoded envelope.
    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError>;
}

impl<T: Transport> Transport for &T {
    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError> {
        (**self).execute(query).await
    }
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError> {
        (**self).execute(query).await
    }
}

//! Polling for eventually-consistent storefront state.
//!
//! Some storefront computations finish after the request that started them:
//! shipping rates are calculated in the background, and a paid checkout turns
//! into an order a moment later. [`poll`] re-issues the same read-only query
//! until a [`RetryPolicy`] predicate reports the payload is ready, or the
//! attempt budget runs out.
//!
//! # Semantics
//!
//! - Attempt 1 is sent immediately.
//! - A transport error ends the sequence at once with that error.
//! - A response for which the predicate returns `false` is returned.
//! - A response for which the predicate returns `true` is retried after the
//!   policy interval, unless this was the last allowed attempt; then it is
//!   returned as-is. There is no dedicated timeout error: callers read the
//!   still-not-ready payload and classify it themselves.
//! - Attempts never overlap, and there is no cancellation or deadline. The
//!   worst case is `interval * max_attempts` plus request time.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use storefront_gateway::polling::{poll, RetryPolicy};
//!
//! let policy = RetryPolicy::new(Duration::from_millis(500), 10, |response| {
//!     response.pointer("/node/order").is_none()
//! })?;
//! let response = poll(&client, &query, &policy).await?;
//! ```

use std::fmt;
use std::time::Duration;

use crate::clients::{GraphqlQuery, GraphqlResponse, HttpError, Transport};
use crate::error::ConfigError;

/// How long and how often to poll.
///
/// The predicate answers "still waiting?": `true` retries, `false` accepts
/// the response.
pub struct RetryPolicy<P> {
    interval: Duration,
    max_attempts: u32,
    still_waiting: P,
}

impl<P> RetryPolicy<P>
where
    P: Fn(&GraphqlResponse) -> bool,
{
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPollAttempts`] when `max_attempts` is 0.
    pub fn new(
        interval: Duration,
        max_attempts: u32,
        still_waiting: P,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidPollAttempts { attempts: 0 });
        }
        Ok(Self {
            interval,
            max_attempts,
            still_waiting,
        })
    }

    /// Returns the delay between two attempts.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Evaluates the predicate against `response`.
    #[must_use]
    pub fn is_still_waiting(&self, response: &GraphqlResponse) -> bool {
        (self.still_waiting)(response)
    }
}

impl<P> fmt::Debug for RetryPolicy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("interval", &self.interval)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Executes `query` until `policy` is satisfied or its budget is spent.
///
/// Returns the first response the predicate accepts, or the last response
/// received once `max_attempts` round trips have been made.
///
/// # Errors
///
/// Returns the [`HttpError`] of the first attempt whose round trip failed.
/// No further attempts are made after a transport error.
pub async fn poll<T, P>(
    transport: &T,
    query: &GraphqlQuery,
    policy: &RetryPolicy<P>,
) -> Result<GraphqlResponse, HttpError>
where
    T: Transport,
    P: Fn(&GraphqlResponse) -> bool,
{
    let mut attempt: u32 = 1;

    loop {
        let response = transport.execute(query).await?;

        if !policy.is_still_waiting(&response) {
            tracing::debug!(attempt, "Polled resource is ready");
            return Ok(response);
        }

        if attempt >= policy.max_attempts {
            tracing::warn!(
                attempts = attempt,
                "Polled resource still not ready, returning last response"
            );
            return Ok(response);
        }

        tracing::debug!(
            attempt,
            max_attempts = policy.max_attempts,
            "Polled resource not ready yet"
        );
        attempt += 1;
        tokio::time::sleep(policy.interval).await;
    }
}

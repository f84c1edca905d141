//! The app-facing storefront API.
//!
//! [`Api`] composes a [`Transport`], a [`SessionManager`] and the
//! [`polling`](crate::polling) retrier into one operation per user action.
//! Every operation returns exactly one `Result`.
//!
//! # Session Requirements
//!
//! Customer operations (`get_customer`, address book, profile edits, order
//! history) require a valid session. Without one they fail with
//! [`ApiError::Unauthorized`] before any request is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_gateway::{Api, GatewayConfig, MemoryStore, ShopDomain, StorefrontToken};
//!
//! let config = GatewayConfig::builder()
//!     .shop(ShopDomain::new("my-store")?)
//!     .storefront_token(StorefrontToken::public("public-token")?)
//!     .build()?;
//!
//! let api = Api::from_config(&config, MemoryStore::new())?;
//! api.sign_in("jane@example.com", "secret").await?;
//! let customer = api.get_customer().await?;
//! println!("Hello {}", customer.email);
//! ```

mod account;
mod checkout;
mod customer;
pub(crate) mod error;
pub mod models;
pub(crate) mod queries;
pub(crate) mod wire;

use std::time::Duration;

use crate::auth::{KeyValueStore, SessionManager};
use crate::clients::{GraphqlQuery, GraphqlResponse, HttpError, StorefrontClient, Transport};
use crate::config::{GatewayConfig, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_ATTEMPTS};
use crate::polling::{poll, RetryPolicy};

pub use error::{ApiError, ErrorKind, UNAUTHORIZED_ERROR};
pub use models::{
    Address, AddressInput, CardCheckout, CartItem, Checkout, Customer, Money, Order, OrderItem,
    ShippingRate, SignUp,
};

/// Storefront operations for a single customer.
///
/// `T` carries requests, `S` persists the customer session.
///
/// # Thread Safety
///
/// `Api` is `Send + Sync` whenever `T` and `S` are, so it can be shared
/// behind an `Arc` across tasks.
#[derive(Debug)]
pub struct Api<T, S> {
    transport: T,
    sessions: SessionManager<S>,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

impl<S: KeyValueStore> Api<StorefrontClient, S> {
    /// Creates an API backed by a [`StorefrontClient`] for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn from_config(config: &GatewayConfig, store: S) -> Result<Self, HttpError> {
        Ok(Self::with_config(StorefrontClient::new(config)?, store, config))
    }
}

impl<T: Transport, S: KeyValueStore> Api<T, S> {
    /// Creates an API with the default polling cadence.
    pub const fn new(transport: T, store: S) -> Self {
        Self {
            transport,
            sessions: SessionManager::new(store),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }

    /// Creates an API using the polling settings of `config`.
    pub fn with_config(transport: T, store: S, config: &GatewayConfig) -> Self {
        Self {
            transport,
            sessions: SessionManager::new(store),
            poll_interval: config.poll_interval(),
            poll_max_attempts: config.poll_max_attempts(),
        }
    }

    /// Returns the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the session manager.
    pub const fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, ApiError> {
        Ok(self.transport.execute(query).await?)
    }

    async fn poll_while<P>(
        &self,
        query: &GraphqlQuery,
        still_waiting: P,
    ) -> Result<GraphqlResponse, ApiError>
    where
        P: Fn(&GraphqlResponse) -> bool,
    {
        let policy = RetryPolicy::new(self.poll_interval, self.poll_max_attempts, still_waiting)
            .map_err(|err| ApiError::critical(err.to_string()))?;
        Ok(poll(&self.transport, query, &policy).await?)
    }
}

// Verify Api is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Api<StorefrontClient, crate::auth::MemoryStore>>();
};

//! # Storefront Gateway
//!
//! An async client for a storefront's GraphQL API, exposing customer
//! authentication, profile and address book management, order history and
//! the checkout flow from cart to paid order behind one [`Api`] type.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GatewayConfig`] and [`GatewayConfigBuilder`]
//! - A reqwest-based [`StorefrontClient`] behind the [`Transport`] seam
//! - A polling retrier for eventually-consistent storefront state via [`polling`]
//! - Customer session lifecycle (sign-in, lazy expiry, sign-out, self-healing
//!   invalidation) via [`SessionManager`]
//! - Pluggable session persistence via [`KeyValueStore`]
//!
//! ## Quick Start
//!
//! ```rust
//! use storefront_gateway::{ApiVersion, GatewayConfig, ShopDomain, StorefrontToken};
//!
//! let config = GatewayConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .storefront_token(StorefrontToken::public("public-access-token").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.shop().as_ref(), "my-store.myshopify.com");
//! ```
//!
//! ## Signing In
//!
//! ```rust,ignore
//! use storefront_gateway::{Api, FileStore, GatewayConfig};
//!
//! let api = Api::from_config(&config, FileStore::open("session.json")?)?;
//!
//! api.sign_in("jane@example.com", "secret").await?;
//! assert!(api.is_signed_in());
//!
//! let customer = api.get_customer().await?;
//! let orders = api.get_orders(10, None).await?;
//! ```
//!
//! ## Waiting on the Storefront
//!
//! Shipping rates and orders are produced asynchronously. The API polls for
//! them on the configured cadence (500 ms, 10 attempts by default):
//!
//! ```rust,ignore
//! use storefront_gateway::CartItem;
//!
//! let checkout = api.create_checkout(&[CartItem::new(variant_id, 1)]).await?;
//! api.set_shipping_address(&checkout.id, &address).await?;
//!
//! let rates = api.get_shipping_rates(&checkout.id).await?;
//! api.select_shipping_rate(&checkout.id, &rates[0]).await?;
//!
//! let order = api.complete_checkout_by_card(&card_checkout).await?;
//! ```
//!
//! ## Error Handling
//!
//! Configuration is validated up front and reports [`ConfigError`].
//! Operations return [`ApiError`], whose variants tell a UI whether to ask
//! for sign-in, show a message, or offer a retry.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber.
//!
//! ## Thread Safety
//!
//! All public types are `Send + Sync` where their type parameters are.

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod polling;

// Re-export public types at crate root for convenience
pub use api::{
    Address, AddressInput, Api, ApiError, CardCheckout, CartItem, Checkout, Customer, ErrorKind,
    Money, Order, OrderItem, ShippingRate, SignUp,
};
pub use auth::{
    Credentials, FileStore, KeyValueStore, MemoryStore, Session, SessionManager, SessionState,
    StoreError,
};
pub use config::{ApiVersion, GatewayConfig, GatewayConfigBuilder, HostUrl, ShopDomain};
pub use error::ConfigError;
pub use polling::{poll, RetryPolicy};

// Re-export client types
pub use clients::{
    GraphqlQuery, GraphqlResponse, HttpError, HttpResponseError, MaxHttpRetriesExceededError,
    StorefrontClient, StorefrontToken, Transport,
};

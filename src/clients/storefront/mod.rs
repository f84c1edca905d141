//! Storefront API transport.
//!
//! - [`StorefrontClient`]: reqwest-backed [`Transport`](crate::clients::Transport)
//! - [`StorefrontToken`]: public or private storefront access token
//!
//! The Storefront API differs from the Admin API in its endpoint
//! (`/api/{version}/graphql.json`, no `/admin` prefix) and in its token
//! headers. Tokenless access is allowed for public catalogue data.

mod client;
mod storefront_http;
mod token;

pub use client::StorefrontClient;
pub use storefront_http::SDK_VERSION;
pub use token::{StorefrontToken, PRIVATE_HEADER_NAME, PUBLIC_HEADER_NAME};

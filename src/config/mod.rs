//! Configuration types for the storefront gateway.
//!
//! # Overview
//!
//! - [`GatewayConfig`]: immutable settings shared by the HTTP client and the
//!   polling call sites
//! - [`GatewayConfigBuilder`]: fluent construction with validation
//! - [`ShopDomain`], [`HostUrl`]: validated newtypes
//! - [`ApiVersion`]: the Storefront API release to target
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use storefront_gateway::{GatewayConfig, ShopDomain, StorefrontToken};
//!
//! let config = GatewayConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .storefront_token(StorefrontToken::public("public-token").unwrap())
//!     .poll_interval(Duration::from_millis(250))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.poll_max_attempts(), 10);
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::clients::StorefrontToken;
use crate::error::ConfigError;

/// Default delay between two polls of an eventually-consistent resource.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of polls before the last response is handed back as-is.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 10;

/// Configuration for the storefront gateway.
///
/// # Thread Safety
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    shop: ShopDomain,
    storefront_token: Option<StorefrontToken>,
    api_version: ApiVersion,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    poll_interval: Duration,
    poll_max_attempts: u32,
    http_tries: u32,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Returns the storefront domain.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the storefront access token, if any.
    #[must_use]
    pub const fn storefront_token(&self) -> Option<&StorefrontToken> {
        self.storefront_token.as_ref()
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the proxy host, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the delay between two polling attempts.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the polling attempt budget (always at least 1).
    #[must_use]
    pub const fn poll_max_attempts(&self) -> u32 {
        self.poll_max_attempts
    }

    /// Returns how many times a single HTTP request is tried on 429/500.
    #[must_use]
    pub const fn http_tries(&self) -> u32 {
        self.http_tries
    }
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

/// Builder for constructing [`GatewayConfig`] instances.
///
/// `shop` is required. Defaults:
///
/// - `api_version`: [`ApiVersion::latest`]
/// - `storefront_token`, `api_host`, `user_agent_prefix`: `None`
/// - `poll_interval`: 500 ms
/// - `poll_max_attempts`: 10
/// - `http_tries`: 1 (no HTTP-level retries)
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    shop: Option<ShopDomain>,
    storefront_token: Option<StorefrontToken>,
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    poll_interval: Option<Duration>,
    poll_max_attempts: Option<u32>,
    http_tries: Option<u32>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storefront domain (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the storefront access token.
    #[must_use]
    pub fn storefront_token(mut self, token: StorefrontToken) -> Self {
        self.storefront_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes requests through a proxy host.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the delay between polling attempts.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets the polling attempt budget.
    #[must_use]
    pub const fn poll_max_attempts(mut self, attempts: u32) -> Self {
        self.poll_max_attempts = Some(attempts);
        self
    }

    /// Sets how many times one HTTP request is tried on 429/500 responses.
    #[must_use]
    pub const fn http_tries(mut self, tries: u32) -> Self {
        self.http_tries = Some(tries);
        self
    }

    /// Builds the [`GatewayConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `shop` is not set
    /// - [`ConfigError::InvalidPollAttempts`] if `poll_max_attempts` is 0
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let shop = self
            .shop
            .ok_or(ConfigError::MissingRequiredField { field: "shop" })?;

        let poll_max_attempts = self.poll_max_attempts.unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS);
        if poll_max_attempts == 0 {
            return Err(ConfigError::InvalidPollAttempts { attempts: 0 });
        }

        Ok(GatewayConfig {
            shop,
            storefront_token: self.storefront_token,
            api_version: self.api_version.unwrap_or_default(),
            api_host: self.api_host,
            user_agent_prefix: self.user_agent_prefix,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            poll_max_attempts,
            http_tries: self.http_tries.unwrap_or(1).max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ShopDomain {
        ShopDomain::new("test-shop").unwrap()
    }

    #[test]
    fn test_builder_requires_shop() {
        let result = GatewayConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "shop" })
        ));
    }

    #[test]
    fn test_builder_provides_defaults() {
        let config = GatewayConfig::builder().shop(shop()).build().unwrap();

        assert_eq!(config.api_version(), ApiVersion::latest());
        assert!(config.storefront_token().is_none());
        assert!(config.api_host().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.poll_max_attempts(), 10);
        assert_eq!(config.http_tries(), 1);
    }

    #[test]
    fn test_builder_rejects_zero_poll_attempts() {
        let result = GatewayConfig::builder()
            .shop(shop())
            .poll_max_attempts(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPollAttempts { attempts: 0 })
        ));
    }

    #[test]
    fn test_builder_clamps_http_tries_to_one() {
        let config = GatewayConfig::builder()
            .shop(shop())
            .http_tries(0)
            .build()
            .unwrap();
        assert_eq!(config.http_tries(), 1);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let host = HostUrl::new("https://proxy.example.com").unwrap();
        let config = GatewayConfig::builder()
            .shop(shop())
            .storefront_token(StorefrontToken::private("secret").unwrap())
            .api_version(ApiVersion::Unstable)
            .api_host(host.clone())
            .user_agent_prefix("MyApp/1.0")
            .poll_interval(Duration::from_millis(20))
            .poll_max_attempts(3)
            .http_tries(2)
            .build()
            .unwrap();

        assert_eq!(config.api_version(), ApiVersion::Unstable);
        assert_eq!(config.api_host(), Some(&host));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert_eq!(config.poll_interval(), Duration::from_millis(20));
        assert_eq!(config.poll_max_attempts(), 3);
        assert_eq!(config.http_tries(), 2);
        assert!(config.storefront_token().is_some());
    }

    #[test]
    fn test_config_debug_does_not_leak_token() {
        let config = GatewayConfig::builder()
            .shop(shop())
            .storefront_token(StorefrontToken::public("very-secret-token").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("GatewayConfig"));
        assert!(!debug_str.contains("very-secret-token"));
    }
}

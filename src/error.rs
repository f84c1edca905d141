//! Configuration error types for the storefront gateway.
//!
//! Every validated newtype and the [`GatewayConfig`](crate::GatewayConfig)
//! builder report failures through [`ConfigError`], so a misconfigured gateway
//! is rejected before any request leaves the process.
//!
//! # Example
//!
//! ```rust
//! use storefront_gateway::{ConfigError, ShopDomain};
//!
//! let result = ShopDomain::new("not a shop");
//! assert!(matches!(result, Err(ConfigError::InvalidShopDomain { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Storefront access token cannot be empty.
    #[error("Storefront access token cannot be empty. Omit the token for tokenless access instead.")]
    EmptyStorefrontToken,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2024-04') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A polling policy must allow at least one attempt.
    #[error("Invalid poll attempt budget {attempts}. At least one attempt is required.")]
    InvalidPollAttempts {
        /// The rejected attempt count.
        attempts: u32,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_shop_domain_error_message() {
        let error = ConfigError::InvalidShopDomain {
            domain: "bad domain!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad domain!"));
        assert!(message.contains("Expected format"));
    }

    #[test]
    fn test_invalid_poll_attempts_mentions_budget() {
        let message = ConfigError::InvalidPollAttempts { attempts: 0 }.to_string();
        assert!(message.contains('0'));
        assert!(message.contains("At least one attempt"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "shop" };
        let message = error.to_string();
        assert!(message.contains("shop"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyStorefrontToken;
        let _: &dyn std::error::Error = &error;
    }
}

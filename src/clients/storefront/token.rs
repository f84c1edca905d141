//! Storefront API access tokens.
//!
//! Public tokens are meant for client devices and travel in
//! `X-Shopify-Storefront-Access-Token`; private tokens stay on servers and
//! travel in `Shopify-Storefront-Private-Token`.
//!
//! # Security
//!
//! [`StorefrontToken`] masks its value in `Debug` output.
//!
//! ```rust
//! use storefront_gateway::StorefrontToken;
//!
//! let token = StorefrontToken::public("public-access-token").unwrap();
//! assert_eq!(token.header(), ("X-Shopify-Storefront-Access-Token", "public-access-token"));
//! assert_eq!(format!("{token:?}"), "StorefrontToken::Public(*****)");
//! ```

use std::fmt;

use crate::error::ConfigError;

/// HTTP header name for public storefront access tokens.
pub const PUBLIC_HEADER_NAME: &str = "X-Shopify-Storefront-Access-Token";

/// HTTP header name for private storefront access tokens.
pub const PRIVATE_HEADER_NAME: &str = "Shopify-Storefront-Private-Token";

/// A Storefront API access token.
#[derive(Clone, PartialEq, Eq)]
pub enum StorefrontToken {
    /// Public token, safe to ship inside an app.
    Public(String),
    /// Private token, for server-side callers.
    Private(String),
}

impl StorefrontToken {
    /// Creates a public token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyStorefrontToken`] for a blank value.
    pub fn public(value: impl Into<String>) -> Result<Self, ConfigError> {
        Self::checked(value.into()).map(Self::Public)
    }

    /// Creates a private token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyStorefrontToken`] for a blank value.
    pub fn private(value: impl Into<String>) -> Result<Self, ConfigError> {
        Self::checked(value.into()).map(Self::Private)
    }

    fn checked(value: String) -> Result<String, ConfigError> {
        if value.trim().is_empty() {
            Err(ConfigError::EmptyStorefrontToken)
        } else {
            Ok(value)
        }
    }

    /// Returns the `(header name, header value)` pair for this token.
    #[must_use]
    pub fn header(&self) -> (&'static str, &str) {
        match self {
            Self::Public(value) => (PUBLIC_HEADER_NAME, value),
            Self::Private(value) => (PRIVATE_HEADER_NAME, value),
        }
    }
}

impl fmt::Debug for StorefrontToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public(_) => f.write_str("StorefrontToken::Public(*****)"),
            Self::Private(_) => f.write_str("StorefrontToken::Private(*****)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_token_header() {
        let token = StorefrontToken::public("abc").unwrap();
        assert_eq!(token.header(), (PUBLIC_HEADER_NAME, "abc"));
    }

    #[test]
    fn test_private_token_header() {
        let token = StorefrontToken::private("xyz").unwrap();
        assert_eq!(token.header(), (PRIVATE_HEADER_NAME, "xyz"));
    }

    #[test]
    fn test_blank_tokens_are_rejected() {
        assert_eq!(
            StorefrontToken::public("   "),
            Err(ConfigError::EmptyStorefrontToken)
        );
        assert_eq!(
            StorefrontToken::private(""),
            Err(ConfigError::EmptyStorefrontToken)
        );
    }

    #[test]
    fn test_debug_masks_both_variants() {
        let public = StorefrontToken::public("super-secret").unwrap();
        let private = StorefrontToken::private("super-secret").unwrap();

        assert_eq!(format!("{public:?}"), "StorefrontToken::Public(*****)");
        assert_eq!(format!("{private:?}"), "StorefrontToken::Private(*****)");
    }
}

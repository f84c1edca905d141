//! Validated newtype wrappers for configuration values.
//!
//! Values are checked once, on construction, so the rest of the gateway can
//! treat them as well-formed.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A validated storefront domain.
///
/// Storefronts are reachable either through their `*.myshopify.com` domain or
/// through a custom domain attached to the shop. Both are accepted; a bare
/// shop handle is expanded to its `myshopify.com` form. A leading `https://`
/// and trailing slashes are stripped.
///
/// # Example
///
/// ```rust
/// use storefront_gateway::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), Some("my-store"));
///
/// let custom = ShopDomain::new("https://shop.example.com/").unwrap();
/// assert_eq!(custom.as_ref(), "shop.example.com");
/// assert_eq!(custom.shop_name(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopDomain {
    host: String,
    myshopify: bool,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = domain.into();
        let trimmed = raw.trim().to_lowercase();
        let host = trimmed
            .strip_prefix("https://")
            .unwrap_or(&trimmed)
            .trim_end_matches('/')
            .to_string();

        let invalid = || ConfigError::InvalidShopDomain { domain: raw.clone() };

        if host.is_empty() {
            return Err(invalid());
        }

        if let Some(shop_name) = host.strip_suffix(Self::SUFFIX) {
            if !Self::is_valid_label(shop_name) {
                return Err(invalid());
            }
            return Ok(Self {
                host,
                myshopify: true,
            });
        }

        if !host.contains('.') {
            if !Self::is_valid_label(&host) {
                return Err(invalid());
            }
            return Ok(Self {
                host: format!("{host}{}", Self::SUFFIX),
                myshopify: true,
            });
        }

        // Custom domain: every dot-separated label must be a valid DNS label.
        if host.split('.').all(Self::is_valid_label) {
            Ok(Self {
                host,
                myshopify: false,
            })
        } else {
            Err(invalid())
        }
    }

    /// Returns the shop handle for `myshopify.com` domains.
    ///
    /// Custom domains carry no handle and return `None`.
    #[must_use]
    pub fn shop_name(&self) -> Option<&str> {
        if self.myshopify {
            self.host.strip_suffix(Self::SUFFIX)
        } else {
            None
        }
    }

    /// Returns `true` when this is a custom (non-`myshopify.com`) domain.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        !self.myshopify
    }

    fn is_valid_label(label: &str) -> bool {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.host
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.host)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated proxy host URL.
///
/// When set on the configuration, requests are sent to this host instead of
/// the shop domain, with the shop domain passed in the `Host` header.
///
/// # Example
///
/// ```rust
/// use storefront_gateway::HostUrl;
///
/// let url = HostUrl::new("http://localhost:8080/proxy").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.authority(), "localhost:8080");
/// assert_eq!(url.origin(), "http://localhost:8080");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme: String,
    authority: String,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no alphabetic
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        let invalid = || ConfigError::InvalidHostUrl { url: url.clone() };

        let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let authority = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string();
        let host = authority.split(':').next().unwrap_or_default();
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            scheme: scheme.to_lowercase(),
            authority,
            url,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns `host[:port]`.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns `scheme://host[:port]`, the base every request URL is built on.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

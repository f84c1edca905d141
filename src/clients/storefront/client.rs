//! Storefront GraphQL client.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_gateway::{GatewayConfig, ShopDomain, StorefrontClient, StorefrontToken};
//! use storefront_gateway::clients::{GraphqlQuery, Transport};
//!
//! let config = GatewayConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .storefront_token(StorefrontToken::public("public-access-token").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = StorefrontClient::new(&config)?;
//! let response = client.execute(&GraphqlQuery::new("{ shop { name } }")).await?;
//! println!("Shop: {}", response.data().unwrap()["shop"]["name"]);
//! ```

use std::collections::HashMap;

use crate::clients::storefront::storefront_http::StorefrontHttpClient;
use crate::clients::{GraphqlQuery, GraphqlResponse, HttpError, Transport};
use crate::config::{ApiVersion, GatewayConfig};

/// GraphQL client for the Storefront API.
///
/// # Thread Safety
///
/// `StorefrontClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Endpoint Format
///
/// `https://{shop}/api/{version}/graphql.json`, or the same path on the
/// configured proxy host.
///
/// # Authentication
///
/// - **Public token**: `X-Shopify-Storefront-Access-Token`
/// - **Private token**: `Shopify-Storefront-Private-Token`
/// - **Tokenless**: no authentication header
#[derive(Debug)]
pub struct StorefrontClient {
    http_client: StorefrontHttpClient,
    api_version: ApiVersion,
}

// Verify StorefrontClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StorefrontClient>();
};

impl StorefrontClient {
    /// Creates a client for the storefront described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created
    /// (TLS initialisation failure).
    pub fn new(config: &GatewayConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http_client: StorefrontHttpClient::new(config)?,
            api_version: config.api_version(),
        })
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the full GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.http_client.endpoint()
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        self.http_client.default_headers()
    }
}

impl Transport for StorefrontClient {
    /// Posts the query and decodes the GraphQL envelope.
    ///
    /// GraphQL-level errors arrive with HTTP 200 and are returned inside the
    /// response; only failed round trips become [`HttpError`].
    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError> {
        self.http_client.request(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::StorefrontToken;
    use crate::config::{HostUrl, ShopDomain};

    fn config_builder() -> crate::config::GatewayConfigBuilder {
        GatewayConfig::builder().shop(ShopDomain::new("test-shop").unwrap())
    }

    #[test]
    fn test_endpoint_uses_shop_and_version() {
        let config = config_builder().build().unwrap();
        let client = StorefrontClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint(),
            "https://test-shop.myshopify.com/api/2024-04/graphql.json"
        );
        assert_eq!(client.api_version(), ApiVersion::latest());
    }

    #[test]
    fn test_endpoint_uses_proxy_host_and_sets_host_header() {
        let config = config_builder()
            .api_host(HostUrl::new("http://127.0.0.1:9000").unwrap())
            .api_version(ApiVersion::Unstable)
            .build()
            .unwrap();
        let client = StorefrontClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9000/api/unstable/graphql.json"
        );
        assert_eq!(
            client.default_headers().get("Host"),
            Some(&"test-shop.myshopify.com".to_string())
        );
    }

    #[test]
    fn test_public_token_header_is_injected() {
        let config = config_builder()
            .storefront_token(StorefrontToken::public("pub-token").unwrap())
            .build()
            .unwrap();
        let client = StorefrontClient::new(&config).unwrap();

        assert_eq!(
            client
                .default_headers()
                .get("X-Shopify-Storefront-Access-Token"),
            Some(&"pub-token".to_string())
        );
        assert!(client
            .default_headers()
            .get("Shopify-Storefront-Private-Token")
            .is_none());
    }

    #[test]
    fn test_tokenless_client_sends_no_token_header() {
        let config = config_builder().build().unwrap();
        let client = StorefrontClient::new(&config).unwrap();

        assert!(client
            .default_headers()
            .keys()
            .all(|name| !name.contains("Storefront")));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = config_builder().user_agent_prefix("MyApp/1.0").build().unwrap();
        let client = StorefrontClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("Storefront Gateway v"));
    }
}

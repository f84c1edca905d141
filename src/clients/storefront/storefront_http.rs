//! Internal HTTP plumbing for Storefront API calls.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::{GraphqlQuery, GraphqlResponse};
use crate::config::GatewayConfig;

/// Fixed wait before retrying a 500, or a 429 without `Retry-After`.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Posts GraphQL envelopes to `{base_uri}/api/{version}/graphql.json`.
///
/// This type is `pub(super)` and not exposed publicly.
#[derive(Debug)]
pub(super) struct StorefrontHttpClient {
    client: reqwest::Client,
    endpoint: String,
    default_headers: HashMap<String, String>,
    tries: u32,
}

// Verify StorefrontHttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StorefrontHttpClient>();
};

impl StorefrontHttpClient {
    /// Builds the endpoint and default headers from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialised.
    pub(super) fn new(config: &GatewayConfig) -> Result<Self, HttpError> {
        let shop = config.shop().as_ref();
        let base_uri = config
            .api_host()
            .map_or_else(|| format!("https://{shop}"), |host| host.origin());
        let endpoint = format!("{base_uri}/api/{}/graphql.json", config.api_version());

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Storefront Gateway v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Proxied requests still have to name the storefront they are for.
        if config.api_host().is_some() {
            default_headers.insert("Host".to_string(), shop.to_string());
        }

        if let Some(token) = config.storefront_token() {
            let (name, value) = token.header();
            default_headers.insert(name.to_string(), value.to_string());
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            endpoint,
            default_headers,
            tries: config.http_tries(),
        })
    }

    pub(super) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(super) const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends the query, retrying 429 and 500 responses up to `tries` times.
    pub(super) async fn request(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError> {
        let body = query.body();
        let mut tries: u32 = 0;

        loop {
            tries += 1;

            let mut req_builder = self.client.post(&self.endpoint).json(&body);
            for (key, value) in &self.default_headers {
                req_builder = req_builder.header(key, value);
            }

            let res = req_builder.send().await?;
            let code = res.status().as_u16();
            let request_id = header_value(res.headers(), "x-request-id");
            let retry_after = header_value(res.headers(), "retry-after")
                .and_then(|value| value.parse::<f64>().ok());

            if let Some(reason) = header_value(res.headers(), "x-shopify-api-deprecated-reason") {
                tracing::warn!(
                    "Deprecated request to Storefront API at {}, received reason: {}",
                    self.endpoint,
                    reason
                );
            }

            let body_text = res.text().await?;

            if (200..300).contains(&code) {
                let response: GraphqlResponse = serde_json::from_str(&body_text)?;
                return Ok(response.with_request_id(request_id));
            }

            let message = serialize_error(&body_text);

            if code != 429 && code != 500 {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message,
                    error_reference: request_id,
                }));
            }

            if tries >= self.tries {
                if self.tries == 1 {
                    return Err(HttpError::Response(HttpResponseError {
                        code,
                        message,
                        error_reference: request_id,
                    }));
                }
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: self.tries,
                    message,
                    error_reference: request_id,
                }));
            }

            let delay = retry_delay(code, retry_after);
            tracing::debug!(code, tries, ?delay, "Retrying storefront request");
            tokio::time::sleep(delay).await;
        }
    }
}

fn header_value(headers: &reqwest::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// 429 honours `Retry-After`; 500 always waits the fixed delay.
///
/// A `Retry-After` that is negative, not a number or too large for a
/// [`Duration`] falls back to the fixed delay.
fn retry_delay(status: u16, retry_after: Option<f64>) -> Duration {
    let fixed = Duration::from_secs(RETRY_WAIT_TIME);
    match (status, retry_after) {
        (429, Some(seconds)) => Duration::try_from_secs_f64(seconds).unwrap_or(fixed),
        _ => fixed,
    }
}

/// Keeps the `errors` / `error` / `error_description` fields of an error body.
fn serialize_error(body_text: &str) -> String {
    let Ok(serde_json::Value::Object(body)) = serde_json::from_str(body_text) else {
        return serde_json::json!({ "raw_body": body_text }).to_string();
    };

    let kept: serde_json::Map<String, serde_json::Value> = body
        .into_iter()
        .filter(|(key, _)| matches!(key.as_str(), "errors" | "error" | "error_description"))
        .collect();

    serde_json::Value::Object(kept).to_string()
}

//! Integration tests for the Storefront HTTP client.
//!
//! A local `wiremock` server stands in for the storefront; the client is
//! pointed at it through the `api_host` proxy setting.

use chrono::{Duration, Utc};
use serde_json::json;
use storefront_gateway::clients::storefront::{PRIVATE_HEADER_NAME, PUBLIC_HEADER_NAME};
use storefront_gateway::{
    Api, ApiError, ApiVersion, GatewayConfig, GraphqlQuery, HostUrl, HttpError, MemoryStore,
    ShopDomain, StorefrontClient, StorefrontToken, Transport,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/api/2024-04/graphql.json";

fn config(server: &MockServer, token: Option<StorefrontToken>) -> GatewayConfig {
    let mut builder = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .api_version(ApiVersion::V2024_04)
        .api_host(HostUrl::new(&server.uri()).unwrap());
    if let Some(token) = token {
        builder = builder.storefront_token(token);
    }
    builder.build().unwrap()
}

fn shop_query() -> GraphqlQuery {
    GraphqlQuery::new("query shop { shop { name } }").operation_name("shop")
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_posts_envelope_with_public_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header(PUBLIC_HEADER_NAME, "pub-token"))
        .and(header("Host", "test-shop.myshopify.com"))
        .and(body_partial_json(json!({
            "query": "query shop { shop { name } }",
            "operationName": "shop"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-1")
                .set_body_json(json!({ "data": { "shop": { "name": "Test Shop" } } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client =
        StorefrontClient::new(&config(&server, Some(StorefrontToken::public("pub-token").unwrap())))
            .unwrap();

    let response = client.execute(&shop_query()).await.unwrap();

    assert_eq!(response.pointer("/shop/name"), Some(&json!("Test Shop")));
    assert_eq!(response.request_id(), Some("req-1"));
}

#[tokio::test]
async fn test_private_token_uses_private_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(PRIVATE_HEADER_NAME, "priv-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&config(
        &server,
        Some(StorefrontToken::private("priv-token").unwrap()),
    ))
    .unwrap();

    assert!(client.execute(&shop_query()).await.is_ok());
}

// ============================================================================
// Response handling
// ============================================================================

#[tokio::test]
async fn test_graphql_errors_arrive_as_ok_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Field 'nope' doesn't exist on type 'Shop'" }]
        })))
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&config(&server, None)).unwrap();
    let response = client.execute(&shop_query()).await.unwrap();

    assert!(response.data().is_none());
    assert_eq!(
        response.first_error(),
        Some("Field 'nope' doesn't exist on type 'Shop'")
    );
}

#[tokio::test]
async fn test_non_success_status_is_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "req-404")
                .set_body_json(json!({ "errors": "Not Found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&config(&server, None)).unwrap();
    let err = client.execute(&shop_query()).await.unwrap_err();

    match err {
        HttpError::Response(response) => {
            assert_eq!(response.code, 404);
            assert_eq!(response.error_reference.as_deref(), Some("req-404"));
            assert!(response.message.contains("Not Found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_throttled_request_is_retried_when_tries_allow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
        .with_priority(2)
        .mount(&server)
        .await;

    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .api_host(HostUrl::new(&server.uri()).unwrap())
        .http_tries(2)
        .build()
        .unwrap();
    let client = StorefrontClient::new(&config).unwrap();

    let response = client.execute(&shop_query()).await.unwrap();

    assert_eq!(response.pointer("/ok"), Some(&json!(true)));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_throttled_request_exhausts_tries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .api_host(HostUrl::new(&server.uri()).unwrap())
        .http_tries(3)
        .build()
        .unwrap();
    let client = StorefrontClient::new(&config).unwrap();

    let err = client.execute(&shop_query()).await.unwrap_err();

    assert!(matches!(err, HttpError::MaxRetries(ref e) if e.tries == 3 && e.code == 429));
    assert!(!err.is_network());
}

/// Serves one connection: reads the request, then answers with a body
/// shorter than its `Content-Length` and hangs up.
async fn serve_truncated_body(listener: TcpListener) {
    let (mut socket, _) = listener.accept().await.unwrap();

    let mut request = Vec::new();
    let mut buf = [0_u8; 1024];
    loop {
        let read = socket.read(&mut buf).await.unwrap();
        assert!(read > 0, "client closed before sending a request");
        request.extend_from_slice(&buf[..read]);

        let text = String::from_utf8_lossy(&request).to_string();
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        if request.len() >= head_end + 4 + content_length {
            break;
        }
    }

    socket
        .write_all(
            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"data\"",
        )
        .await
        .unwrap();
    socket.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_truncated_body_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_truncated_body(listener));

    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .api_host(HostUrl::new(&format!("http://{addr}")).unwrap())
        .build()
        .unwrap();
    let client = StorefrontClient::new(&config).unwrap();

    let err = client.execute(&shop_query()).await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .api_host(HostUrl::new("http://127.0.0.1:1").unwrap())
        .build()
        .unwrap();
    let api = Api::from_config(&config, MemoryStore::new()).unwrap();

    let err = api.sign_in("jane@example.com", "pw").await.unwrap_err();

    assert_eq!(err, ApiError::Content { is_network_error: true });
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_api_signs_in_and_fetches_customer_over_http() {
    let server = MockServer::start().await;
    let expires_at = (Utc::now() + Duration::days(30)).to_rfc3339();

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "customerAccessTokenCreate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customerAccessTokenCreate": {
                "customerAccessToken": { "accessToken": "http-token", "expiresAt": expires_at },
                "customerUserErrors": []
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "customer",
            "variables": { "customerAccessToken": "http-token" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customer": {
                "id": "gid://shopify/Customer/1",
                "email": "jane@example.com",
                "firstName": "Jane",
                "lastName": "Doe",
                "phone": null,
                "acceptsMarketing": true,
                "defaultAddress": null,
                "addresses": { "edges": [] }
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::from_config(
        &config(&server, Some(StorefrontToken::public("pub-token").unwrap())),
        MemoryStore::new(),
    )
    .unwrap();

    api.sign_in("jane@example.com", "pw").await.unwrap();
    let customer = api.get_customer().await.unwrap();

    assert_eq!(customer.email, "jane@example.com");
    assert!(customer.accepts_marketing);
}

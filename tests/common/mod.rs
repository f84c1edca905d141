//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde_json::{json, Value};
use storefront_gateway::clients::HttpResponseError;
use storefront_gateway::{GraphqlQuery, GraphqlResponse, HttpError, Session, Transport};

/// One scripted outcome of [`ScriptedTransport::execute`].
#[derive(Clone, Debug)]
pub enum Step {
    /// Reply with this GraphQL envelope (`{"data": ..., "errors": ...}`).
    Respond(Value),
    /// Fail the round trip with this HTTP status.
    Fail(u16),
}

/// A transport that replays scripted outcomes in order.
///
/// The last step repeats once the script is exhausted. Every call is
/// recorded, and overlapping calls panic.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    queries: Mutex<Vec<GraphqlQuery>>,
    calls: AtomicUsize,
    in_flight: AtomicBool,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Makes every call take `latency` of (paused) tokio time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<GraphqlQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Operation names of all recorded calls, in order.
    pub fn operations(&self) -> Vec<String> {
        self.queries()
            .iter()
            .map(|query| query.body()["operationName"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps
                .front()
                .cloned()
                .expect("transport called with an empty script")
        }
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, query: &GraphqlQuery) -> Result<GraphqlResponse, HttpError> {
        assert!(
            !self.in_flight.swap(true, Ordering::SeqCst),
            "a second request was issued while one was in flight"
        );
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let step = self.next_step();
        self.in_flight.store(false, Ordering::SeqCst);

        match step {
            Step::Respond(envelope) => Ok(serde_json::from_value(envelope).unwrap()),
            Step::Fail(code) => Err(HttpError::Response(HttpResponseError {
                code,
                message: String::new(),
                error_reference: None,
            })),
        }
    }
}

pub fn data(data: Value) -> Step {
    Step::Respond(json!({ "data": data }))
}

pub fn graphql_error(message: &str) -> Step {
    Step::Respond(json!({ "data": null, "errors": [{ "message": message }] }))
}

pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn token_created(token: &str, expires_at: DateTime<Utc>) -> Step {
    data(json!({
        "customerAccessTokenCreate": {
            "customerAccessToken": { "accessToken": token, "expiresAt": rfc3339(expires_at) },
            "customerUserErrors": []
        }
    }))
}

pub fn token_rejected(message: &str) -> Step {
    data(json!({
        "customerAccessTokenCreate": {
            "customerAccessToken": null,
            "customerUserErrors": [{ "code": "UNIDENTIFIED_CUSTOMER", "field": ["input"], "message": message }]
        }
    }))
}

pub fn customer_json(email: &str) -> Value {
    json!({
        "id": "gid://shopify/Customer/1",
        "email": email,
        "firstName": "Jane",
        "lastName": "Doe",
        "phone": null,
        "acceptsMarketing": false,
        "defaultAddress": null,
        "addresses": { "edges": [] }
    })
}

pub fn order_json(number: i64) -> Value {
    json!({
        "id": format!("gid://shopify/Order/{number}"),
        "orderNumber": number,
        "processedAt": "2024-05-01T12:00:00Z",
        "email": "jane@example.com",
        "totalPrice": { "amount": "42.00", "currencyCode": "USD" },
        "lineItems": { "edges": [ { "node": { "title": "Mug", "quantity": 1 } } ] },
        "shippingAddress": null
    })
}

pub fn valid_session(email: &str) -> Session {
    Session::new(
        "stored-token".to_string(),
        email.to_string(),
        Utc::now() + ChronoDuration::days(1),
    )
}

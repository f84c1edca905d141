//! Plain-data GraphQL request and response types.
//!
//! A [`GraphqlQuery`] only describes *what* to ask for: a document string and
//! its variables. Executing it is the job of a
//! [`Transport`](crate::clients::Transport), which hands back a
//! [`GraphqlResponse`] holding the nullable `data` payload and the optional
//! `errors` list exactly as the storefront returned them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL document plus variables, ready to be (re)submitted unchanged.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use storefront_gateway::clients::GraphqlQuery;
///
/// let query = GraphqlQuery::new("query Shop { shop { name } }")
///     .operation_name("Shop")
///     .variables(json!({}));
///
/// assert_eq!(query.document(), "query Shop { shop { name } }");
/// assert_eq!(query.body()["operationName"], "Shop");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphqlQuery {
    #[serde(rename = "query")]
    document: Cow<'static, str>,
    variables: Value,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    operation_name: Option<String>,
}

impl GraphqlQuery {
    /// Creates a query with no variables.
    #[must_use]
    pub fn new(document: impl Into<Cow<'static, str>>) -> Self {
        Self {
            document: document.into(),
            variables: Value::Object(serde_json::Map::new()),
            operation_name: None,
        }
    }

    /// Sets the query variables.
    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the operation name sent alongside the document.
    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Returns the GraphQL document.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Returns the variables object.
    #[must_use]
    pub const fn variables_ref(&self) -> &Value {
        &self.variables
    }

    /// Returns the JSON request body (`query`, `variables`, `operationName`).
    #[must_use]
    pub fn body(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphqlErrorMessage {
    /// Human-readable message supplied by the server.
    pub message: String,
}

/// A GraphQL response envelope.
///
/// `data` and `errors` are both nullable, mirroring the wire format; a
/// response may carry either, both or neither.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorMessage>>,
    #[serde(default)]
    extensions: Option<Value>,
    #[serde(skip)]
    request_id: Option<String>,
}

impl GraphqlResponse {
    /// Creates a response carrying `data` and no errors.
    #[must_use]
    pub const fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
            extensions: None,
            request_id: None,
        }
    }

    /// Creates a response carrying only GraphQL errors.
    #[must_use]
    pub fn from_errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: None,
            errors: Some(
                messages
                    .into_iter()
                    .map(|message| GraphqlErrorMessage {
                        message: message.into(),
                    })
                    .collect(),
            ),
            extensions: None,
            request_id: None,
        }
    }

    /// Attaches the `X-Request-Id` the response arrived with.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the `data` payload, if the server sent one.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the `errors` array, if the server sent one.
    #[must_use]
    pub fn errors(&self) -> Option<&[GraphqlErrorMessage]> {
        self.errors.as_deref()
    }

    /// Returns the first error message, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors()
            .and_then(<[GraphqlErrorMessage]>::first)
            .map(|e| e.message.as_str())
    }

    /// Returns the `extensions` object (query cost and similar).
    #[must_use]
    pub const fn extensions(&self) -> Option<&Value> {
        self.extensions.as_ref()
    }

    /// Returns the request id reported by the storefront.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Looks up a value inside `data` by JSON pointer, skipping nulls.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use storefront_gateway::clients::GraphqlResponse;
    ///
    /// let response = GraphqlResponse::from_data(json!({ "node": { "order": null } }));
    /// assert!(response.pointer("/node").is_some());
    /// assert!(response.pointer("/node/order").is_none());
    /// ```
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.pointer(path))
            .filter(|value| !value.is_null())
    }
}

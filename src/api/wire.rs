//! Storefront JSON shapes and their conversion into domain types.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::models::{Address, Customer, Money, Order, OrderItem, ShippingRate};

/// Keys under which mutation payloads report rejected input.
const USER_ERROR_KEYS: [&str; 3] = ["customerUserErrors", "checkoutUserErrors", "userErrors"];

#[derive(Debug, Deserialize)]
pub(crate) struct UserError {
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    #[serde(default)]
    pub(crate) cursor: Option<String>,
    pub(crate) node: T,
}

/// A relay-style connection; only the nodes are kept.
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub(crate) edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    pub(crate) fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerAccessToken {
    pub(crate) access_token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerNode {
    id: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    #[serde(default)]
    accepts_marketing: bool,
    default_address: Option<Address>,
    #[serde(default)]
    addresses: Option<Connection<Address>>,
}

impl From<CustomerNode> for Customer {
    fn from(node: CustomerNode) -> Self {
        Self {
            id: node.id,
            email: node.email.unwrap_or_default(),
            first_name: node.first_name,
            last_name: node.last_name,
            phone: node.phone,
            accepts_marketing: node.accepts_marketing,
            default_address: node.default_address,
            addresses: node.addresses.unwrap_or_default().into_nodes(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderNode {
    id: String,
    order_number: i64,
    processed_at: DateTime<Utc>,
    email: Option<String>,
    total_price: Money,
    #[serde(default)]
    line_items: Option<Connection<OrderItem>>,
    shipping_address: Option<Address>,
    #[serde(default)]
    subtotal_price: Option<Money>,
    #[serde(default)]
    total_shipping_price: Option<Money>,
}

impl From<OrderNode> for Order {
    fn from(node: OrderNode) -> Self {
        Self {
            id: node.id,
            order_number: node.order_number,
            processed_at: node.processed_at,
            email: node.email,
            total_price: node.total_price,
            items: node.line_items.unwrap_or_default().into_nodes(),
            shipping_address: node.shipping_address,
            subtotal_price: node.subtotal_price,
            total_shipping_price: node.total_shipping_price,
            cursor: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailableShippingRates {
    #[serde(default)]
    pub(crate) ready: bool,
    #[serde(rename = "shippingRates")]
    pub(crate) shipping_rates: Option<Vec<ShippingRate>>,
}

/// Decodes `data[field]`.
///
/// A missing or null field is a content error. A present field of the wrong
/// shape is critical.
pub(crate) fn decode_field<R: DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<R, ApiError> {
    let value = data
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(ApiError::content)?;
    decode_value(value)
}

/// Decodes a mutation payload at `data[field]`, surfacing its user errors.
///
/// # Errors
///
/// - [`ApiError::Content`] if the payload is missing
/// - [`ApiError::NonCritical`] with the first user error message
/// - [`ApiError::Critical`] if the payload cannot be decoded
pub(crate) fn decode_payload<R: DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<R, ApiError> {
    let payload = data
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(ApiError::content)?;

    if let Some(message) = first_user_error(payload)? {
        return Err(ApiError::non_critical(message));
    }

    decode_value(payload)
}

fn first_user_error(payload: &Value) -> Result<Option<String>, ApiError> {
    for key in USER_ERROR_KEYS {
        let Some(errors) = payload.get(key).filter(|value| !value.is_null()) else {
            continue;
        };
        let errors: Vec<UserError> = decode_value(errors)?;
        if let Some(first) = errors.into_iter().next() {
            return Ok(Some(first.message));
        }
    }
    Ok(None)
}

/// Decodes `data.node`, the target of a lookup by global id.
///
/// The id was handed out by the storefront, so a missing node or one of
/// another type is critical rather than a content error.
pub(crate) fn decode_node<R: DeserializeOwned>(data: &Value) -> Result<R, ApiError> {
    let node = data
        .get("node")
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::critical("No node for the requested id"))?;
    decode_value(node)
}

pub(crate) fn decode_value<R: DeserializeOwned>(value: &Value) -> Result<R, ApiError> {
    R::deserialize(value).map_err(|err| ApiError::critical(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        ok: bool,
    }

    #[test]
    fn test_decode_payload_surfaces_first_user_error() {
        let data = json!({
            "customerCreate": {
                "customer": null,
                "customerUserErrors": [
                    { "field": ["input", "email"], "message": "Email has already been taken" },
                    { "field": ["input", "password"], "message": "Password is too short" }
                ]
            }
        });

        let err = decode_payload::<Payload>(&data, "customerCreate").unwrap_err();
        assert_eq!(err, ApiError::non_critical("Email has already been taken"));
    }

    #[test]
    fn test_decode_payload_with_empty_user_errors() {
        let data = json!({ "op": { "ok": true, "userErrors": [] } });
        assert_eq!(
            decode_payload::<Payload>(&data, "op").unwrap(),
            Payload { ok: true }
        );
    }

    #[test]
    fn test_decode_missing_payload_is_content() {
        let data = json!({ "op": null });
        assert_eq!(
            decode_payload::<Payload>(&data, "op").unwrap_err(),
            ApiError::content()
        );
        assert_eq!(
            decode_field::<Payload>(&data, "other").unwrap_err(),
            ApiError::content()
        );
    }

    #[test]
    fn test_decode_wrong_shape_is_critical() {
        let data = json!({ "op": { "ok": "yes" } });
        assert!(matches!(
            decode_field::<Payload>(&data, "op"),
            Err(ApiError::Critical { .. })
        ));
    }

    #[test]
    fn test_customer_node_flattens_addresses() {
        let node: CustomerNode = serde_json::from_value(json!({
            "id": "gid://shopify/Customer/1",
            "email": "jane@example.com",
            "firstName": "Jane",
            "lastName": null,
            "phone": null,
            "acceptsMarketing": true,
            "defaultAddress": { "id": "a1", "city": "Ottawa" },
            "addresses": { "edges": [
                { "node": { "id": "a1", "city": "Ottawa" } },
                { "node": { "id": "a2", "city": "Toronto" } }
            ] }
        }))
        .unwrap();

        let customer = Customer::from(node);
        assert_eq!(customer.addresses.len(), 2);
        assert_eq!(customer.addresses[1].city.as_deref(), Some("Toronto"));
        assert_eq!(
            customer.default_address.map(|address| address.id),
            Some("a1".to_string())
        );
        assert!(customer.accepts_marketing);
    }

    #[test]
    fn test_order_node_converts() {
        let node: OrderNode = serde_json::from_value(json!({
            "id": "gid://shopify/Order/9",
            "orderNumber": 1001,
            "processedAt": "2024-05-01T12:00:00Z",
            "email": null,
            "totalPrice": { "amount": "20.0", "currencyCode": "CAD" },
            "lineItems": { "edges": [ { "node": { "title": "Mug", "quantity": 2 } } ] },
            "shippingAddress": null
        }))
        .unwrap();

        let order = Order::from(node);
        assert_eq!(order.order_number, 1001);
        assert_eq!(order.items, vec![OrderItem { title: "Mug".into(), quantity: 2 }]);
        assert_eq!(order.total_price, Money::new("20.0", "CAD"));
        assert!(order.subtotal_price.is_none());
    }

    #[test]
    fn test_decode_node_missing_is_critical() {
        assert!(matches!(
            decode_node::<Payload>(&json!({ "node": null })),
            Err(ApiError::Critical { .. })
        ));
        // A node of another type comes back as an empty object
        assert!(matches!(
            decode_node::<Payload>(&json!({ "node": {} })),
            Err(ApiError::Critical { .. })
        ));
        assert_eq!(
            decode_node::<Payload>(&json!({ "node": { "ok": true } })).unwrap(),
            Payload { ok: true }
        );
    }
}

//! The checkout flow, from cart to placed order.
//!
//! A checkout is created from cart lines, given a shipping address, offered
//! shipping rates, assigned one of them and finally paid. Rate calculation
//! and order creation finish asynchronously on the storefront and therefore
//! go through [`poll`](crate::polling::poll).

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::error::{classify, ApiError};
use crate::api::models::{AddressInput, CardCheckout, CartItem, Checkout, Order, ShippingRate};
use crate::api::queries::{
    CHECKOUT, CHECKOUT_COMPLETE_WITH_CARD, CHECKOUT_CREATE, CHECKOUT_ORDER,
    CHECKOUT_SHIPPING_ADDRESS_UPDATE, CHECKOUT_SHIPPING_LINE_UPDATE, CHECKOUT_SHIPPING_RATES, ORDER,
};
use crate::api::wire::{
    decode_field, decode_node, decode_payload, AvailableShippingRates, OrderNode,
};
use crate::api::Api;
use crate::auth::KeyValueStore;
use crate::clients::{GraphqlQuery, GraphqlResponse, Transport};

const SHIPPING_RATES_READY: &str = "/node/availableShippingRates/ready";
const CHECKOUT_ORDER_NODE: &str = "/node/order";

#[derive(Deserialize)]
struct CheckoutPayload {
    checkout: Option<Checkout>,
}

#[derive(Deserialize)]
struct CompletePayload {
    checkout: Option<CheckoutState>,
    payment: Option<PaymentState>,
}

#[derive(Deserialize)]
struct CheckoutState {
    #[serde(default)]
    ready: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentState {
    error_message: Option<String>,
}

/// Still waiting while the rate calculation has not flagged itself ready.
fn shipping_rates_pending(response: &GraphqlResponse) -> bool {
    response.pointer(SHIPPING_RATES_READY) != Some(&Value::Bool(true))
}

/// Still waiting while the checkout has no order.
fn order_pending(response: &GraphqlResponse) -> bool {
    response.pointer(CHECKOUT_ORDER_NODE).is_none()
}

fn idempotency_key() -> String {
    format!("{:032x}", rand::random::<u128>())
}

impl<T: Transport, S: KeyValueStore> Api<T, S> {
    /// Opens a checkout for the given cart lines.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if a line is rejected (unknown variant,
    ///   out of stock)
    /// - [`ApiError::Content`] on transport failure or a missing checkout
    pub async fn create_checkout(&self, items: &[CartItem]) -> Result<Checkout, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_CREATE)
            .operation_name("checkoutCreate")
            .variables(json!({ "input": { "lineItems": items } }));

        self.mutate_checkout(&query, "checkoutCreate").await
    }

    /// Fetches a checkout by id.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Critical`] if no checkout has that id
    /// - [`ApiError::NonCritical`] on GraphQL errors
    /// - [`ApiError::Content`] on transport failure
    pub async fn get_checkout(&self, checkout_id: &str) -> Result<Checkout, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT)
            .operation_name("checkout")
            .variables(json!({ "id": checkout_id }));

        let response = self.execute(&query).await?;
        decode_node(classify(&response)?)
    }

    /// Sets the address the checkout ships to.
    ///
    /// Shipping rates are calculated for this address afterwards; see
    /// [`get_shipping_rates`](Self::get_shipping_rates).
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the address is rejected
    /// - [`ApiError::Content`] on transport failure or a missing checkout
    pub async fn set_shipping_address(
        &self,
        checkout_id: &str,
        address: &AddressInput,
    ) -> Result<Checkout, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_SHIPPING_ADDRESS_UPDATE)
            .operation_name("checkoutShippingAddressUpdate")
            .variables(json!({
                "checkoutId": checkout_id,
                "shippingAddress": address,
            }));

        self.mutate_checkout(&query, "checkoutShippingAddressUpdateV2").await
    }

    /// Selects one of the rates returned by
    /// [`get_shipping_rates`](Self::get_shipping_rates).
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the rate is no longer offered
    /// - [`ApiError::Content`] on transport failure or a missing checkout
    pub async fn select_shipping_rate(
        &self,
        checkout_id: &str,
        rate: &ShippingRate,
    ) -> Result<Checkout, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_SHIPPING_LINE_UPDATE)
            .operation_name("checkoutShippingLineUpdate")
            .variables(json!({
                "checkoutId": checkout_id,
                "shippingRateHandle": rate.handle,
            }));

        self.mutate_checkout(&query, "checkoutShippingLineUpdate").await
    }

    /// Fetches an order by id, including subtotal and shipping cost.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Critical`] if no order has that id
    /// - [`ApiError::NonCritical`] on GraphQL errors
    /// - [`ApiError::Content`] on transport failure
    pub async fn get_order(&self, order_id: &str) -> Result<Order, ApiError> {
        let query = GraphqlQuery::new(ORDER)
            .operation_name("order")
            .variables(json!({ "id": order_id }));

        let response = self.execute(&query).await?;
        let order: OrderNode = decode_node(classify(&response)?)?;
        Ok(order.into())
    }

    /// Returns the shipping rates of a checkout once they are calculated.
    ///
    /// Polls every `poll_interval` until the storefront reports the rates as
    /// ready, for at most `poll_max_attempts` requests.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Content`] if the rates are still not ready when the
    ///   attempts run out, if the checkout does not exist, or on transport
    ///   failure
    /// - [`ApiError::NonCritical`] on GraphQL errors
    pub async fn get_shipping_rates(
        &self,
        checkout_id: &str,
    ) -> Result<Vec<ShippingRate>, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_SHIPPING_RATES)
            .operation_name("checkoutShippingRates")
            .variables(json!({ "id": checkout_id }));

        let response = self.poll_while(&query, shipping_rates_pending).await?;
        let data = classify(&response)?;
        let node: Value = decode_field(data, "node")?;
        let rates: AvailableShippingRates = decode_field(&node, "availableShippingRates")?;

        if !rates.ready {
            tracing::warn!(checkout_id, "Shipping rates were not ready in time");
            return Err(ApiError::content());
        }

        Ok(rates.shipping_rates.unwrap_or_default())
    }

    /// Pays for a checkout with a vaulted card and returns the resulting order.
    ///
    /// The receipt email is set and the payment submitted in one request.
    /// The order is then polled for until the storefront has created it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the email or payment is rejected
    /// - [`ApiError::Content`] if the checkout does not become ready, no
    ///   order appears within the polling budget, or on transport failure
    pub async fn complete_checkout_by_card(
        &self,
        checkout: &CardCheckout,
    ) -> Result<Order, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_COMPLETE_WITH_CARD)
            .operation_name("checkoutCompleteWithCard")
            .variables(json!({
                "checkoutId": checkout.checkout_id,
                "email": checkout.email,
                "payment": {
                    "paymentAmount": checkout.amount,
                    "idempotencyKey": idempotency_key(),
                    "billingAddress": checkout.billing_address,
                    "vaultId": checkout.vault_id,
                },
            }));

        let response = self.execute(&query).await?;
        let data = classify(&response)?;
        let _: IgnoredAny = decode_payload(data, "checkoutEmailUpdateV2")?;
        let payload: CompletePayload = decode_payload(data, "checkoutCompleteWithCreditCardV2")?;

        if let Some(message) = payload.payment.and_then(|payment| payment.error_message) {
            return Err(ApiError::non_critical(message));
        }
        if !payload.checkout.is_some_and(|state| state.ready) {
            return Err(ApiError::content());
        }

        self.await_order(&checkout.checkout_id).await
    }

    async fn mutate_checkout(
        &self,
        query: &GraphqlQuery,
        field: &str,
    ) -> Result<Checkout, ApiError> {
        let response = self.execute(query).await?;
        let payload: CheckoutPayload = decode_payload(classify(&response)?, field)?;
        payload.checkout.ok_or_else(ApiError::content)
    }

    async fn await_order(&self, checkout_id: &str) -> Result<Order, ApiError> {
        let query = GraphqlQuery::new(CHECKOUT_ORDER)
            .operation_name("checkoutOrder")
            .variables(json!({ "id": checkout_id }));

        let response = self.poll_while(&query, order_pending).await?;
        let data = classify(&response)?;
        let node: Value = decode_field(data, "node")?;

        match decode_field::<OrderNode>(&node, "order") {
            Ok(order) => Ok(order.into()),
            Err(err) => {
                tracing::warn!(checkout_id, "Checkout did not materialize into an order");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_predicate() {
        let pending = GraphqlResponse::from_data(json!({
            "node": { "availableShippingRates": { "ready": false, "shippingRates": null } }
        }));
        let missing = GraphqlResponse::from_data(json!({ "node": null }));
        let ready = GraphqlResponse::from_data(json!({
            "node": { "availableShippingRates": { "ready": true, "shippingRates": [] } }
        }));

        assert!(shipping_rates_pending(&pending));
        assert!(shipping_rates_pending(&missing));
        assert!(!shipping_rates_pending(&ready));
    }

    #[test]
    fn test_order_predicate() {
        let pending = GraphqlResponse::from_data(json!({ "node": { "order": null } }));
        let done = GraphqlResponse::from_data(json!({ "node": { "order": { "id": "o" } } }));

        assert!(order_pending(&pending));
        assert!(!order_pending(&done));
    }

    #[test]
    fn test_idempotency_keys_are_unique_hex() {
        let first = idempotency_key();
        let second = idempotency_key();

        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}

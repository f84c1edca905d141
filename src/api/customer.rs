//! Profile, address book and order history of the signed-in customer.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::error::{classify, ApiError};
use crate::api::models::{AddressInput, Customer, Order};
use crate::api::queries::{
    CUSTOMER, CUSTOMER_ADDRESS_CREATE, CUSTOMER_ADDRESS_DELETE, CUSTOMER_ADDRESS_UPDATE,
    CUSTOMER_DEFAULT_ADDRESS_UPDATE, CUSTOMER_ORDERS, CUSTOMER_UPDATE,
};
use crate::api::wire::{decode_payload, decode_value, Connection, CustomerNode, OrderNode};
use crate::api::Api;
use crate::auth::{Credentials, KeyValueStore};
use crate::clients::{GraphqlQuery, Transport};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressPayload {
    customer_address: Option<AddressId>,
}

#[derive(Deserialize)]
struct AddressId {
    id: String,
}

#[derive(Deserialize)]
struct CustomerPayload {
    customer: Option<CustomerNode>,
}

#[derive(Deserialize)]
struct OrdersCustomer {
    #[serde(default)]
    orders: Option<Connection<OrderNode>>,
}

impl<T: Transport, S: KeyValueStore> Api<T, S> {
    /// Fetches the signed-in customer.
    ///
    /// If the storefront no longer resolves a customer for the stored token,
    /// the session is invalidated before the error is returned.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] without a valid session
    /// - [`ApiError::Content`] if the customer is absent (the session is then
    ///   gone) or on transport failure
    /// - [`ApiError::NonCritical`] on GraphQL errors
    pub async fn get_customer(&self) -> Result<Customer, ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER)
            .operation_name("customer")
            .variables(json!({ "customerAccessToken": session.access_token }));

        let response = self.execute(&query).await?;
        let data = classify(&response)?;

        match data.get("customer").filter(|value| !value.is_null()) {
            Some(customer) => Ok(decode_value::<CustomerNode>(customer)?.into()),
            None => {
                tracing::info!(
                    email = %session.email,
                    "Storefront no longer recognises the customer, dropping session"
                );
                self.sessions.invalidate();
                Err(ApiError::content())
            }
        }
    }

    /// Adds an address and returns its id.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] without a valid session
    /// - [`ApiError::NonCritical`] if the address is rejected
    /// - [`ApiError::Content`] on transport failure or a missing payload
    pub async fn create_customer_address(
        &self,
        address: &AddressInput,
    ) -> Result<String, ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_ADDRESS_CREATE)
            .operation_name("customerAddressCreate")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "address": address,
            }));

        let response = self.execute(&query).await?;
        let payload: AddressPayload =
            decode_payload(classify(&response)?, "customerAddressCreate")?;

        payload
            .customer_address
            .map(|address| address.id)
            .ok_or_else(ApiError::content)
    }

    /// Replaces the address with id `address_id`.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address).
    pub async fn edit_customer_address(
        &self,
        address_id: &str,
        address: &AddressInput,
    ) -> Result<(), ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_ADDRESS_UPDATE)
            .operation_name("customerAddressUpdate")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "id": address_id,
                "address": address,
            }));

        let response = self.execute(&query).await?;
        let _: IgnoredAny = decode_payload(classify(&response)?, "customerAddressUpdate")?;
        Ok(())
    }

    /// Deletes the address with id `address_id`.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address).
    pub async fn delete_customer_address(&self, address_id: &str) -> Result<(), ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_ADDRESS_DELETE)
            .operation_name("customerAddressDelete")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "id": address_id,
            }));

        let response = self.execute(&query).await?;
        let _: IgnoredAny = decode_payload(classify(&response)?, "customerAddressDelete")?;
        Ok(())
    }

    /// Makes `address_id` the default shipping address.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address).
    pub async fn set_default_shipping_address(&self, address_id: &str) -> Result<(), ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_DEFAULT_ADDRESS_UPDATE)
            .operation_name("customerDefaultAddressUpdate")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "addressId": address_id,
            }));

        let response = self.execute(&query).await?;
        let _: IgnoredAny = decode_payload(classify(&response)?, "customerDefaultAddressUpdate")?;
        Ok(())
    }

    /// Updates name and phone and returns the updated customer.
    ///
    /// Empty strings are sent as-is; the storefront decides whether they
    /// clear the field.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address).
    pub async fn edit_customer_info(
        &self,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<Customer, ApiError> {
        let mut changes = json!({ "firstName": first_name, "lastName": last_name });
        if let Some(phone) = phone {
            changes["phone"] = json!(phone);
        }

        self.update_customer(changes)
            .await?
            .map(Customer::from)
            .ok_or_else(ApiError::content)
    }

    /// Changes the password, then signs in again with it.
    ///
    /// The storefront revokes existing tokens on a password change, so the
    /// stored session is replaced by a fresh one.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address),
    /// plus the errors of [`sign_in`](Self::sign_in).
    pub async fn change_password(&self, password: &str) -> Result<(), ApiError> {
        let customer = self
            .update_customer(json!({ "password": password }))
            .await?
            .map(Customer::from)
            .ok_or_else(ApiError::content)?;

        self.sessions
            .acquire(&self.transport, &Credentials::new(customer.email, password))
            .await?;
        Ok(())
    }

    /// Sets whether the customer accepts marketing emails.
    ///
    /// # Errors
    ///
    /// Same as [`create_customer_address`](Self::create_customer_address).
    pub async fn update_customer_settings(&self, accepts_marketing: bool) -> Result<(), ApiError> {
        self.update_customer(json!({ "acceptsMarketing": accepts_marketing })).await?;
        Ok(())
    }

    /// Returns up to `per_page` orders, newest first, after cursor `after`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] without a valid session
    /// - [`ApiError::Content`] if no customer came back or on transport
    ///   failure
    pub async fn get_orders(
        &self,
        per_page: u32,
        after: Option<&str>,
    ) -> Result<Vec<Order>, ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_ORDERS)
            .operation_name("customerOrders")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "first": per_page,
                "after": after,
            }));

        let response = self.execute(&query).await?;
        let data = classify(&response)?;
        let customer: OrdersCustomer = data
            .get("customer")
            .filter(|value| !value.is_null())
            .ok_or_else(ApiError::content)
            .and_then(decode_value)?;

        Ok(customer
            .orders
            .unwrap_or_default()
            .edges
            .into_iter()
            .map(|edge| Order {
                cursor: edge.cursor,
                ..Order::from(edge.node)
            })
            .collect())
    }

    async fn update_customer(&self, changes: Value) -> Result<Option<CustomerNode>, ApiError> {
        let session = self.sessions.require_valid()?;

        let query = GraphqlQuery::new(CUSTOMER_UPDATE)
            .operation_name("customerUpdate")
            .variables(json!({
                "customerAccessToken": session.access_token,
                "customer": changes,
            }));

        let response = self.execute(&query).await?;
        let payload: CustomerPayload = decode_payload(classify(&response)?, "customerUpdate")?;
        Ok(payload.customer)
    }
}

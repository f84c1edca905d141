//! Domain types exchanged with [`Api`](crate::Api).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An amount in a given currency.
///
/// Amounts are kept as the decimal strings the storefront returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount, e.g. `"12.50"`.
    pub amount: String,
    /// ISO 4217 code, e.g. `"USD"`.
    pub currency_code: String,
}

impl Money {
    /// Creates an amount.
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }
}

/// A customer's mailing address as stored by the storefront.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Fields for creating or replacing an address.
///
/// Serializes to the storefront's `MailingAddressInput`; `None` fields are
/// omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The signed-in customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
    pub default_address: Option<Address>,
    pub addresses: Vec<Address>,
}

/// Registration details for [`Api::sign_up`](crate::Api::sign_up).
#[derive(Clone, PartialEq, Eq)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl std::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUp")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"*****")
            .field("phone", &self.phone)
            .finish()
    }
}

/// One shipping option offered for a checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRate {
    /// Identifier to pass back when selecting the rate.
    pub handle: String,
    pub title: String,
    pub price: Money,
}

/// One line of an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub title: String,
    pub quantity: i64,
}

/// A placed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub order_number: i64,
    pub processed_at: DateTime<Utc>,
    pub email: Option<String>,
    pub total_price: Money,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<Address>,
    /// Only filled in by [`Api::get_order`](crate::Api::get_order).
    pub subtotal_price: Option<Money>,
    /// Only filled in by [`Api::get_order`](crate::Api::get_order).
    pub total_shipping_price: Option<Money>,
    /// Pagination cursor; pass it as `after` to fetch the following page.
    pub cursor: Option<String>,
}

/// One cart line to open a checkout with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub variant_id: String,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a cart line for `quantity` units of a product variant.
    #[must_use]
    pub fn new(variant_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// A storefront checkout, from cart to payment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub id: String,
    /// Hosted checkout page for this checkout.
    pub web_url: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub requires_shipping: bool,
    pub currency_code: String,
    pub subtotal_price: Money,
    pub total_price: Money,
    pub total_tax: Money,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    /// The selected shipping rate, if any.
    #[serde(default)]
    pub shipping_line: Option<ShippingRate>,
}

/// Payment details for [`Api::complete_checkout_by_card`](crate::Api::complete_checkout_by_card).
///
/// The card must already be vaulted; only the vault id is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardCheckout {
    pub checkout_id: String,
    /// Receipt address written to the checkout before payment.
    pub email: String,
    pub billing_address: AddressInput,
    /// Vault id returned by the card vaulting service.
    pub vault_id: String,
    /// Amount to charge, normally the checkout's total price.
    pub amount: Money,
}

//! GraphQL documents sent by [`Api`](crate::Api).
//!
//! Every operation uses variables; nothing is interpolated into a document.

macro_rules! address_fields {
    () => {
        "id firstName lastName company address1 address2 city province country zip phone"
    };
}

macro_rules! order_fields {
    () => {
        concat!(
            "id orderNumber processedAt email totalPrice { amount currencyCode } ",
            "lineItems(first: 25) { edges { node { title quantity } } } ",
            "shippingAddress { ",
            address_fields!(),
            " }"
        )
    };
}

macro_rules! customer_fields {
    () => {
        concat!(
            "id email firstName lastName phone acceptsMarketing ",
            "defaultAddress { ",
            address_fields!(),
            " } ",
            "addresses(first: 250) { edges { node { ",
            address_fields!(),
            " } } }"
        )
    };
}

macro_rules! money_fields {
    () => {
        "{ amount currencyCode }"
    };
}

macro_rules! checkout_fields {
    () => {
        concat!(
            "id webUrl email requiresShipping currencyCode ",
            "subtotalPrice ",
            money_fields!(),
            " totalPrice ",
            money_fields!(),
            " totalTax ",
            money_fields!(),
            " shippingAddress { ",
            address_fields!(),
            " } shippingLine { handle title price ",
            money_fields!(),
            " }"
        )
    };
}

pub const CUSTOMER_ACCESS_TOKEN_CREATE: &str = "mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) { \
     customerAccessTokenCreate(input: $input) { \
     customerAccessToken { accessToken expiresAt } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_CREATE: &str = "mutation customerCreate($input: CustomerCreateInput!) { \
     customerCreate(input: $input) { \
     customer { id } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_RECOVER: &str = "mutation customerRecover($email: String!) { \
     customerRecover(email: $email) { \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_RESET_BY_URL: &str = "mutation customerResetByUrl($resetUrl: URL!, $password: String!) { \
     customerResetByUrl(resetUrl: $resetUrl, password: $password) { \
     customer { email } \
     customerAccessToken { accessToken expiresAt } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER: &str = concat!(
    "query customer($customerAccessToken: String!) { ",
    "customer(customerAccessToken: $customerAccessToken) { ",
    customer_fields!(),
    " } }"
);

pub const CUSTOMER_UPDATE: &str = concat!(
    "mutation customerUpdate($customerAccessToken: String!, $customer: CustomerUpdateInput!) { ",
    "customerUpdate(customerAccessToken: $customerAccessToken, customer: $customer) { ",
    "customer { ",
    customer_fields!(),
    " } ",
    "customerUserErrors { code field message } } }"
);

pub const CUSTOMER_ADDRESS_CREATE: &str = "mutation customerAddressCreate($customerAccessToken: String!, $address: MailingAddressInput!) { \
     customerAddressCreate(customerAccessToken: $customerAccessToken, address: $address) { \
     customerAddress { id } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_ADDRESS_UPDATE: &str = "mutation customerAddressUpdate($customerAccessToken: String!, $id: ID!, $address: MailingAddressInput!) { \
     customerAddressUpdate(customerAccessToken: $customerAccessToken, id: $id, address: $address) { \
     customerAddress { id } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_ADDRESS_DELETE: &str = "mutation customerAddressDelete($customerAccessToken: String!, $id: ID!) { \
     customerAddressDelete(customerAccessToken: $customerAccessToken, id: $id) { \
     deletedCustomerAddressId \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_DEFAULT_ADDRESS_UPDATE: &str = "mutation customerDefaultAddressUpdate($customerAccessToken: String!, $addressId: ID!) { \
     customerDefaultAddressUpdate(customerAccessToken: $customerAccessToken, addressId: $addressId) { \
     customer { id } \
     customerUserErrors { code field message } } }";

pub const CUSTOMER_ORDERS: &str = concat!(
    "query customerOrders($customerAccessToken: String!, $first: Int!, $after: String) { ",
    "customer(customerAccessToken: $customerAccessToken) { ",
    "orders(first: $first, after: $after, reverse: true) { edges { cursor node { ",
    order_fields!(),
    " } } } } }"
);

pub const CHECKOUT_SHIPPING_RATES: &str = "query checkoutShippingRates($id: ID!) { \
     node(id: $id) { ... on Checkout { \
     availableShippingRates { ready shippingRates { handle title price { amount currencyCode } } } } } }";

pub const CHECKOUT_COMPLETE_WITH_CARD: &str = "mutation checkoutCompleteWithCard($checkoutId: ID!, $email: String!, $payment: CreditCardPaymentInputV2!) { \
     checkoutEmailUpdateV2(checkoutId: $checkoutId, email: $email) { \
     checkout { id } \
     checkoutUserErrors { code field message } } \
     checkoutCompleteWithCreditCardV2(checkoutId: $checkoutId, payment: $payment) { \
     checkout { id ready } \
     payment { id ready errorMessage } \
     checkoutUserErrors { code field message } } }";

pub const CHECKOUT_ORDER: &str = concat!(
    "query checkoutOrder($id: ID!) { node(id: $id) { ... on Checkout { order { ",
    order_fields!(),
    " } } } }"
);

pub const ORDER: &str = concat!(
    "query order($id: ID!) { node(id: $id) { ... on Order { ",
    order_fields!(),
    " subtotalPrice ",
    money_fields!(),
    " totalShippingPrice ",
    money_fields!(),
    " } } }"
);

pub const CHECKOUT_CREATE: &str = concat!(
    "mutation checkoutCreate($input: CheckoutCreateInput!) { ",
    "checkoutCreate(input: $input) { ",
    "checkout { ",
    checkout_fields!(),
    " } ",
    "checkoutUserErrors { code field message } } }"
);

pub const CHECKOUT: &str = concat!(
    "query checkout($id: ID!) { node(id: $id) { ... on Checkout { ",
    checkout_fields!(),
    " } } }"
);

pub const CHECKOUT_SHIPPING_ADDRESS_UPDATE: &str = concat!(
    "mutation checkoutShippingAddressUpdate(",
    "$checkoutId: ID!, $shippingAddress: MailingAddressInput!) { ",
    "checkoutShippingAddressUpdateV2(",
    "checkoutId: $checkoutId, shippingAddress: $shippingAddress) { ",
    "checkout { ",
    checkout_fields!(),
    " } ",
    "checkoutUserErrors { code field message } } }"
);

pub const CHECKOUT_SHIPPING_LINE_UPDATE: &str = concat!(
    "mutation checkoutShippingLineUpdate($checkoutId: ID!, $shippingRateHandle: String!) { ",
    "checkoutShippingLineUpdate(",
    "checkoutId: $checkoutId, shippingRateHandle: $shippingRateHandle) { ",
    "checkout { ",
    checkout_fields!(),
    " } ",
    "checkoutUserErrors { code field message } } }"
);

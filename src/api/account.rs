//! Sign-up, sign-in and password recovery.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{classify, ApiError};
use crate::api::models::SignUp;
use crate::api::queries::{CUSTOMER_CREATE, CUSTOMER_RECOVER, CUSTOMER_RESET_BY_URL};
use crate::api::wire::{decode_payload, CustomerAccessToken};
use crate::api::Api;
use crate::auth::{Credentials, KeyValueStore, Session};
use crate::clients::{GraphqlQuery, Transport};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPayload {
    customer: Option<ResetCustomer>,
    customer_access_token: Option<CustomerAccessToken>,
}

#[derive(Deserialize)]
struct ResetCustomer {
    email: String,
}

impl<T: Transport, S: KeyValueStore> Api<T, S> {
    /// Registers a customer and signs them in.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the storefront rejects the registration
    ///   or the subsequent sign-in
    /// - [`ApiError::Content`] on transport failure or a missing payload
    pub async fn sign_up(&self, details: &SignUp) -> Result<Session, ApiError> {
        let mut input = json!({
            "firstName": details.first_name,
            "lastName": details.last_name,
            "email": details.email,
            "password": details.password,
        });
        if let Some(phone) = &details.phone {
            input["phone"] = json!(phone);
        }

        let query = GraphqlQuery::new(CUSTOMER_CREATE)
            .operation_name("customerCreate")
            .variables(json!({ "input": input }));

        let response = self.execute(&query).await?;
        let _: IgnoredAny = decode_payload(classify(&response)?, "customerCreate")?;

        self.sessions
            .acquire(
                &self.transport,
                &Credentials::new(details.email.as_str(), details.password.as_str()),
            )
            .await
    }

    /// Exchanges email and password for a session and stores it.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::acquire`](crate::auth::SessionManager::acquire).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.sessions
            .acquire(&self.transport, &Credentials::new(email, password))
            .await
    }

    /// Forgets the stored session. Safe to call when signed out.
    pub fn sign_out(&self) {
        self.sessions.invalidate();
        tracing::info!("Customer signed out");
    }

    /// Returns `true` if a valid session is stored.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.sessions.current().is_some()
    }

    /// Asks the storefront to email a password reset link.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the storefront rejects the email
    /// - [`ApiError::Content`] on transport failure or a missing payload
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let query = GraphqlQuery::new(CUSTOMER_RECOVER)
            .operation_name("customerRecover")
            .variables(json!({ "email": email }));

        let response = self.execute(&query).await?;
        let _: IgnoredAny = decode_payload(classify(&response)?, "customerRecover")?;
        Ok(())
    }

    /// Sets a new password from a reset link and stores the returned session.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] if the link is invalid or expired
    /// - [`ApiError::Content`] on transport failure, or if no token or
    ///   customer came back
    pub async fn reset_password(
        &self,
        reset_url: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let query = GraphqlQuery::new(CUSTOMER_RESET_BY_URL)
            .operation_name("customerResetByUrl")
            .variables(json!({ "resetUrl": reset_url, "password": password }));

        let response = self.execute(&query).await?;
        let payload: ResetPayload = decode_payload(classify(&response)?, "customerResetByUrl")?;

        let (Some(customer), Some(token)) = (payload.customer, payload.customer_access_token) else {
            return Err(ApiError::content());
        };

        let session = Session::new(token.access_token, customer.email, token.expires_at);
        self.sessions.store(&session)?;

        tracing::info!(email = %session.email, "Customer password reset");
        Ok(session)
    }
}

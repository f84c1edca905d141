//! Customer session lifecycle.
//!
//! [`SessionManager`] owns the stored [`Session`] record and is the only
//! component that reads or writes it.
//!
//! ```text
//! NoSession --acquire--> Valid --time passes--> ExpiredButPresent
//!     ^                    |                            |
//!     +--invalidate/heal---+        current() == None --+
//! ```
//!
//! Expiry is evaluated lazily on every read; nothing sweeps expired records.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::api::error::{classify, ApiError};
use crate::api::queries::CUSTOMER_ACCESS_TOKEN_CREATE;
use crate::api::wire::{decode_payload, CustomerAccessToken};
use crate::auth::session::Session;
use crate::auth::store::KeyValueStore;
use crate::clients::{GraphqlQuery, Transport};

/// Store key of the customer email.
pub const EMAIL_KEY: &str = "email";
/// Store key of the customer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Store key of the expiry, in epoch milliseconds.
pub const EXPIRES_DATE_KEY: &str = "expires_date";

/// Email and password exchanged for a session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"*****")
            .finish()
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenPayload {
    customer_access_token: Option<CustomerAccessToken>,
}

/// Where the stored record sits in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No complete record is stored.
    NoSession,
    /// A complete record with a future expiry is stored.
    Valid,
    /// A complete record is stored but its expiry has passed.
    ExpiredButPresent,
}

/// Reads, writes and validates the persisted customer session.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use storefront_gateway::auth::{MemoryStore, SessionManager, SessionState};
/// use storefront_gateway::Session;
///
/// let manager = SessionManager::new(MemoryStore::new());
/// assert_eq!(manager.state(), SessionState::NoSession);
///
/// manager
///     .store(&Session::new("tok".into(), "a@b.c".into(), Utc::now() + Duration::hours(1)))
///     .unwrap();
/// assert!(manager.current().is_some());
///
/// manager.invalidate();
/// assert!(manager.current().is_none());
/// ```
#[derive(Debug)]
pub struct SessionManager<S> {
    store: S,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Creates a manager over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub const fn store_ref(&self) -> &S {
        &self.store
    }

    /// Exchanges `credentials` for a customer access token and persists it.
    ///
    /// Any previously stored session is overwritten on success and left
    /// untouched on failure. Never retried automatically.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NonCritical`] with the server's message when the
    ///   credentials are rejected
    /// - [`ApiError::Content`] on transport failure or a missing payload
    /// - [`ApiError::Critical`] if the token payload is malformed
    pub async fn acquire<T: Transport>(
        &self,
        transport: &T,
        credentials: &Credentials,
    ) -> Result<Session, ApiError> {
        let query = GraphqlQuery::new(CUSTOMER_ACCESS_TOKEN_CREATE)
            .operation_name("customerAccessTokenCreate")
            .variables(json!({
                "input": {
                    "email": credentials.email,
                    "password": credentials.password,
                }
            }));

        let response = transport.execute(&query).await?;
        let data = classify(&response)?;

        let payload: AccessTokenPayload = decode_payload(data, "customerAccessTokenCreate")?;
        let token = payload
            .customer_access_token
            .ok_or_else(ApiError::content)?;

        let session = Session::new(token.access_token, credentials.email.clone(), token.expires_at);
        self.store(&session)?;

        tracing::info!(email = %session.email, "Customer signed in");
        Ok(session)
    }

    /// Persists `session`, replacing any stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Content`] if the store rejects the write.
    pub fn store(&self, session: &Session) -> Result<(), ApiError> {
        let batch = self
            .store
            .edit()
            .put_string(EMAIL_KEY, &session.email)
            .put_string(ACCESS_TOKEN_KEY, &session.access_token)
            .put_long(EXPIRES_DATE_KEY, session.expires_at.timestamp_millis());

        self.store.apply(batch).map_err(|err| {
            tracing::warn!(error = %err, "Failed to persist customer session");
            ApiError::content()
        })
    }

    /// Returns the stored session if it is complete and not expired.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current_at(Utc::now())
    }

    /// Returns the stored session if it is complete and valid at `now`.
    #[must_use]
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Session> {
        self.read_record().filter(|session| session.is_valid_at(now))
    }

    /// Returns the lifecycle state of the stored record.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    /// Returns the lifecycle state of the stored record at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        match self.read_record() {
            None => SessionState::NoSession,
            Some(session) if session.is_valid_at(now) => SessionState::Valid,
            Some(_) => SessionState::ExpiredButPresent,
        }
    }

    /// Returns the current session or [`ApiError::Unauthorized`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when [`current`](Self::current)
    /// is `None`.
    pub fn require_valid(&self) -> Result<Session, ApiError> {
        self.current().ok_or(ApiError::Unauthorized)
    }

    /// Deletes the stored record.
    ///
    /// Idempotent. A store failure is logged and otherwise ignored.
    pub fn invalidate(&self) {
        let batch = self
            .store
            .edit()
            .remove(EMAIL_KEY)
            .remove(ACCESS_TOKEN_KEY)
            .remove(EXPIRES_DATE_KEY);

        if let Err(err) = self.store.apply(batch) {
            tracing::warn!(error = %err, "Failed to remove customer session");
        }
    }

    fn read_record(&self) -> Option<Session> {
        let email = self.store.get_string(EMAIL_KEY)?;
        let access_token = self.store.get_string(ACCESS_TOKEN_KEY)?;
        let expires_millis = self.store.get_long(EXPIRES_DATE_KEY)?;
        let expires_at = Utc.timestamp_millis_opt(expires_millis).single()?;

        Some(Session::new(access_token, email, expires_at))
    }
}

//! Customer session.
//!
//! This module provides the [`Session`] type: the customer access token the
//! storefront issued, together with the account it belongs to and its expiry.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

/// An authenticated customer session.
///
/// A session is valid while `expires_at` lies strictly in the future. There
/// is no revoked flag: signing out deletes the stored record.
///
/// # Thread Safety
///
/// `Session` is `Send + Sync`, making it safe to share across threads.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use storefront_gateway::Session;
///
/// let session = Session::new(
///     "customer-access-token".to_string(),
///     "jane@example.com".to_string(),
///     Utc::now() + Duration::days(30),
/// );
///
/// assert!(session.is_valid());
/// assert!(!format!("{session:?}").contains("customer-access-token"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The customer access token sent with authenticated queries.
    pub access_token: String,

    /// The email address the customer signed in with.
    pub email: String,

    /// When the storefront stops accepting the access token.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session.
    ///
    /// `expires_at` is truncated to whole milliseconds, the precision the
    /// session store keeps, so a stored session reads back unchanged.
    #[must_use]
    pub fn new(access_token: String, email: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            email,
            expires_at: expires_at.trunc_subsecs(3),
        }
    }

    /// Returns `true` if the session has not expired at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Returns `true` if the session has not expired yet.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Returns `true` if the session has expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        !self.is_valid()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"*****")
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session::new("token".to_string(), "a@b.c".to_string(), expires_at)
    }

    #[test]
    fn test_session_validity_is_strict() {
        let now = Utc::now();

        assert!(session(now + Duration::seconds(1)).is_valid_at(now));
        assert!(!session(now).is_valid_at(now));
        assert!(!session(now - Duration::hours(1)).is_valid_at(now));
    }

    #[test]
    fn test_session_expired() {
        assert!(session(Utc::now() - Duration::hours(1)).expired());
        assert!(!session(Utc::now() + Duration::hours(1)).expired());
    }

    #[test]
    fn test_session_expiry_kept_to_milliseconds() {
        let expires_at = Utc.timestamp_millis_opt(1_900_000_000_123).unwrap()
            + Duration::nanoseconds(456_789);

        let session = session(expires_at);

        assert_eq!(session.expires_at.timestamp_millis(), 1_900_000_000_123);
        assert_eq!(session.expires_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_session_debug_masks_token() {
        let debug = format!("{:?}", session(Utc::now()));

        assert!(!debug.contains("\"token\""));
        assert!(debug.contains("*****"));
        assert!(debug.contains("a@b.c"));
    }
}

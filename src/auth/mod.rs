//! Customer authentication state.
//!
//! # Overview
//!
//! - [`Session`]: a customer access token with its owner and expiry
//! - [`SessionManager`]: acquires, reads, validates and invalidates the
//!   stored session
//! - [`KeyValueStore`]: the persistence seam, with [`MemoryStore`] and
//!   [`FileStore`] implementations
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_gateway::auth::{Credentials, FileStore, SessionManager};
//!
//! let manager = SessionManager::new(FileStore::open("session.json")?);
//! let session = manager
//!     .acquire(&client, &Credentials::new("jane@example.com", "secret"))
//!     .await?;
//!
//! assert!(manager.current().is_some());
//! ```

mod manager;
pub mod session;
mod store;

pub use manager::{
    Credentials, SessionManager, SessionState, ACCESS_TOKEN_KEY, EMAIL_KEY, EXPIRES_DATE_KEY,
};
pub use session::Session;
pub use store::{Edit, EditBatch, FileStore, KeyValueStore, MemoryStore, StoreError, StoredValue};

//! Redis-backed session provider.
//!
//! Each session is a hash stored under its identifier, with the store's own
//! key expiry standing in for garbage collection. A [`Provider`] hands out one
//! [`SessionStore`] per request, each holding a pooled connection until it is
//! released.

mod configuration;
mod provider;
pub mod redis_store;
mod registry;
mod session_key;
mod session_store;
mod storage;

pub use configuration::{Configuration, DEFAULT_POOL_SIZE, MAX_POOL_SIZE};
pub use provider::{Provider, ProviderError};
pub use redis_store::{RedisProvider, RedisSessionStore};
pub use registry::{ProviderFactory, ProviderRegistry, REDIS_PROVIDER};
pub use session_key::SessionKey;
pub use session_store::{Lookup, SessionStore, StoreError};
pub use storage::{Storage, StorageError, StorageGetError, StorageInsertError};

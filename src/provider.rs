use crate::{redis_store::RedisError, SessionKey, SessionStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider configuration error: {0}")]
    ConfigError(String),
    #[error("Provider connection error: {0}")]
    ConnectionError(String),
    #[error("Unable to regenerate session \"{0}\": {1}")]
    RegenerateError(SessionKey, #[source] RedisError),
    #[error(transparent)]
    StoreError(#[from] StoreError),
    #[error("Unknown session provider \"{0}\"")]
    UnknownProvider(String),
    #[error("Session provider \"{0}\" is already registered")]
    DuplicateProvider(String),
}

/// A pluggable session storage backend.
///
/// Expiry is delegated to the backend, so `session_gc` may do nothing.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Returns a store for `session_id`, creating its record when absent and
    /// resetting its expiry.
    async fn session_read(
        &self,
        session_id: &SessionKey,
    ) -> Result<Box<dyn SessionStore>, ProviderError>;

    async fn session_exist(&self, session_id: &SessionKey) -> Result<bool, ProviderError>;

    /// Moves the record of `old_session_id` to `session_id` and returns a
    /// store bound to the new identifier.
    async fn session_regenerate(
        &self,
        old_session_id: &SessionKey,
        session_id: &SessionKey,
    ) -> Result<Box<dyn SessionStore>, ProviderError>;

    async fn session_destroy(&self, session_id: &SessionKey) -> Result<(), ProviderError>;

    async fn session_gc(&self);

    /// Stops handing out connections. Called once at shutdown.
    fn session_close(&self);
}

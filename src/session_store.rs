use crate::{redis_store::RedisError, SessionKey};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    RedisError(#[from] RedisError),
}

/// Outcome of reading a single field of a session record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Present(String),
    /// The field exists but its bytes are not UTF-8, e.g. written by another client.
    Undecodable(Vec<u8>),
    Absent,
    TransportError(RedisError),
}

impl Lookup {
    /// Collapses absent and failed reads into `None`.
    pub fn into_option(self) -> Option<String> {
        match self {
            Lookup::Present(value) => Some(value),
            Lookup::Undecodable(_) | Lookup::Absent | Lookup::TransportError(_) => None,
        }
    }
}

/// Key/value access scoped to one session over one borrowed connection.
///
/// A store is handed out by a provider per request and must be given back
/// with [`SessionStore::session_release`], which consumes it.
#[async_trait::async_trait]
pub trait SessionStore: Send {
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Never fails: a missing field, a value that is not UTF-8 and a failed read
    /// all yield `None`.
    async fn get(&mut self, key: &str) -> Option<String>;

    async fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Removes the whole record, every field included.
    async fn flush(&mut self) -> Result<(), StoreError>;

    fn session_id(&self) -> &SessionKey;

    fn session_release(self: Box<Self>);
}

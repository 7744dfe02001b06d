use deadpool::managed::Manager;

use crate::{
    redis_store::{
        commands::Command, execute_command::ExecuteCommand, pooled_connection::PooledConnection,
    },
    Lookup, SessionKey, SessionStore, StoreError,
};

/// Session fields live in a hash stored under the session identifier.
pub struct RedisSessionStore<M: Manager> {
    connection: PooledConnection<M>,
    session_id: SessionKey,
}

impl<M> RedisSessionStore<M>
where
    M: Manager,
    M::Type: ExecuteCommand,
{
    pub(crate) fn new(connection: PooledConnection<M>, session_id: SessionKey) -> Self {
        Self {
            connection,
            session_id,
        }
    }

    /// Reads a field without hiding failures.
    pub async fn lookup(&mut self, key: &str) -> Lookup {
        self.connection.lookup(self.session_id.as_ref(), key).await
    }

    pub fn release(self) {
        self.connection.release();
    }
}

#[async_trait::async_trait]
impl<M> SessionStore for RedisSessionStore<M>
where
    M: Manager,
    M::Type: ExecuteCommand,
{
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.connection
            .execute::<()>(Command::hash_set(self.session_id.as_ref(), key, value))
            .await
            .map_err(StoreError::from)
    }

    async fn get(&mut self, key: &str) -> Option<String> {
        match self.lookup(key).await {
            Lookup::TransportError(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    key,
                    error = %e,
                    "Unable to read session field"
                );
                None
            }
            Lookup::Undecodable(bytes) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    key,
                    len = bytes.len(),
                    "Session field is not valid UTF-8"
                );
                None
            }
            lookup => lookup.into_option(),
        }
    }

    async fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.connection
            .execute::<()>(Command::hash_delete(self.session_id.as_ref(), key))
            .await
            .map_err(StoreError::from)
    }

    async fn flush(&mut self) -> Result<(), StoreError> {
        self.connection
            .execute::<()>(Command::delete(self.session_id.as_ref()))
            .await
            .map_err(StoreError::from)
    }

    fn session_id(&self) -> &SessionKey {
        &self.session_id
    }

    fn session_release(self: Box<Self>) {
        (*self).release();
    }
}

use std::time::Duration;

use deadpool::managed::{Manager, Pool};

use crate::{
    redis_store::{
        commands::Command,
        error::RedisError,
        execute_command::ExecuteCommand,
        pool::{build_pool, RedisConnectionManager},
        pooled_connection::PooledConnection,
        redis_session_store::RedisSessionStore,
    },
    Configuration, Lookup, Provider, ProviderError, SessionKey, SessionStore, StoreError,
};

/// Session provider backed by a Redis-compatible store, one hash per session.
pub struct RedisProvider<M: Manager = RedisConnectionManager> {
    config: Configuration,
    pool: Pool<M>,
}

impl RedisProvider {
    /// Parses `config` (`<host:port>[,<pool size>[,<password>]]`) and builds the
    /// pool. No connection is opened until the first session is read.
    pub fn init(max_lifetime: Duration, config: &str) -> Result<Self, ProviderError> {
        let config = Configuration::parse(max_lifetime, config)?;
        let manager = RedisConnectionManager::new(&config)?;
        tracing::debug!(config = ?config, "Initializing redis session provider");
        Self::with_manager(config, manager)
    }

    /// Replaces the configuration and the pool. Connections still borrowed from
    /// the previous pool stay usable until released.
    pub fn reinit(&mut self, max_lifetime: Duration, config: &str) -> Result<(), ProviderError> {
        let config = Configuration::parse(max_lifetime, config)?;
        let manager = RedisConnectionManager::new(&config)?;
        self.reconfigure(config, manager)
    }
}

impl<M> RedisProvider<M>
where
    M: Manager<Error = RedisError>,
    M::Type: ExecuteCommand,
{
    pub fn with_manager(config: Configuration, manager: M) -> Result<Self, ProviderError> {
        let pool = build_pool(manager, config.pool_size())?;
        Ok(Self { config, pool })
    }

    /// Swaps in a new configuration and a fresh pool built from `manager`. Stores
    /// borrowed from the old pool can still be released; their connections are
    /// closed rather than returned.
    pub fn reconfigure(&mut self, config: Configuration, manager: M) -> Result<(), ProviderError> {
        let pool = build_pool(manager, config.pool_size())?;
        tracing::debug!(config = ?config, "Reconfigured redis session provider");
        self.config = config;
        self.pool = pool;
        Ok(())
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub async fn read(
        &self,
        session_id: &SessionKey,
    ) -> Result<RedisSessionStore<M>, ProviderError> {
        let mut connection = self.connection().await?;
        self.ensure_record(&mut connection, session_id).await;
        self.refresh_expiry(&mut connection, session_id).await;
        Ok(RedisSessionStore::new(connection, session_id.clone()))
    }

    pub async fn regenerate(
        &self,
        old_session_id: &SessionKey,
        session_id: &SessionKey,
    ) -> Result<RedisSessionStore<M>, ProviderError> {
        let mut connection = self.connection().await?;
        self.ensure_record(&mut connection, old_session_id).await;
        if let Err(e) = connection
            .execute::<()>(Command::rename(old_session_id.as_ref(), session_id.as_ref()))
            .await
        {
            connection.release();
            return Err(ProviderError::RegenerateError(old_session_id.clone(), e));
        }
        tracing::debug!(
            old_session_id = %old_session_id,
            session_id = %session_id,
            "Regenerated session"
        );
        self.refresh_expiry(&mut connection, session_id).await;
        Ok(RedisSessionStore::new(connection, session_id.clone()))
    }

    /// Deletes the record. Succeeds whether or not it existed; only a failed
    /// borrow is reported.
    pub async fn destroy(&self, session_id: &SessionKey) -> Result<(), ProviderError> {
        let mut connection = self.connection().await?;
        match connection
            .execute::<()>(Command::delete(session_id.as_ref()))
            .await
        {
            Ok(()) => tracing::debug!(session_id = %session_id, "Destroyed session"),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Unable to destroy session")
            }
        }
        connection.release();
        Ok(())
    }

    pub async fn exist(&self, session_id: &SessionKey) -> Result<bool, ProviderError> {
        let mut connection = self.connection().await?;
        let result = connection
            .execute::<bool>(Command::exists(session_id.as_ref()))
            .await;
        connection.release();
        result.map_err(StoreError::from).map_err(ProviderError::from)
    }

    pub fn close(&self) {
        tracing::debug!("Closing session connection pool");
        self.pool.close();
    }

    async fn connection(&self) -> Result<PooledConnection<M>, ProviderError> {
        let connection = self
            .pool
            .get()
            .await
            .map_err(|e| e.to_string())
            .map_err(ProviderError::ConnectionError)?;
        Ok(PooledConnection::new(connection))
    }

    // Failures here are logged and otherwise treated as an absent record.
    async fn ensure_record(
        &self,
        connection: &mut PooledConnection<M>,
        session_id: &SessionKey,
    ) {
        let key = session_id.as_ref();
        match connection.lookup(key, key).await {
            Lookup::Present(value) if !value.is_empty() => return,
            Lookup::Undecodable(_) => return,
            Lookup::TransportError(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Unable to check session record, treating it as absent"
                )
            }
            _ => {}
        }
        let lifetime = self.config.max_lifetime().as_secs().to_string();
        match connection
            .execute::<()>(Command::hash_set(key, key, lifetime))
            .await
        {
            Ok(()) => tracing::debug!(session_id = %session_id, "Created session record"),
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Unable to create session record"
                )
            }
        }
    }

    async fn refresh_expiry(
        &self,
        connection: &mut PooledConnection<M>,
        session_id: &SessionKey,
    ) {
        let command = Command::expire(session_id.as_ref(), self.config.max_lifetime());
        if let Err(e) = connection.execute::<()>(command).await {
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                "Unable to refresh session expiry"
            );
        }
    }
}

#[async_trait::async_trait]
impl<M> Provider for RedisProvider<M>
where
    M: Manager<Error = RedisError> + 'static,
    M::Type: ExecuteCommand,
{
    async fn session_read(
        &self,
        session_id: &SessionKey,
    ) -> Result<Box<dyn SessionStore>, ProviderError> {
        let store = self.read(session_id).await?;
        Ok(Box::new(store))
    }

    async fn session_exist(&self, session_id: &SessionKey) -> Result<bool, ProviderError> {
        self.exist(session_id).await
    }

    async fn session_regenerate(
        &self,
        old_session_id: &SessionKey,
        session_id: &SessionKey,
    ) -> Result<Box<dyn SessionStore>, ProviderError> {
        let store = self.regenerate(old_session_id, session_id).await?;
        Ok(Box::new(store))
    }

    async fn session_destroy(&self, session_id: &SessionKey) -> Result<(), ProviderError> {
        self.destroy(session_id).await
    }

    async fn session_gc(&self) {
        tracing::trace!("Session expiry is handled by the store, nothing to collect");
    }

    fn session_close(&self) {
        self.close();
    }
}

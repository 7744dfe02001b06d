use deadpool::managed::{Manager, Pool, RecycleError, RecycleResult};

use crate::{
    redis_store::{commands::Command, error::RedisError, execute_command::ExecuteCommand},
    Configuration, ProviderError,
};

/// Dials the configured address for every new pooled connection and
/// authenticates it when a password is configured.
pub struct RedisConnectionManager {
    client: redis::Client,
    password: Option<String>,
}

impl RedisConnectionManager {
    pub fn new(config: &Configuration) -> Result<Self, ProviderError> {
        let client = redis::Client::open(config.connection_url().as_str())
            .map_err(|e| e.to_string())
            .map_err(ProviderError::ConfigError)?;
        Ok(Self {
            client,
            password: config.password().map(str::to_string),
        })
    }
}

#[async_trait::async_trait]
impl Manager for RedisConnectionManager {
    type Type = redis::aio::Connection;
    type Error = RedisError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let connection = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| e.to_string())
            .map_err(RedisError::ConnectionError)?;
        match &self.password {
            Some(password) => authenticate(connection, password).await,
            None => Ok(connection),
        }
    }

    async fn recycle(&self, connection: &mut Self::Type) -> RecycleResult<Self::Error> {
        ping(connection).await
    }
}

/// Sends `AUTH` on a freshly dialed connection. The connection is dropped,
/// and so closed, when the server rejects the credential.
pub(crate) async fn authenticate<C: ExecuteCommand>(
    mut connection: C,
    password: &str,
) -> Result<C, RedisError> {
    match connection
        .execute_command::<()>(Command::auth(password))
        .await
    {
        Ok(()) => Ok(connection),
        Err(e) => {
            drop(connection);
            Err(RedisError::ConnectionError(format!(
                "Authentication failed: {e}"
            )))
        }
    }
}

pub(crate) async fn ping<C: ExecuteCommand>(connection: &mut C) -> RecycleResult<RedisError> {
    connection
        .execute_command::<String>(Command::ping())
        .await
        .map_err(RecycleError::Backend)?;
    Ok(())
}

pub(crate) fn build_pool<M>(manager: M, max_size: usize) -> Result<Pool<M>, ProviderError>
where
    M: Manager<Error = RedisError>,
{
    let pool = Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| e.to_string())
        .map_err(ProviderError::ConfigError)?;
    tracing::debug!(max_size, "Built session connection pool");
    Ok(pool)
}

use deadpool::managed::{Manager, Object};

use crate::{
    redis_store::{commands::Command, error::RedisError, execute_command::ExecuteCommand},
    Lookup,
};

/// A connection borrowed from the pool. Remembers whether it failed at the
/// transport level so that release can evict it instead of recycling it.
pub(crate) struct PooledConnection<M: Manager> {
    connection: Object<M>,
    broken: bool,
}

impl<M> PooledConnection<M>
where
    M: Manager,
    M::Type: ExecuteCommand,
{
    pub(crate) fn new(connection: Object<M>) -> Self {
        Self {
            connection,
            broken: false,
        }
    }

    pub(crate) async fn execute<T: redis::FromRedisValue + Send>(
        &mut self,
        command: Command,
    ) -> Result<T, RedisError> {
        let result = self.connection.execute_command(command).await;
        if let Err(e) = &result {
            if e.is_connection_error() {
                self.broken = true;
            }
        }
        result
    }

    pub(crate) async fn lookup(&mut self, key: &str, field: &str) -> Lookup {
        match self
            .execute::<Option<Vec<u8>>>(Command::hash_get(key, field))
            .await
        {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(value) => Lookup::Present(value),
                Err(e) => Lookup::Undecodable(e.into_bytes()),
            },
            Ok(None) => Lookup::Absent,
            Err(e) => Lookup::TransportError(e),
        }
    }

    pub(crate) fn release(self) {
        if self.broken {
            tracing::debug!("Evicting broken connection from the pool");
            drop(Object::take(self.connection));
        }
    }
}

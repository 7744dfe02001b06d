use crate::redis_store::{commands::Command, error::RedisError};

#[async_trait::async_trait]
pub trait ExecuteCommand: Send {
    async fn execute_command<T: redis::FromRedisValue + Send>(
        &mut self,
        command: Command,
    ) -> Result<T, RedisError>;
}

#[async_trait::async_trait]
impl ExecuteCommand for redis::aio::Connection {
    async fn execute_command<T: redis::FromRedisValue + Send>(
        &mut self,
        command: Command,
    ) -> Result<T, RedisError> {
        tracing::trace!(command = command.name(), "Executing command");
        let redis_command: redis::Cmd = command.into();
        let result = redis_command
            .query_async(self)
            .await
            .map_err(RedisError::from)?;
        Ok(result)
    }
}

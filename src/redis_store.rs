mod commands;
mod error;
mod execute_command;
#[cfg(test)]
pub(crate) mod memory;
mod pool;
mod pooled_connection;
mod redis_provider;
mod redis_session_store;

pub use commands::Command;
pub use error::RedisError;
pub use execute_command::ExecuteCommand;
pub use pool::RedisConnectionManager;
pub use redis_provider::RedisProvider;
pub use redis_session_store::RedisSessionStore;

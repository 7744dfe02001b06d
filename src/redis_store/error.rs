#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RedisError {
    #[error("Redis connection error: {0}")]
    ConnectionError(String),
    #[error("Redis query error: {0}")]
    QueryError(String),
}

impl RedisError {
    /// True when the connection that produced this error can no longer be trusted.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, RedisError::ConnectionError(_))
    }
}

impl From<redis::RedisError> for RedisError {
    fn from(error: redis::RedisError) -> Self {
        if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
            RedisError::ConnectionError(error.to_string())
        } else {
            RedisError::QueryError(error.to_string())
        }
    }
}

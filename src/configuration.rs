use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::ProviderError;

pub const DEFAULT_POOL_SIZE: usize = 100;

/// Largest accepted pool size. The pool reserves its slots up front.
pub const MAX_POOL_SIZE: usize = 10_000;

/// Provider settings parsed from `<host:port>[,<pool size>[,<password>]]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    address: String,
    pool_size: usize,
    password: Option<String>,
    max_lifetime: Duration,
}

impl Configuration {
    pub fn parse(max_lifetime: Duration, config: &str) -> Result<Self, ProviderError> {
        let mut fields = config.split(',').map(str::trim);

        let address = fields.next().unwrap_or_default().to_string();
        if address.is_empty() {
            return Err(ProviderError::ConfigError(format!(
                "Missing store address in \"{config}\""
            )));
        }

        let pool_size = fields.next().map_or(DEFAULT_POOL_SIZE, parse_pool_size);

        let password = fields
            .next()
            .filter(|password| !password.is_empty())
            .map(str::to_string);

        Ok(Self {
            address,
            pool_size,
            password,
            max_lifetime,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn max_lifetime(&self) -> Duration {
        self.max_lifetime
    }

    pub fn connection_url(&self) -> String {
        format!("redis://{}/", self.address)
    }
}

// Zero, negative, oversized or non-numeric sizes fall back to the default.
fn parse_pool_size(field: &str) -> usize {
    match field.parse::<i64>().map(usize::try_from) {
        Ok(Ok(size)) if size > 0 && size <= MAX_POOL_SIZE => size,
        _ => {
            tracing::warn!(
                pool_size = field,
                default = DEFAULT_POOL_SIZE,
                max = MAX_POOL_SIZE,
                "Invalid pool size, using default"
            );
            DEFAULT_POOL_SIZE
        }
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("address", &self.address)
            .field("pool_size", &self.pool_size)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

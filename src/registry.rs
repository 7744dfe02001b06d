use std::collections::HashMap;
use std::time::Duration;

use crate::{redis_store::RedisProvider, Provider, ProviderError};

pub const REDIS_PROVIDER: &str = "redis";

pub type ProviderFactory =
    Box<dyn Fn(Duration, &str) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync>;

/// Maps backend names to provider constructors, so the backend can be chosen
/// by configuration.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every provider this crate ships already registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(REDIS_PROVIDER.to_string(), Box::new(open_redis));
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), ProviderError>
    where
        F: Fn(Duration, &str) -> Result<Box<dyn Provider>, ProviderError> + Send + Sync + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(ProviderError::DuplicateProvider(name.to_string()));
        }
        self.factories.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn open(
        &self,
        name: &str,
        max_lifetime: Duration,
        config: &str,
    ) -> Result<Box<dyn Provider>, ProviderError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?;
        factory(max_lifetime, config)
    }
}

fn open_redis(max_lifetime: Duration, config: &str) -> Result<Box<dyn Provider>, ProviderError> {
    let provider = RedisProvider::init(max_lifetime, config)?;
    Ok(Box::new(provider))
}

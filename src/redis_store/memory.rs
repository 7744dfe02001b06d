//! In-process stand-in for a Redis server, used by the provider and store tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use deadpool::managed::{Manager, RecycleResult};
use redis::{FromRedisValue, Value};

use crate::{
    redis_store::{
        commands::Command,
        error::RedisError,
        execute_command::ExecuteCommand,
        pool::{authenticate, ping},
        RedisProvider,
    },
    Configuration,
};

#[derive(Default)]
struct Record {
    fields: HashMap<String, Vec<u8>>,
    ttl: Option<Duration>,
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, Record>,
    password: Option<String>,
    offline: bool,
    failing: HashSet<&'static str>,
    connections_opened: usize,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_password(password: &str) -> Self {
        let database = Self::new();
        database.state().password = Some(password.to_string());
        database
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory database lock poisoned")
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Makes every command with this name fail with a server error.
    pub(crate) fn fail_on(&self, command: &'static str) {
        self.state().failing.insert(command);
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.state().records.contains_key(key)
    }

    pub(crate) fn field(&self, key: &str, field: &str) -> Option<String> {
        self.state()
            .records
            .get(key)
            .and_then(|record| record.fields.get(field).cloned())
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Writes a field as raw bytes, the way a client not bound to UTF-8 would.
    pub(crate) fn set_raw(&self, key: &str, field: &str, bytes: Vec<u8>) {
        self.state()
            .records
            .entry(key.to_string())
            .or_default()
            .fields
            .insert(field.to_string(), bytes);
    }

    pub(crate) fn ttl(&self, key: &str) -> Option<Duration> {
        self.state().records.get(key).and_then(|record| record.ttl)
    }

    pub(crate) fn set_ttl(&self, key: &str, ttl: Duration) {
        if let Some(record) = self.state().records.get_mut(key) {
            record.ttl = Some(ttl);
        }
    }

    pub(crate) fn connections_opened(&self) -> usize {
        self.state().connections_opened
    }

    fn connect(&self) -> Result<MemoryConnection, RedisError> {
        let mut state = self.state();
        if state.offline {
            return Err(RedisError::ConnectionError("Connection refused".to_string()));
        }
        state.connections_opened += 1;
        Ok(MemoryConnection {
            database: self.clone(),
            authenticated: false,
        })
    }

    fn apply(&self, command: Command, authenticated: &mut bool) -> Result<Value, RedisError> {
        let mut state = self.state();
        if state.offline {
            return Err(RedisError::ConnectionError("Connection reset by peer".to_string()));
        }
        if state.failing.contains(command.name()) {
            return Err(RedisError::QueryError(format!(
                "ERR injected failure for {}",
                command.name()
            )));
        }
        if let Command::Auth { password } = &command {
            return match &state.password {
                None => Err(RedisError::QueryError(
                    "ERR AUTH called without any password configured".to_string(),
                )),
                Some(expected) if expected == password => {
                    *authenticated = true;
                    Ok(Value::Okay)
                }
                Some(_) => Err(RedisError::QueryError("WRONGPASS invalid password".to_string())),
            };
        }
        if state.password.is_some() && !*authenticated {
            return Err(RedisError::QueryError(
                "NOAUTH Authentication required".to_string(),
            ));
        }

        let records = &mut state.records;
        let value = match command {
            Command::Auth { .. } => Value::Okay,
            Command::Ping => Value::Status("PONG".to_string()),
            Command::Delete { key } => Value::Int(records.remove(&key).map_or(0, |_| 1)),
            Command::Exists { key } => Value::Int(i64::from(records.contains_key(&key))),
            Command::Expire { key, ttl } => match records.get_mut(&key) {
                Some(record) => {
                    record.ttl = Some(ttl);
                    Value::Int(1)
                }
                None => Value::Int(0),
            },
            Command::HashGet { key, field } => records
                .get(&key)
                .and_then(|record| record.fields.get(&field))
                .map_or(Value::Nil, |value| Value::Data(value.clone())),
            Command::HashSet { key, field, value } => {
                let record = records.entry(key).or_default();
                let previous = record.fields.insert(field, value.into_bytes());
                Value::Int(previous.map_or(1, |_| 0))
            }
            Command::HashDelete { key, field } => {
                let removed = match records.get_mut(&key) {
                    Some(record) => record.fields.remove(&field).is_some(),
                    None => false,
                };
                if records.get(&key).map_or(false, |record| record.fields.is_empty()) {
                    records.remove(&key);
                }
                Value::Int(i64::from(removed))
            }
            Command::Rename { key, new_key } => match records.remove(&key) {
                Some(record) => {
                    records.insert(new_key, record);
                    Value::Okay
                }
                None => return Err(RedisError::QueryError("ERR no such key".to_string())),
            },
        };
        Ok(value)
    }
}

pub(crate) struct MemoryConnection {
    database: MemoryDatabase,
    authenticated: bool,
}

#[async_trait::async_trait]
impl ExecuteCommand for MemoryConnection {
    async fn execute_command<T: FromRedisValue + Send>(
        &mut self,
        command: Command,
    ) -> Result<T, RedisError> {
        let value = self.database.apply(command, &mut self.authenticated)?;
        T::from_redis_value(&value).map_err(|e| RedisError::QueryError(e.to_string()))
    }
}

pub(crate) struct MemoryManager {
    database: MemoryDatabase,
    password: Option<String>,
}

impl MemoryManager {
    pub(crate) fn new(database: MemoryDatabase, config: &Configuration) -> Self {
        Self {
            database,
            password: config.password().map(str::to_string),
        }
    }
}

#[async_trait::async_trait]
impl Manager for MemoryManager {
    type Type = MemoryConnection;
    type Error = RedisError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let connection = self.database.connect()?;
        match &self.password {
            Some(password) => authenticate(connection, password).await,
            None => Ok(connection),
        }
    }

    async fn recycle(&self, connection: &mut Self::Type) -> RecycleResult<Self::Error> {
        ping(connection).await
    }
}

pub(crate) const LIFETIME: Duration = Duration::from_secs(3600);

/// A provider over `database`, configured from `config` the same way `init` does.
pub(crate) fn memory_provider(
    database: &MemoryDatabase,
    config: &str,
) -> RedisProvider<MemoryManager> {
    let config = Configuration::parse(LIFETIME, config).expect("Unable to parse configuration");
    let manager = MemoryManager::new(database.clone(), &config);
    RedisProvider::with_manager(config, manager).expect("Unable to build provider")
}

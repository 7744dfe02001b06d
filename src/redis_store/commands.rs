use std::time::Duration;

/// The remote store commands a session backend needs: field access on a
/// hash-per-session record, whole-key delete, rename and per-key expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Auth {
        password: String,
    },
    Delete {
        key: String,
    },
    Exists {
        key: String,
    },
    Expire {
        key: String,
        ttl: Duration,
    },
    HashDelete {
        key: String,
        field: String,
    },
    HashGet {
        key: String,
        field: String,
    },
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    Ping,
    Rename {
        key: String,
        new_key: String,
    },
}

impl Command {
    pub fn auth(password: impl Into<String>) -> Self {
        Self::Auth {
            password: password.into(),
        }
    }
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }
    pub fn exists(key: impl Into<String>) -> Self {
        Self::Exists { key: key.into() }
    }
    pub fn expire(key: impl Into<String>, ttl: Duration) -> Self {
        Self::Expire {
            key: key.into(),
            ttl,
        }
    }
    pub fn hash_delete(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::HashDelete {
            key: key.into(),
            field: field.into(),
        }
    }
    pub fn hash_get(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::HashGet {
            key: key.into(),
            field: field.into(),
        }
    }
    pub fn hash_set(
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        }
    }
    pub fn ping() -> Self {
        Self::Ping
    }
    pub fn rename(key: impl Into<String>, new_key: impl Into<String>) -> Self {
        Self::Rename {
            key: key.into(),
            new_key: new_key.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Auth { .. } => "AUTH",
            Command::Delete { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Expire { .. } => "EXPIRE",
            Command::HashDelete { .. } => "HDEL",
            Command::HashGet { .. } => "HGET",
            Command::HashSet { .. } => "HSET",
            Command::Ping => "PING",
            Command::Rename { .. } => "RENAME",
        }
    }
}

impl From<Command> for redis::Cmd {
    fn from(command: Command) -> Self {
        let name = command.name();
        match command {
            Command::Auth { password } => redis::cmd(name).arg(&password).clone(),
            Command::Delete { key } => redis::cmd(name).arg(&key).clone(),
            Command::Exists { key } => redis::cmd(name).arg(&key).clone(),
            Command::Expire { key, ttl } => redis::cmd(name).arg(&key).arg(ttl.as_secs()).clone(),
            Command::HashDelete { key, field } => redis::cmd(name).arg(&key).arg(&field).clone(),
            Command::HashGet { key, field } => redis::cmd(name).arg(&key).arg(&field).clone(),
            Command::HashSet { key, field, value } => redis::cmd(name)
                .arg(&key)
                .arg(&field)
                .arg(&value)
                .clone(),
            Command::Ping => redis::cmd(name),
            Command::Rename { key, new_key } => redis::cmd(name).arg(&key).arg(&new_key).clone(),
        }
    }
}

use std::fmt::{Display, Formatter};

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

const KEY_LENGTH: usize = 64;

/// Opaque session identifier, used verbatim as the remote store key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SessionKey(String);

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SessionKey {
    pub fn generate() -> Self {
        let key = OsRng
            .sample_iter(&Alphanumeric)
            .take(KEY_LENGTH)
            .map(char::from)
            .collect::<String>();
        Self(key)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::generate()
    }
}

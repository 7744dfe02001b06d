use serde::{de::DeserializeOwned, Serialize};

use crate::{SessionStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    StorageInsertError(#[from] StorageInsertError),
    #[error(transparent)]
    StorageGetError(#[from] StorageGetError),
    #[error(transparent)]
    StoreError(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageInsertError {
    #[error("Unable to serialize value for key \"{0}\": {1}")]
    SerializeError(String, String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageGetError {
    #[error("Unable to deserialize value for key \"{0}\": {1}")]
    DeserializeError(String, String),
}

/// Typed access to session fields, stored as JSON strings.
#[async_trait::async_trait]
pub trait Storage {
    async fn insert<T: Serialize + Sync>(&mut self, key: &str, value: &T)
        -> Result<(), StorageError>;
    async fn retrieve<T: DeserializeOwned + Send>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, StorageError>;
    async fn remove<T: DeserializeOwned + Send>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, StorageError>;
}

#[async_trait::async_trait]
impl<S> Storage for S
where
    S: SessionStore + ?Sized,
{
    async fn insert<T: Serialize + Sync>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let body = serde_json::to_string(value)
            .map_err(|e| StorageInsertError::SerializeError(key.to_string(), e.to_string()))?;
        self.set(key, &body).await?;
        Ok(())
    }

    async fn retrieve<T: DeserializeOwned + Send>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let value = self.get(key).await;
        let value = value
            .map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(|e| StorageGetError::DeserializeError(key.to_string(), e.to_string()))?;
        Ok(value)
    }

    async fn remove<T: DeserializeOwned + Send>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let value = self.retrieve(key).await?;
        self.delete(key).await?;
        Ok(value)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::AuthToken;
use sqlx::Row;

use crate::repository::{CredentialRepository, StorageError, StoredCredential};

use super::SqliteRepository;

#[async_trait]
impl CredentialRepository for SqliteRepository {
    async fn load_credential(&self) -> Result<Option<StoredCredential>, StorageError> {
        let row = sqlx::query("SELECT token, saved_at FROM credentials WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row
            .try_get("token")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let saved_at: String = row
            .try_get("saved_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .map_err(|err| StorageError::Serialization(err.to_string()))?
            .with_timezone(&Utc);

        // A blank row is treated as signed out rather than as corruption.
        Ok(AuthToken::new(token).map(|token| StoredCredential { token, saved_at }))
    }

    async fn save_credential(&self, credential: &StoredCredential) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO credentials (id, token, saved_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                saved_at = excluded.saved_at
            ",
        )
        .bind(credential.token.expose())
        .bind(credential.saved_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!("credential stored");
        Ok(())
    }

    async fn clear_credential(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}

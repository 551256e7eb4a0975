use super::{KvStore, StoreError};
use crate::framework::DatabaseProcessor;
use crate::utils::clock::unix_now;
use async_trait::async_trait;
use kanau::processor::Processor;

#[derive(Debug, Clone)]
/// Fetch the raw value stored under a namespaced key.
pub struct GetNonceEntry {
    pub namespace: String,
    pub key: Vec<u8>,
}

impl Processor<GetNonceEntry> for DatabaseProcessor {
    type Output = Option<Vec<u8>>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetNonceEntry")]
    async fn process(&self, query: GetNonceEntry) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as(
            r#"
            SELECT value
            FROM nonce_status
            WHERE namespace = ? AND nonce_key = ?
            "#,
        )
        .bind(query.namespace)
        .bind(query.key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(value,)| value))
    }
}

#[derive(Debug, Clone)]
/// Upsert a namespaced key. The previous value, if any, is overwritten.
pub struct PutNonceEntry {
    pub namespace: String,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub updated_at: i64,
}

impl Processor<PutNonceEntry> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:PutNonceEntry")]
    async fn process(&self, insert: PutNonceEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO nonce_status (namespace, nonce_key, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (namespace, nonce_key)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(insert.namespace)
        .bind(insert.key)
        .bind(insert.value)
        .bind(insert.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// [`KvStore`] over the `nonce_status` table, scoped to one namespace.
#[derive(Clone)]
pub struct SqliteKvStore {
    db: DatabaseProcessor,
    namespace: String,
}

impl SqliteKvStore {
    pub fn new(db: DatabaseProcessor, namespace: impl Into<String>) -> Self {
        Self {
            db,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .db
            .process(GetNonceEntry {
                namespace: self.namespace.clone(),
                key: key.to_vec(),
            })
            .await?)
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.db
            .process(PutNonceEntry {
                namespace: self.namespace.clone(),
                key: key.to_vec(),
                value,
                updated_at: unix_now(),
            })
            .await?;
        Ok(())
    }
}

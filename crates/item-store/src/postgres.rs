use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::item::{merge_attributes, require_key, stamp_created_at, validate_update};
use crate::{Item, ItemStore, Result, StoreError, Update};

/// PostgreSQL-backed item store.
///
/// Each logical table is a `(key TEXT PRIMARY KEY, item JSONB)` table. The
/// insert and delete conditions are single statements (`ON CONFLICT DO
/// NOTHING`, `DELETE ... WHERE key`) so the primary-key index is what
/// serializes concurrent writers. Updates lock the row, check the merged item
/// against `I`, and only then write it.
pub struct PostgresItemStore<I: Item> {
    pool: PgPool,
    table: String,
    _item: PhantomData<fn() -> I>,
}

impl<I: Item> PostgresItemStore<I> {
    /// Creates a store over `table`.
    ///
    /// The table name is interpolated into SQL, so it must be a plain
    /// identifier: ASCII letters, digits and underscores, not starting with a
    /// digit.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            pool,
            table,
            _item: PhantomData,
        })
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, item JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        tracing::info!(table = %self.table, "item table ready");
        Ok(())
    }

    fn not_found(&self, key: &str, operation: &'static str) -> StoreError {
        metrics::counter!("item_store_conditional_failures_total", "operation" => operation)
            .increment(1);
        tracing::debug!(table = %self.table, key, operation, "conditional check failed");
        StoreError::NotFound {
            key: key.to_string(),
        }
    }
}

impl<I: Item> Clone for PostgresItemStore<I> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<I: Item> ItemStore for PostgresItemStore<I> {
    type Item = I;

    async fn get_by_key(&self, key: &str) -> Result<I> {
        require_key(key)?;

        let sql = format!("SELECT item FROM {} WHERE key = $1", self.table);
        let row: Option<serde_json::Value> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn create_if_absent(&self, mut item: I) -> Result<I> {
        require_key(item.key())?;
        stamp_created_at(&mut item);
        let value = serde_json::to_value(&item)?;

        let sql = format!(
            "INSERT INTO {} (key, item) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(item.key())
            .bind(value)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            metrics::counter!("item_store_conditional_failures_total", "operation" => "create")
                .increment(1);
            tracing::debug!(table = %self.table, key = item.key(), "conditional insert rejected");
            return Err(StoreError::AlreadyExists {
                key: item.key().to_string(),
            });
        }

        Ok(item)
    }

    async fn update_if_present(&self, key: &str, update: Update) -> Result<I> {
        require_key(key)?;
        validate_update::<I>(&update)?;

        // The row lock holds off concurrent writers until the merged item has
        // been checked and written. Any early return drops `tx` and rolls back.
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT item FROM {} WHERE key = $1 FOR UPDATE", self.table);
        let row: Option<serde_json::Value> = sqlx::query_scalar(&select)
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut value) = row else {
            return Err(self.not_found(key, "update"));
        };

        merge_attributes(&mut value, &update)?;
        let updated: I = serde_json::from_value(value.clone())?;

        let write = format!("UPDATE {} SET item = $2 WHERE key = $1", self.table);
        sqlx::query(&write)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_if_present(&self, key: &str) -> Result<()> {
        require_key(key)?;

        let sql = format!("DELETE FROM {} WHERE key = $1", self.table);
        let result = sqlx::query(&sql).bind(key).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found(key, "delete"));
        }
        Ok(())
    }
}

fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(StoreError::InvalidInput(format!(
            "invalid table name '{table}'"
        )));
    }
    Ok(())
}

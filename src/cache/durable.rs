//! Durable Store Module
//!
//! Tier 2: a single persisted key-value table in SQLite, accessed through an
//! async sqlx pool. Survives process restart and is the tier of last resort
//! on a memory miss. The table is cache-only and may be truncated at any
//! time without affecting the system of record.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::Result;

/// Raw durable tier row, value still encoded.
#[derive(Debug, FromRow)]
pub struct StoredEntry {
    pub value: String,
    pub timestamp: i64,
    pub ttl: i64,
}

// == Durable Store ==
/// SQLite-backed tier-2 store.
///
/// Locking is left to SQLite's own transaction semantics; the cache adds no
/// lock of its own around durable operations.
#[derive(Debug, Clone)]
pub struct DurableStore {
    pool: SqlitePool,
}

impl DurableStore {
    // == Constructor ==
    /// Connects to the durable tier and creates the backing table if it
    /// does not exist yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cache_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                ttl INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    // == Upsert ==
    /// Writes an entry, fully replacing any previous row under the key.
    pub async fn upsert(&self, key: &str, value: &str, timestamp: u64, ttl_ms: u64) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO cache_store (key, value, timestamp, ttl) VALUES (?, ?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(timestamp as i64)
            .bind(ttl_ms as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // == Fetch ==
    /// Reads the raw row for a key, expired or not.
    pub async fn fetch(&self, key: &str) -> Result<Option<StoredEntry>> {
        let row = sqlx::query_as::<_, StoredEntry>(
            "SELECT value, timestamp, ttl FROM cache_store WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // == Remove ==
    /// Deletes a key; absent keys are a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM cache_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // == Remove Matching ==
    /// Deletes every row whose key contains `pattern` as a substring.
    ///
    /// LIKE wildcards inside the pattern are escaped so the match stays a
    /// plain substring test, mirroring the memory tier.
    pub async fn remove_matching(&self, pattern: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cache_store WHERE key LIKE ? ESCAPE '\\'")
            .bind(like_substring(pattern))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // == Clear ==
    /// Truncates the table.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM cache_store")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // == Count ==
    /// Number of rows currently persisted, dead or alive.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cache_store")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    // == Sweep Expired ==
    /// Deletes every row dead at `now_ms`.
    pub async fn sweep_expired(&self, now_ms: u64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cache_store WHERE timestamp + ttl < ?")
            .bind(now_ms as i64)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // == Close ==
    /// Closes the pool. Subsequent operations fail with a storage error,
    /// which the engine degrades to memory-only behavior.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Builds a `%…%` LIKE pattern matching keys that contain `pattern`
/// literally, escaping `%`, `_` and the escape character itself.
fn like_substring(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

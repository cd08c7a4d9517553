use super::{hash_secret, CredentialStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use std::time::Duration;
use tracing::{info_span, instrument, Instrument};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Postgres-backed credential gate, keyed by email with atomic upsert.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and make sure the credential table exists.
    ///
    /// # Errors
    /// Returns an error if the connection or schema setup fails.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.migrate().await?;

        Ok(store)
    }

    /// Apply `sql/schema.sql`; every statement is idempotent.
    ///
    /// # Errors
    /// Returns an error if a statement fails.
    pub async fn migrate(&self) -> Result<()> {
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "CREATE");
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("Failed to apply credential schema")?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self, secret))]
    async fn upsert(&self, email: &str, secret: &str) -> Result<()> {
        let query = r"
            INSERT INTO otp_credentials (email, secret_hash)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE
            SET secret_hash = EXCLUDED.secret_hash,
                updated_at = NOW()
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(email)
            .bind(hash_secret(email, secret))
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("Failed to upsert credential")?;

        Ok(())
    }

    #[instrument(skip(self, secret))]
    async fn matches(&self, email: &str, secret: &str) -> Result<bool> {
        let query = "SELECT secret_hash FROM otp_credentials WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let stored: Option<Vec<u8>> = sqlx::query_scalar(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("Failed to look up credential")?;

        Ok(stored.is_some_and(|stored| stored == hash_secret(email, secret)))
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("Failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("Failed to ping database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_credential_table() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS otp_credentials"));
        assert!(SCHEMA_SQL.contains("email       TEXT PRIMARY KEY"));
    }

    #[tokio::test]
    async fn lazy_pool_builds_without_database() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let store = PgCredentialStore::new(pool);
        assert!(format!("{store:?}").contains("PgCredentialStore"));
        Ok(())
    }
}

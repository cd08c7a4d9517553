use super::{ConsumeOutcome, OtpStore};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::Script;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

// Returns 1 when consumed, 0 on mismatch, -1 when the key is missing or expired.
const COMPARE_AND_DELETE: &str = r"
local current = redis.call('GET', KEYS[1])
if not current then
    return -1
end
if current == ARGV[1] then
    redis.call('DEL', KEYS[1])
    return 1
end
return 0
";

#[derive(Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<SecretString>,
}

impl RedisConfig {
    /// Build the `redis://` connection URL.
    ///
    /// # Errors
    /// Returns an error if the host cannot be used in a URL.
    pub fn url(&self) -> Result<String> {
        let mut url = Url::parse(&format!("redis://{}:{}/{}", self.host, self.port, self.db))
            .with_context(|| format!("invalid redis host: {}", self.host))?;

        if let Some(password) = &self.password {
            url.set_password(Some(password.expose_secret()))
                .map_err(|()| anyhow!("Error setting redis password"))?;
        }

        Ok(url.to_string())
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Redis-backed store. Expiry is delegated to Redis (`SET ... EX`).
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    compare_and_delete: Script,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisStore {
    /// Create the connection pool and verify the server answers `PING`.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or Redis is unreachable.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let pool = Config::from_url(config.url()?)
            .create_pool(Some(Runtime::Tokio1))
            .context("Failed to create Redis pool")?;

        let store = Self {
            pool,
            compare_and_delete: Script::new(COMPARE_AND_DELETE),
        };

        store.ping().await.context("Failed to connect to Redis")?;

        info!(
            "Redis store initialized: host={}, port={}, db={}",
            config.host, config.port, config.db
        );

        Ok(store)
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .context("Failed to get Redis connection")
    }
}

#[async_trait]
impl OtpStore for RedisStore {
    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;

        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);

        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut *conn)
            .await
            .with_context(|| format!("Failed to store {key}"))?;

        debug!("stored {} with ttl {}s", key, seconds);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut *conn)
            .await
            .with_context(|| format!("Failed to read {key}"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut *conn)
            .await
            .with_context(|| format!("Failed to delete {key}"))
    }

    #[instrument(skip(self, expected))]
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<ConsumeOutcome> {
        let mut conn = self.connection().await?;

        let result: i64 = self
            .compare_and_delete
            .key(key)
            .arg(expected)
            .invoke_async(&mut *conn)
            .await
            .with_context(|| format!("Failed to consume {key}"))?;

        match result {
            1 => Ok(ConsumeOutcome::Consumed),
            0 => Ok(ConsumeOutcome::Mismatch),
            -1 => Ok(ConsumeOutcome::Missing),
            other => Err(anyhow!("unexpected compare-and-delete reply: {other}")),
        }
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut *conn)
            .await
            .context("Redis PING failed")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RedisConfig {
        RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 2,
            password: None,
        }
    }

    #[test]
    fn url_without_password() -> Result<()> {
        assert_eq!(config().url()?, "redis://127.0.0.1:6379/2");
        Ok(())
    }

    #[test]
    fn url_with_password() -> Result<()> {
        let config = RedisConfig {
            password: Some(SecretString::from("s3cret".to_string())),
            ..config()
        };
        assert_eq!(config.url()?, "redis://:s3cret@127.0.0.1:6379/2");
        Ok(())
    }

    #[test]
    fn debug_redacts_password() {
        let config = RedisConfig {
            password: Some(SecretString::from("s3cret".to_string())),
            ..config()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn url_rejects_bad_host() {
        let config = RedisConfig {
            host: "bad host".to_string(),
            ..config()
        };
        assert!(config.url().is_err());
    }
}

//! Redis storage handle
//!
//! Wraps a redis client whose connection manager is created on first use.
//! Every command runs under a bounded exponential-backoff retry policy that
//! only retries busy-loading, connection and timeout errors.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ErrorKind, RedisError, RedisResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{get_settings, Settings};
use crate::utils::errors::{MyBotError, Result};

static REDIS_STORAGE: OnceCell<Arc<RedisStorage>> = OnceCell::new();

// Connection manager backoff; never applied since it makes a single attempt
const CONNECT_BACKOFF_BASE_MS: u64 = 2;
const CONNECT_BACKOFF_FACTOR: u64 = 100;

/// Process-wide Redis storage, built from settings on first access
pub fn get_redis_storage() -> Result<Arc<RedisStorage>> {
    REDIS_STORAGE
        .get_or_try_init(|| {
            let settings = get_settings()?;
            RedisStorage::from_settings(&settings).map(Arc::new)
        })
        .cloned()
}

/// Exponential backoff: `base * 2^failures`, capped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub cap: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(8),
            cap: Duration::from_millis(512),
        }
    }
}

impl ExponentialBackoff {
    /// Delay before the next attempt after `failures` failed attempts
    pub fn compute(&self, failures: u32) -> Duration {
        let factor = 2u32.checked_pow(failures).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .map_or(self.cap, |delay| delay.min(self.cap))
    }
}

/// Connection options for [`RedisStorage`]
#[derive(Debug, Clone)]
pub struct RedisOptions {
    pub url: String,
    pub key_prefix: String,
    pub decode_responses: bool,
    pub retries: u32,
    pub backoff: ExponentialBackoff,
}

impl RedisOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            url: settings.redis_dsn(),
            key_prefix: settings.app_keyprefix(),
            decode_responses: settings.redis_decode_responses,
            retries: settings.redis_retries,
            backoff: ExponentialBackoff::default(),
        }
    }
}

/// A value read back from Redis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl StoredValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            StoredValue::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }
}

/// Run `attempt` until it succeeds, fails permanently or `retries` retries are spent
///
/// At most `retries + 1` attempts are made. Only Redis errors accepted by
/// [`is_retryable`] are retried.
pub async fn retry_transient<T, F, Fut>(
    operation: &str,
    retries: u32,
    backoff: ExponentialBackoff,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut failures = 0u32;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(MyBotError::Redis(ref e)) if is_retryable(e) && failures < retries => {
                let delay = backoff.compute(failures);
                failures += 1;
                warn!(
                    operation = operation,
                    attempt = failures,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient Redis error, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Whether a failed command is worth retrying
pub fn is_retryable(error: &RedisError) -> bool {
    error.kind() == ErrorKind::BusyLoadingError
        || error.is_connection_dropped()
        || error.is_connection_refusal()
        || error.is_timeout()
        || error.is_io_error()
}

/// Key-value storage with lazy connection and retries
pub struct RedisStorage {
    client: Client,
    options: RedisOptions,
    connection: Mutex<Option<ConnectionManager>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("key_prefix", &self.options.key_prefix)
            .field("decode_responses", &self.options.decode_responses)
            .field("retries", &self.options.retries)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl RedisStorage {
    /// Create a new storage handle; no connection is opened yet
    pub fn new(options: RedisOptions) -> Result<Self> {
        let client = Client::open(options.url.as_str())?;

        Ok(Self {
            client,
            options,
            connection: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(RedisOptions::from_settings(settings))
    }

    /// `"<PREFIX>_<key>"`
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}_{}", self.options.key_prefix, key)
    }

    pub fn options(&self) -> &RedisOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Get the shared connection manager, connecting on first use
    ///
    /// The manager makes a single connection attempt; retries belong to
    /// [`retry_transient`] so `retries` bounds them.
    async fn connection(&self) -> Result<ConnectionManager> {
        if self.is_closed() {
            let reason = "redis storage is closed".to_string();
            return Err(MyBotError::ServiceUnavailable(reason));
        }

        let mut slot = self.connection.lock().await;
        if let Some(ref manager) = *slot {
            return Ok(manager.clone());
        }

        let manager = ConnectionManager::new_with_backoff(
            self.client.clone(),
            CONNECT_BACKOFF_BASE_MS,
            CONNECT_BACKOFF_FACTOR,
            0,
        )
        .await?;
        info!(prefix = %self.options.key_prefix, "Redis connection established");
        *slot = Some(manager.clone());
        Ok(manager)
    }

    /// Run a command, retrying transient failures with exponential backoff
    async fn with_retry<T, F, Fut>(&self, operation: &str, command: F) -> Result<T>
    where
        F: Fn(ConnectionManager) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let command = &command;
        let backoff = self.options.backoff;
        retry_transient(operation, self.options.retries, backoff, move || async move {
            let conn = self.connection().await?;
            match command(conn).await {
                Ok(value) => Ok(value),
                Err(e) => {
                    // Reconnect on the next attempt
                    if e.is_connection_dropped() || e.is_io_error() {
                        self.connection.lock().await.take();
                    }
                    Err(e.into())
                }
            }
        })
        .await
    }

    /// Get a value by (unprefixed) key
    pub async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        let full_key = self.prefixed_key(key);
        let raw: Option<Vec<u8>> = self
            .with_retry("get", |mut conn| {
                let full_key = full_key.clone();
                async move { conn.get(full_key).await }
            })
            .await?;

        debug!(key = %full_key, found = raw.is_some(), "Value read from Redis");
        raw.map(|bytes| self.decode(&full_key, bytes)).transpose()
    }

    fn decode(&self, full_key: &str, bytes: Vec<u8>) -> Result<StoredValue> {
        if !self.options.decode_responses {
            return Ok(StoredValue::Bytes(bytes));
        }
        String::from_utf8(bytes)
            .map(StoredValue::Text)
            .map_err(|_| {
                MyBotError::InvalidInput(format!("value at {} is not valid UTF-8", full_key))
            })
    }

    /// Set a value, with an optional TTL in seconds
    pub async fn set(
        &self,
        key: &str,
        value: impl AsRef<[u8]>,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let full_key = self.prefixed_key(key);
        let value = value.as_ref().to_vec();

        let _: () = self.with_retry("set", |mut conn| {
            let full_key = full_key.clone();
            let value = value.clone();
            async move {
                match ttl_seconds {
                    Some(ttl) => {
                        redis::cmd("SET")
                            .arg(full_key)
                            .arg(value)
                            .arg("EX")
                            .arg(ttl)
                            .query_async(&mut conn)
                            .await
                    }
                    None => conn.set(full_key, value).await,
                }
            }
        })
        .await?;

        debug!(key = %full_key, ttl = ?ttl_seconds, "Value set in Redis");
        Ok(())
    }

    /// Delete a key; returns whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let full_key = self.prefixed_key(key);
        let deleted: i64 = self
            .with_retry("delete", |mut conn| {
                let full_key = full_key.clone();
                async move { conn.del(full_key).await }
            })
            .await?;

        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// Round-trip a PING
    pub async fn ping(&self) -> Result<()> {
        let response: String = self
            .with_retry("ping", |mut conn| async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;

        debug!(response = %response, "Redis ping");
        Ok(())
    }

    /// Drop the connection; later calls fail instead of reconnecting
    pub async fn aclose(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.connection.lock().await.take();
        info!("Redis storage closed");
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use super::error::JobError;

/// The key/value operations the job pipeline needs. `KvStore` is the
/// production implementation; `InMemoryStore` is a test double so the
/// pipeline can be exercised without a live Redis.
#[async_trait]
pub trait Store: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), JobError>;
    async fn get(&self, key: &str) -> Result<Option<String>, JobError>;
    async fn lpush(&self, key: &str, value: &str) -> Result<(), JobError>;
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, JobError>;
}

/// Thin wrapper over the shared key/value store. Every call opens a fresh
/// multiplexed connection, mirroring the source's per-call `async with
/// redis.from_url(...)` pattern rather than holding one long-lived handle.
#[derive(Clone)]
pub struct KvStore {
    client: redis::Client,
}

impl KvStore {
    pub fn new(url: &str) -> Result<Self, JobError> {
        Ok(KvStore {
            client: redis::Client::open(url)?,
        })
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, JobError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl Store for KvStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), JobError> {
        self.conn().await?.set(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, JobError> {
        Ok(self.conn().await?.get(key).await?)
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), JobError> {
        self.conn().await?.lpush(key, value).await?;
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, JobError> {
        Ok(self.conn().await?.lrange(key, start, stop).await?)
    }
}

/// An in-process stand-in for `KvStore`: a map of strings plus a separate
/// map of lists, so `lpush`/`lrange` follow Redis's own list semantics
/// (negative indices count from the end, `stop` is inclusive). Lets the
/// job pipeline's tests run without a live Redis.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    strings: Arc<Mutex<HashMap<String, String>>>,
    lists: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), JobError> {
        self.strings.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, JobError> {
        Ok(self.strings.lock().await.get(key).cloned())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), JobError> {
        self.lists
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, JobError> {
        let lists = self.lists.lock().await;
        let Some(list) = lists.get(key) else {
            return Ok(Vec::new());
        };

        let len = list.len() as isize;
        if len == 0 {
            return Ok(Vec::new());
        }

        let norm_start = if start < 0 { (len + start).max(0) } else { start.min(len - 1) };
        let norm_stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if norm_stop < norm_start || norm_start >= len {
            return Ok(Vec::new());
        }

        Ok(list[norm_start as usize..=norm_stop as usize].to_vec())
    }
}

//! 内存缓存

use crate::{millis_option, positive_millis};
use async_trait::async_trait;
use caching_abstractions::Cache;
use di_abstractions::{Cleanable, Component, Configurable};
use infrastructure_common::{ConfigError, ConfigParams, Context, InfrastructureError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 默认过期时间
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(60_000);
/// 默认最大条目数
pub const DEFAULT_CACHE_MAX_SIZE: usize = 1000;

struct CacheEntry {
    value: Value,
    expiration: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expiration
    }
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    timeout: Duration,
    max_size: usize,
}

impl CacheState {
    /// 删除所有过期条目；仍超过上限时淘汰最早过期的一个
    fn cleanup(&mut self, now: Instant) {
        self.entries.retain(|_, entry| !entry.is_expired(now));

        if self.entries.len() > self.max_size {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.expiration)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                debug!(key = %key, "缓存超出上限，淘汰最早过期的条目");
                self.entries.remove(&key);
            }
        }
    }
}

/// 内存缓存
///
/// 配置项：
/// - `options.timeout`：默认过期时间（毫秒），默认 60000
/// - `options.max_size`：最大条目数，默认 1000
pub struct MemoryCache {
    state: Mutex<CacheState>,
}

impl MemoryCache {
    /// 使用默认配置创建
    pub fn new() -> Self {
        Self::with_options(DEFAULT_CACHE_TIMEOUT, DEFAULT_CACHE_MAX_SIZE)
    }

    /// 使用指定的默认过期时间与最大条目数创建
    pub fn with_options(timeout: Duration, max_size: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                timeout,
                max_size,
            }),
        }
    }

    /// 默认过期时间
    pub fn timeout(&self) -> Duration {
        self.state.lock().timeout
    }

    /// 最大条目数
    pub fn max_size(&self) -> usize {
        self.state.lock().max_size
    }

    /// 当前条目数（包含尚未清理的过期条目）
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn retrieve(
        &self,
        _context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        let mut state = self.state.lock();
        let now = Instant::now();

        let Some(entry) = state.entries.get(key) else {
            return Ok(None);
        };
        if !entry.is_expired(now) {
            return Ok(Some(entry.value.clone()));
        }

        state.entries.remove(key);
        Ok(None)
    }

    async fn store(
        &self,
        _context: Option<&Context>,
        key: &str,
        value: Value,
        timeout: i64,
    ) -> Result<Value, InfrastructureError> {
        let mut state = self.state.lock();
        let now = Instant::now();
        let ttl = positive_millis(timeout).unwrap_or(state.timeout);

        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                expiration: now + ttl,
            },
        );

        if state.entries.len() > state.max_size {
            state.cleanup(now);
        }
        Ok(value)
    }

    async fn remove(&self, _context: Option<&Context>, key: &str) -> Result<(), InfrastructureError> {
        self.state.lock().entries.remove(key);
        Ok(())
    }
}

impl Configurable for MemoryCache {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        let timeout = millis_option(config, "options.timeout", state.timeout);
        let max_size = i64::try_from(state.max_size).unwrap_or(i64::MAX);
        let max_size = config.get_as_long_with_default("options.max_size", max_size);

        state.timeout = timeout;
        state.max_size = usize::try_from(max_size).unwrap_or(0);
        Ok(())
    }
}

#[async_trait]
impl Cleanable for MemoryCache {
    async fn clear(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.state.lock().entries.clear();
        Ok(())
    }
}

impl Component for MemoryCache {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn as_cleanable(&self) -> Option<&dyn Cleanable> {
        Some(self)
    }

    fn into_cache(self: Arc<Self>) -> Option<Arc<dyn Cache>> {
        Some(self)
    }
}

/// 空缓存，从不保存任何值
#[derive(Debug, Default)]
pub struct NullCache;

impl NullCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cache for NullCache {
    async fn retrieve(
        &self,
        _context: Option<&Context>,
        _key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        Ok(None)
    }

    async fn store(
        &self,
        _context: Option<&Context>,
        _key: &str,
        value: Value,
        _timeout: i64,
    ) -> Result<Value, InfrastructureError> {
        Ok(value)
    }

    async fn remove(&self, _context: Option<&Context>, _key: &str) -> Result<(), InfrastructureError> {
        Ok(())
    }
}

impl Component for NullCache {
    fn into_cache(self: Arc<Self>) -> Option<Arc<dyn Cache>> {
        Some(self)
    }
}

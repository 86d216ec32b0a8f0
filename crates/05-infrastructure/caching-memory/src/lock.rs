//! 内存锁

use crate::millis_option;
use async_trait::async_trait;
use caching_abstractions::{Lock, DEFAULT_RETRY_TIMEOUT_MS};
use di_abstractions::{Component, Configurable};
use infrastructure_common::{ConfigError, ConfigParams, Context, InfrastructureError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 进程内的锁
///
/// 锁只记录过期时间，不记录持有者，任何调用方都可以释放任何锁。
/// 只适用于单进程内的协调。
///
/// 配置项：
/// - `options.retry_timeout`：阻塞获取时的重试间隔（毫秒），默认 100
pub struct MemoryLock {
    locks: Mutex<HashMap<String, Instant>>,
    retry_timeout: Mutex<Duration>,
}

impl MemoryLock {
    /// 创建内存锁
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            retry_timeout: Mutex::new(Duration::from_millis(DEFAULT_RETRY_TIMEOUT_MS)),
        }
    }
}

impl Default for MemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Lock for MemoryLock {
    async fn try_acquire_lock(
        &self,
        _context: Option<&Context>,
        key: &str,
        ttl: i64,
    ) -> Result<bool, InfrastructureError> {
        let mut locks = self.locks.lock();
        let now = Instant::now();

        if let Some(expiration) = locks.get(key) {
            if *expiration > now {
                return Ok(false);
            }
        }

        let ttl = Duration::from_millis(u64::try_from(ttl).unwrap_or(0));
        locks.insert(key.to_string(), now + ttl);
        debug!(key, "获取锁");
        Ok(true)
    }

    async fn release_lock(
        &self,
        _context: Option<&Context>,
        key: &str,
    ) -> Result<(), InfrastructureError> {
        self.locks.lock().remove(key);
        debug!(key, "释放锁");
        Ok(())
    }

    fn retry_timeout(&self) -> Duration {
        *self.retry_timeout.lock()
    }
}

impl Configurable for MemoryLock {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let current = self.retry_timeout();
        *self.retry_timeout.lock() = millis_option(config, "options.retry_timeout", current);
        Ok(())
    }
}

impl Component for MemoryLock {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn into_lock(self: Arc<Self>) -> Option<Arc<dyn Lock>> {
        Some(self)
    }
}

/// 空锁，总是获取成功
#[derive(Debug, Default)]
pub struct NullLock;

impl NullLock {
    /// 创建空锁
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Lock for NullLock {
    async fn try_acquire_lock(
        &self,
        _context: Option<&Context>,
        _key: &str,
        _ttl: i64,
    ) -> Result<bool, InfrastructureError> {
        Ok(true)
    }

    async fn release_lock(
        &self,
        _context: Option<&Context>,
        _key: &str,
    ) -> Result<(), InfrastructureError> {
        Ok(())
    }
}

impl Component for NullLock {
    fn into_lock(self: Arc<Self>) -> Option<Arc<dyn Lock>> {
        Some(self)
    }
}

//! 内存状态存储

use crate::millis_option;
use async_trait::async_trait;
use caching_abstractions::{StateStore, StateValue};
use di_abstractions::{Component, Configurable};
use infrastructure_common::{ConfigError, ConfigParams, Context, InfrastructureError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct StateEntry {
    value: Value,
    last_updated: Instant,
}

struct StoreState {
    entries: HashMap<String, StateEntry>,
    timeout: Duration,
}

impl StoreState {
    /// 清除超过全局超时未更新的条目，超时为 0 时不清理
    fn purge(&mut self, now: Instant) {
        if self.timeout.is_zero() {
            return;
        }
        let timeout = self.timeout;
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_updated) < timeout);
    }
}

/// 内存状态存储
///
/// 配置项：
/// - `options.timeout`：状态的全局超时（毫秒），默认 0 表示永不过期
pub struct MemoryStateStore {
    state: Mutex<StoreState>,
}

impl MemoryStateStore {
    /// 创建内存状态存储
    pub fn new() -> Self {
        Self::with_timeout(Duration::ZERO)
    }

    /// 使用指定的全局超时创建
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                timeout,
            }),
        }
    }

    /// 全局超时
    pub fn timeout(&self) -> Duration {
        self.state.lock().timeout
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(
        &self,
        _context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        let mut state = self.state.lock();
        state.purge(Instant::now());
        Ok(state.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn load_bulk(
        &self,
        _context: Option<&Context>,
        keys: &[String],
    ) -> Result<Vec<StateValue>, InfrastructureError> {
        let mut state = self.state.lock();
        state.purge(Instant::now());
        Ok(keys
            .iter()
            .filter_map(|key| {
                state
                    .entries
                    .get(key)
                    .map(|entry| StateValue::new(key.clone(), entry.value.clone()))
            })
            .collect())
    }

    async fn save(
        &self,
        _context: Option<&Context>,
        key: &str,
        value: Value,
    ) -> Result<Value, InfrastructureError> {
        let mut state = self.state.lock();
        let now = Instant::now();
        state.purge(now);
        state.entries.insert(
            key.to_string(),
            StateEntry {
                value: value.clone(),
                last_updated: now,
            },
        );
        Ok(value)
    }

    async fn delete(
        &self,
        _context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        let mut state = self.state.lock();
        state.purge(Instant::now());
        Ok(state.entries.remove(key).map(|entry| entry.value))
    }
}

impl Configurable for MemoryStateStore {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        let timeout = millis_option(config, "options.timeout", state.timeout);
        state.timeout = timeout;
        Ok(())
    }
}

impl Component for MemoryStateStore {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn into_state_store(self: Arc<Self>) -> Option<Arc<dyn StateStore>> {
        Some(self)
    }
}

/// 空状态存储，从不保存任何值
#[derive(Debug, Default)]
pub struct NullStateStore;

impl NullStateStore {
    /// 创建空状态存储
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StateStore for NullStateStore {
    async fn load(
        &self,
        _context: Option<&Context>,
        _key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        Ok(None)
    }

    async fn load_bulk(
        &self,
        _context: Option<&Context>,
        _keys: &[String],
    ) -> Result<Vec<StateValue>, InfrastructureError> {
        Ok(Vec::new())
    }

    async fn save(
        &self,
        _context: Option<&Context>,
        _key: &str,
        value: Value,
    ) -> Result<Value, InfrastructureError> {
        Ok(value)
    }

    async fn delete(
        &self,
        _context: Option<&Context>,
        _key: &str,
    ) -> Result<Option<Value>, InfrastructureError> {
        Ok(None)
    }
}

impl Component for NullStateStore {
    fn into_state_store(self: Arc<Self>) -> Option<Arc<dyn StateStore>> {
        Some(self)
    }
}

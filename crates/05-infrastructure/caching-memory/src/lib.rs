//! # In-memory Caching
//!
//! 进程内的缓存、锁与状态存储实现，以及对应的空实现。
//!
//! 每个实例只用一把互斥锁保护内部表，临界区都是同步的短操作，不会跨越 `.await`。
//! 不同实例之间互不争用。
//!
//! ## 主要组件
//!
//! - [`MemoryCache`] / [`NullCache`]
//! - [`MemoryLock`] / [`NullLock`]
//! - [`MemoryStateStore`] / [`NullStateStore`]
//! - [`cache_factory`] / [`lock_factory`] / [`state_store_factory`] - 按描述符创建上述组件的工厂

pub mod cache;
pub mod factory;
pub mod lock;
pub mod state;

pub use cache::*;
pub use factory::*;
pub use lock::*;
pub use state::*;

use infrastructure_common::ConfigParams;
use std::time::Duration;

/// 读取毫秒配置项，负数按 0 处理
pub(crate) fn millis_option(config: &ConfigParams, key: &str, default: Duration) -> Duration {
    let default_ms = i64::try_from(default.as_millis()).unwrap_or(i64::MAX);
    let value = config.get_as_long_with_default(key, default_ms);
    Duration::from_millis(u64::try_from(value).unwrap_or(0))
}

/// 将毫秒参数转换为时长，小于等于 0 时返回 `None`
pub(crate) fn positive_millis(value: i64) -> Option<Duration> {
    u64::try_from(value)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

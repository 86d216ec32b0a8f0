//! # Caching Abstractions
//!
//! 缓存、分布式锁与状态存储的抽象接口。传输层与存储适配器只依赖这些接口，
//! 具体实现（内存、Redis 等）通过工厂按配置创建。
//!
//! ## 核心接口
//!
//! - [`Cache`] / [`CacheExt`] - 带过期时间的键值缓存
//! - [`Lock`] - 按键互斥的锁
//! - [`StateStore`] - 键值状态存储

pub mod cache;
pub mod lock;
pub mod state;

pub use cache::*;
pub use lock::*;
pub use state::*;

//! 缓存、锁与状态存储的默认工厂

use crate::{MemoryCache, MemoryLock, MemoryStateStore, NullCache, NullLock, NullStateStore};
use di_impl::DefaultFactory;
use infrastructure_common::Descriptor;

/// 内存缓存描述符
pub fn memory_cache_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "cache", "memory", "*", "1.0")
}

/// 空缓存描述符
pub fn null_cache_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "cache", "null", "*", "1.0")
}

/// 内存锁描述符
pub fn memory_lock_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "lock", "memory", "*", "1.0")
}

/// 空锁描述符
pub fn null_lock_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "lock", "null", "*", "1.0")
}

/// 内存状态存储描述符
pub fn memory_state_store_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "state-store", "memory", "*", "1.0")
}

/// 空状态存储描述符
pub fn null_state_store_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "state-store", "null", "*", "1.0")
}

/// 创建缓存工厂
pub fn cache_factory() -> DefaultFactory {
    let factory = DefaultFactory::new();
    factory.register_as_type::<MemoryCache>(memory_cache_descriptor());
    factory.register_as_type::<NullCache>(null_cache_descriptor());
    factory
}

/// 创建锁工厂
pub fn lock_factory() -> DefaultFactory {
    let factory = DefaultFactory::new();
    factory.register_as_type::<MemoryLock>(memory_lock_descriptor());
    factory.register_as_type::<NullLock>(null_lock_descriptor());
    factory
}

/// 创建状态存储工厂
pub fn state_store_factory() -> DefaultFactory {
    let factory = DefaultFactory::new();
    factory.register_as_type::<MemoryStateStore>(memory_state_store_descriptor());
    factory.register_as_type::<NullStateStore>(null_state_store_descriptor());
    factory
}

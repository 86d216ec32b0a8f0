//! 容器默认工厂

use crate::context_info::context_info_factory;
use caching_memory::{cache_factory, lock_factory, state_store_factory};
use di_abstractions::{Component, Factory};
use di_impl::CompositeFactory;
use infrastructure_common::{DependencyError, Descriptor, Locator};
use std::sync::Arc;

/// 容器工厂在引用表中的描述符
pub fn container_factory_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "factory", "container", "default", "1.0")
}

/// 容器默认工厂
///
/// 预置上下文信息、内存缓存、锁与状态存储的工厂。后添加的工厂优先。
pub struct DefaultContainerFactory {
    factories: CompositeFactory,
}

impl DefaultContainerFactory {
    /// 创建带默认工厂的容器工厂
    pub fn new() -> Self {
        Self::with_factories(Vec::new())
    }

    /// 在默认工厂之后追加自定义工厂
    pub fn with_factories(factories: Vec<Arc<dyn Factory>>) -> Self {
        let composite = CompositeFactory::from_factories(vec![
            Arc::new(context_info_factory()) as Arc<dyn Factory>,
            Arc::new(cache_factory()),
            Arc::new(lock_factory()),
            Arc::new(state_store_factory()),
        ]);
        for factory in factories {
            composite.add(factory);
        }
        Self {
            factories: composite,
        }
    }

    /// 添加工厂
    pub fn add(&self, factory: Arc<dyn Factory>) {
        self.factories.add(factory);
    }

    /// 移除工厂
    pub fn remove(&self, factory: &Arc<dyn Factory>) {
        self.factories.remove(factory);
    }

    /// 子工厂数量
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for DefaultContainerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory for DefaultContainerFactory {
    fn can_create(&self, locator: &Locator) -> Option<Locator> {
        self.factories.can_create(locator)
    }

    fn create(&self, locator: &Locator) -> Result<Arc<dyn Component>, DependencyError> {
        self.factories.create(locator)
    }
}

impl Component for DefaultContainerFactory {
    fn as_factory(&self) -> Option<&dyn Factory> {
        Some(self)
    }
}

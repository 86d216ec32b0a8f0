//! 组件引用表抽象接口

use crate::component::{downcast_component, Component};
use caching_abstractions::{Cache, Lock, StateStore};
use infrastructure_common::{DependencyError, Locator};
use std::any::Any;
use std::sync::Arc;

/// 组件引用表
///
/// 保存 (定位符, 组件) 对，允许重复定位符。单个结果的查询返回最近放入的匹配项，
/// 多个结果的查询按放入顺序返回。
pub trait References: Send + Sync {
    /// 放入组件
    fn put(&self, locator: Locator, component: Arc<dyn Component>);

    /// 移除最近放入的匹配组件
    fn remove(&self, locator: &Locator) -> Option<Arc<dyn Component>>;

    /// 移除所有匹配组件
    fn remove_all(&self, locator: &Locator) -> Vec<Arc<dyn Component>>;

    /// 获取所有定位符
    fn get_all_locators(&self) -> Vec<Locator>;

    /// 获取所有组件
    fn get_all(&self) -> Vec<Arc<dyn Component>>;

    /// 查找匹配组件，`required` 为真且没有匹配项时返回错误
    fn find(
        &self,
        locator: &Locator,
        required: bool,
    ) -> Result<Vec<Arc<dyn Component>>, DependencyError>;

    /// 清空引用表
    fn clear(&self);

    /// 获取所有匹配组件
    fn get_optional(&self, locator: &Locator) -> Vec<Arc<dyn Component>> {
        self.find(locator, false).unwrap_or_default()
    }

    /// 获取所有匹配组件，至少需要一个
    fn get_required(&self, locator: &Locator) -> Result<Vec<Arc<dyn Component>>, DependencyError> {
        self.find(locator, true)
    }

    /// 获取单个匹配组件
    fn get_one_optional_raw(&self, locator: &Locator) -> Option<Arc<dyn Component>> {
        self.get_optional(locator).pop()
    }

    /// 获取单个匹配组件，没有匹配项时返回错误
    fn get_one_required_raw(
        &self,
        locator: &Locator,
    ) -> Result<Arc<dyn Component>, DependencyError> {
        self.get_one_optional_raw(locator)
            .ok_or_else(|| DependencyError::reference_not_found(None, locator))
    }
}

/// 引用表的类型化查询扩展
pub trait ReferencesExt: References {
    /// 获取单个指定类型的组件
    fn get_one_optional<T>(&self, locator: &Locator) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get_optional(locator)
            .iter()
            .rev()
            .find_map(downcast_component::<T>)
    }

    /// 获取单个指定类型的组件，没有匹配项时返回错误
    fn get_one_required<T>(&self, locator: &Locator) -> Result<Arc<T>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        self.get_one_optional::<T>(locator)
            .ok_or_else(|| DependencyError::reference_not_found(None, locator))
    }

    /// 获取所有指定类型的匹配组件
    fn get_all_of<T>(&self, locator: &Locator) -> Vec<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get_optional(locator)
            .iter()
            .filter_map(downcast_component::<T>)
            .collect()
    }

    /// 获取单个缓存，不关心具体实现
    fn get_one_optional_cache(&self, locator: &Locator) -> Option<Arc<dyn Cache>> {
        newest_capable(self.get_optional(locator), |c| c.into_cache())
    }

    /// 获取单个缓存，没有匹配项时返回错误
    fn get_one_required_cache(&self, locator: &Locator) -> Result<Arc<dyn Cache>, DependencyError> {
        self.get_one_optional_cache(locator)
            .ok_or_else(|| DependencyError::reference_not_found(None, locator))
    }

    /// 获取单个锁
    fn get_one_optional_lock(&self, locator: &Locator) -> Option<Arc<dyn Lock>> {
        newest_capable(self.get_optional(locator), |c| c.into_lock())
    }

    /// 获取单个锁，没有匹配项时返回错误
    fn get_one_required_lock(&self, locator: &Locator) -> Result<Arc<dyn Lock>, DependencyError> {
        self.get_one_optional_lock(locator)
            .ok_or_else(|| DependencyError::reference_not_found(None, locator))
    }

    /// 获取单个状态存储
    fn get_one_optional_state_store(&self, locator: &Locator) -> Option<Arc<dyn StateStore>> {
        newest_capable(self.get_optional(locator), |c| c.into_state_store())
    }

    /// 获取单个状态存储，没有匹配项时返回错误
    fn get_one_required_state_store(
        &self,
        locator: &Locator,
    ) -> Result<Arc<dyn StateStore>, DependencyError> {
        self.get_one_optional_state_store(locator)
            .ok_or_else(|| DependencyError::reference_not_found(None, locator))
    }
}

fn newest_capable<T: ?Sized>(
    components: Vec<Arc<dyn Component>>,
    query: impl Fn(Arc<dyn Component>) -> Option<Arc<T>>,
) -> Option<Arc<T>> {
    components.into_iter().rev().find_map(query)
}

impl<R: References + ?Sized> ReferencesExt for R {}

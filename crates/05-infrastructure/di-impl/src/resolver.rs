//! 命名依赖解析器

use caching_abstractions::{Cache, Lock, StateStore};
use di_abstractions::{Component, Configurable, References, ReferencesExt, Referenceable};
use infrastructure_common::{
    ConfigError, ConfigParams, DependencyError, Descriptor, InfrastructureError, Locator,
};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 命名依赖解析器
///
/// 组件通过依赖名称而不是定位符查找依赖，定位符可以在配置的 `dependencies` 节中覆盖：
///
/// ```yaml
/// dependencies:
///   persistence: "grp:persistence:memory:*:1.0"
/// ```
#[derive(Default)]
pub struct DependencyResolver {
    dependencies: RwLock<HashMap<String, Locator>>,
    references: RwLock<Option<Arc<dyn References>>>,
}

impl DependencyResolver {
    /// 创建空的解析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (名称, 定位符) 列表创建解析器
    pub fn with_references<I, N>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = (N, Locator)>,
        N: Into<String>,
    {
        let resolver = Self::new();
        for (name, locator) in dependencies {
            resolver.put(name, locator);
        }
        resolver
    }

    /// 添加或替换命名依赖
    pub fn put(&self, name: impl Into<String>, locator: impl Into<Locator>) {
        self.dependencies.write().insert(name.into(), locator.into());
    }

    /// 获取命名依赖的定位符
    pub fn locate(&self, name: &str) -> Result<Locator, DependencyError> {
        self.dependencies
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DependencyError::reference_not_found(None, name))
    }

    fn references(&self, name: &str) -> Result<Arc<dyn References>, DependencyError> {
        self.references
            .read()
            .clone()
            .ok_or_else(|| DependencyError::reference_not_found(None, name))
    }

    /// 获取所有匹配的依赖
    pub fn get_optional(&self, name: &str) -> Vec<Arc<dyn Component>> {
        self.find(name, false).unwrap_or_default()
    }

    /// 获取所有匹配的依赖，至少需要一个
    pub fn get_required(&self, name: &str) -> Result<Vec<Arc<dyn Component>>, DependencyError> {
        self.find(name, true)
    }

    /// 获取单个指定类型的依赖
    pub fn get_one_optional<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let locator = self.locate(name).ok()?;
        self.references(name).ok()?.get_one_optional::<T>(&locator)
    }

    /// 获取单个指定类型的依赖，没有匹配项时返回错误
    pub fn get_one_required<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        let locator = self.locate(name)?;
        self.references(name)?.get_one_required::<T>(&locator)
    }

    /// 获取缓存依赖，按 [`Cache`] 接口取用，不关心具体实现
    pub fn get_one_optional_cache(&self, name: &str) -> Option<Arc<dyn Cache>> {
        let locator = self.locate(name).ok()?;
        self.references(name).ok()?.get_one_optional_cache(&locator)
    }

    /// 获取缓存依赖，没有匹配项时返回错误
    pub fn get_one_required_cache(&self, name: &str) -> Result<Arc<dyn Cache>, DependencyError> {
        let locator = self.locate(name)?;
        self.references(name)?.get_one_required_cache(&locator)
    }

    /// 获取锁依赖
    pub fn get_one_optional_lock(&self, name: &str) -> Option<Arc<dyn Lock>> {
        let locator = self.locate(name).ok()?;
        self.references(name).ok()?.get_one_optional_lock(&locator)
    }

    /// 获取锁依赖，没有匹配项时返回错误
    pub fn get_one_required_lock(&self, name: &str) -> Result<Arc<dyn Lock>, DependencyError> {
        let locator = self.locate(name)?;
        self.references(name)?.get_one_required_lock(&locator)
    }

    /// 获取状态存储依赖
    pub fn get_one_optional_state_store(&self, name: &str) -> Option<Arc<dyn StateStore>> {
        let locator = self.locate(name).ok()?;
        self.references(name).ok()?.get_one_optional_state_store(&locator)
    }

    /// 获取状态存储依赖，没有匹配项时返回错误
    pub fn get_one_required_state_store(
        &self,
        name: &str,
    ) -> Result<Arc<dyn StateStore>, DependencyError> {
        let locator = self.locate(name)?;
        self.references(name)?.get_one_required_state_store(&locator)
    }

    /// 查找依赖
    pub fn find(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Vec<Arc<dyn Component>>, DependencyError> {
        let locator = self.locate(name)?;
        match self.references.read().clone() {
            Some(references) => references.find(&locator, required),
            None if required => Err(DependencyError::reference_not_found(None, &locator)),
            None => Ok(Vec::new()),
        }
    }
}

impl Configurable for DependencyResolver {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let section = config.get_section("dependencies");
        for (name, value) in section.iter() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let locator = match Descriptor::parse(value) {
                Ok(descriptor) => Locator::Descriptor(descriptor),
                Err(_) => Locator::name(value),
            };
            self.put(name, locator);
        }
        Ok(())
    }
}

impl Referenceable for DependencyResolver {
    fn set_references(&self, references: &Arc<dyn References>) -> Result<(), InfrastructureError> {
        *self.references.write() = Some(Arc::clone(references));
        Ok(())
    }
}

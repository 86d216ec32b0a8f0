//! 工厂实现

use di_abstractions::{Component, Factory};
use infrastructure_common::{BoxError, DependencyError, Locator};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

type Constructor = Box<dyn Fn(&Locator) -> Result<Arc<dyn Component>, BoxError> + Send + Sync>;

struct Registration {
    locator: Locator,
    constructor: Constructor,
}

/// 基于注册表的默认工厂
///
/// 注册 (定位符模式, 构造函数) 对。请求的定位符可能匹配多个注册项，
/// 此时选择通配字段最少的一个，相同时取先注册的。
#[derive(Default)]
pub struct DefaultFactory {
    registrations: RwLock<Vec<Registration>>,
}

impl DefaultFactory {
    /// 创建空工厂
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册构造函数
    pub fn register<F>(&self, locator: impl Into<Locator>, constructor: F)
    where
        F: Fn(&Locator) -> Result<Arc<dyn Component>, BoxError> + Send + Sync + 'static,
    {
        self.registrations.write().push(Registration {
            locator: locator.into(),
            constructor: Box::new(constructor),
        });
    }

    /// 注册通过 `Default` 构造的组件类型
    pub fn register_as_type<T>(&self, locator: impl Into<Locator>)
    where
        T: Component + Default,
    {
        self.register(locator, |_| {
            let component: Arc<dyn Component> = Arc::new(T::default());
            Ok(component)
        });
    }

    /// 已注册数量
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// 是否没有任何注册项
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    fn best_match(registrations: &[Registration], locator: &Locator) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, registration) in registrations.iter().enumerate() {
            if !registration.locator.matches(locator) {
                continue;
            }
            let specificity = registration.locator.specificity();
            if best.map_or(true, |(_, current)| specificity > current) {
                best = Some((index, specificity));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl Factory for DefaultFactory {
    fn can_create(&self, locator: &Locator) -> Option<Locator> {
        let registrations = self.registrations.read();
        Self::best_match(&registrations, locator).map(|index| registrations[index].locator.clone())
    }

    fn create(&self, locator: &Locator) -> Result<Arc<dyn Component>, DependencyError> {
        let registrations = self.registrations.read();
        let Some(index) = Self::best_match(&registrations, locator) else {
            return Err(DependencyError::cannot_create(None, locator, None));
        };

        debug!(locator = %locator, registered = %registrations[index].locator, "创建组件");
        (registrations[index].constructor)(locator).map_err(|e| {
            warn!(locator = %locator, error = %e, "组件构造失败");
            DependencyError::cannot_create(None, locator, Some(e))
        })
    }
}

impl Component for DefaultFactory {
    fn as_factory(&self) -> Option<&dyn Factory> {
        Some(self)
    }
}

/// 组合工厂
///
/// 委托给最后添加的、能够创建请求定位符的子工厂，后添加的工厂覆盖先添加的。
#[derive(Default)]
pub struct CompositeFactory {
    factories: RwLock<Vec<Arc<dyn Factory>>>,
}

impl CompositeFactory {
    /// 创建空的组合工厂
    pub fn new() -> Self {
        Self::default()
    }

    /// 从工厂列表创建
    pub fn from_factories(factories: Vec<Arc<dyn Factory>>) -> Self {
        Self {
            factories: RwLock::new(factories),
        }
    }

    /// 添加子工厂
    pub fn add(&self, factory: Arc<dyn Factory>) {
        self.factories.write().push(factory);
    }

    /// 移除子工厂（按实例比较）
    pub fn remove(&self, factory: &Arc<dyn Factory>) {
        let target = Arc::as_ptr(factory).cast::<()>();
        self.factories
            .write()
            .retain(|existing| Arc::as_ptr(existing).cast::<()>() != target);
    }

    /// 子工厂数量
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// 是否没有子工厂
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}

impl Factory for CompositeFactory {
    fn can_create(&self, locator: &Locator) -> Option<Locator> {
        self.factories
            .read()
            .iter()
            .rev()
            .find_map(|factory| factory.can_create(locator))
    }

    fn create(&self, locator: &Locator) -> Result<Arc<dyn Component>, DependencyError> {
        let factory = self
            .factories
            .read()
            .iter()
            .rev()
            .find(|factory| factory.can_create(locator).is_some())
            .cloned();

        match factory {
            Some(factory) => factory.create(locator),
            None => Err(DependencyError::cannot_create(None, locator, None)),
        }
    }
}

impl Component for CompositeFactory {
    fn as_factory(&self) -> Option<&dyn Factory> {
        Some(self)
    }
}

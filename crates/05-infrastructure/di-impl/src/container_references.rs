//! 容器引用表

use crate::references::ReferencesImpl;
use config_abstractions::{ComponentConfig, ContainerConfig};
use di_abstractions::{factory_locator, Component, References};
use infrastructure_common::{
    trace_id_of, Context, DependencyError, InfrastructureError, Locator,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 容器引用表
///
/// 在普通引用表之上增加按配置创建组件的能力。创建组件所用的工厂本身也是
/// 引用表中的组件（定位符匹配 `*:factory:*:*:*`）。
#[derive(Default)]
pub struct ContainerReferences {
    inner: ReferencesImpl,
}

impl ContainerReferences {
    /// 创建空的容器引用表
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用引用表中的工厂创建组件，最近放入的工厂优先
    pub fn create(
        &self,
        context: Option<&Context>,
        locator: &Locator,
    ) -> Result<Arc<dyn Component>, DependencyError> {
        let trace_id = trace_id_of(context);

        for candidate in self.inner.get_optional(&factory_locator()).iter().rev() {
            let Some(factory) = candidate.as_factory() else {
                continue;
            };
            if factory.can_create(locator).is_some() {
                return factory
                    .create(locator)
                    .map_err(|e| e.with_trace_id(trace_id.clone()));
            }
        }

        Err(DependencyError::cannot_create(trace_id, locator, None))
    }

    /// 按配置创建单个组件，配置后放入引用表
    pub fn put_component_from_config(
        &self,
        context: Option<&Context>,
        config: &ComponentConfig,
    ) -> Result<Arc<dyn Component>, InfrastructureError> {
        let trace_id = trace_id_of(context);

        let component = self.create(context, &config.locator).map_err(|e| {
            error!(trace_id = ?trace_id, locator = %config.locator, error = %e, "无法创建组件");
            e
        })?;

        if let Some(configurable) = component.as_configurable() {
            debug!(trace_id = ?trace_id, locator = %config.locator, "配置组件");
            configurable.configure(&config.config).map_err(|e| {
                error!(trace_id = ?trace_id, locator = %config.locator, error = %e, "组件配置失败");
                e
            })?;
        }

        self.inner.put(config.locator.clone(), Arc::clone(&component));
        info!(trace_id = ?trace_id, locator = %config.locator, "组件已创建");
        Ok(component)
    }

    /// 按声明顺序创建配置中的全部组件
    ///
    /// 任一组件创建失败即中止，后续组件不再创建。
    pub fn put_from_config(
        &self,
        context: Option<&Context>,
        config: &ContainerConfig,
    ) -> Result<(), InfrastructureError> {
        for component in config {
            self.put_component_from_config(context, component)?;
        }
        Ok(())
    }
}

impl References for ContainerReferences {
    fn put(&self, locator: Locator, component: Arc<dyn Component>) {
        self.inner.put(locator, component);
    }

    fn remove(&self, locator: &Locator) -> Option<Arc<dyn Component>> {
        self.inner.remove(locator)
    }

    fn remove_all(&self, locator: &Locator) -> Vec<Arc<dyn Component>> {
        self.inner.remove_all(locator)
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.inner.get_all_locators()
    }

    fn get_all(&self) -> Vec<Arc<dyn Component>> {
        self.inner.get_all()
    }

    fn find(
        &self,
        locator: &Locator,
        required: bool,
    ) -> Result<Vec<Arc<dyn Component>>, DependencyError> {
        self.inner.find(locator, required)
    }

    fn clear(&self) {
        self.inner.clear();
    }
}

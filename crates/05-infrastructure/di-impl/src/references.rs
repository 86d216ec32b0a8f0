//! 引用表实现

use di_abstractions::{Component, References};
use infrastructure_common::{DependencyError, Locator};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 单条引用
#[derive(Clone)]
struct Reference {
    locator: Locator,
    component: Arc<dyn Component>,
}

/// 基于有序列表的引用表实现
///
/// 写操作只在容器启动/关闭阶段发生，查询是对已构建列表的纯函数。
#[derive(Default)]
pub struct ReferencesImpl {
    references: RwLock<Vec<Reference>>,
}

impl ReferencesImpl {
    /// 创建空的引用表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (定位符, 组件) 列表创建引用表
    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (Locator, Arc<dyn Component>)>,
    {
        let references = tuples
            .into_iter()
            .map(|(locator, component)| Reference { locator, component })
            .collect();
        Self {
            references: RwLock::new(references),
        }
    }

    /// 引用数量
    pub fn len(&self) -> usize {
        self.references.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.references.read().is_empty()
    }
}

impl References for ReferencesImpl {
    fn put(&self, locator: Locator, component: Arc<dyn Component>) {
        debug!(locator = %locator, component = component.as_ref().type_name(), "放入组件引用");
        self.references.write().push(Reference { locator, component });
    }

    fn remove(&self, locator: &Locator) -> Option<Arc<dyn Component>> {
        let mut references = self.references.write();
        let index = references
            .iter()
            .rposition(|reference| locator.matches(&reference.locator))?;
        Some(references.remove(index).component)
    }

    fn remove_all(&self, locator: &Locator) -> Vec<Arc<dyn Component>> {
        let mut references = self.references.write();
        let mut removed = Vec::new();
        references.retain(|reference| {
            if locator.matches(&reference.locator) {
                removed.push(Arc::clone(&reference.component));
                false
            } else {
                true
            }
        });
        removed
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.references
            .read()
            .iter()
            .map(|reference| reference.locator.clone())
            .collect()
    }

    fn get_all(&self) -> Vec<Arc<dyn Component>> {
        self.references
            .read()
            .iter()
            .map(|reference| Arc::clone(&reference.component))
            .collect()
    }

    fn find(
        &self,
        locator: &Locator,
        required: bool,
    ) -> Result<Vec<Arc<dyn Component>>, DependencyError> {
        let components: Vec<_> = self
            .references
            .read()
            .iter()
            .filter(|reference| locator.matches(&reference.locator))
            .map(|reference| Arc::clone(&reference.component))
            .collect();

        if required && components.is_empty() {
            return Err(DependencyError::reference_not_found(None, locator));
        }
        Ok(components)
    }

    fn clear(&self) {
        self.references.write().clear();
    }
}

//! 组件工厂抽象接口
//!
//! 工厂按定位符创建组件实例。容器在引用表中以 `*:factory:*:*:*` 查找工厂。

use crate::component::Component;
use infrastructure_common::{Descriptor, DependencyError, Locator};
use std::sync::Arc;

/// 组件工厂
pub trait Factory: Send + Sync {
    /// 判断能否创建指定定位符的组件，返回工厂内最匹配的已注册定位符
    fn can_create(&self, locator: &Locator) -> Option<Locator>;

    /// 创建组件
    ///
    /// 未注册的定位符与构造失败都返回 [`DependencyError::CannotCreate`]。
    fn create(&self, locator: &Locator) -> Result<Arc<dyn Component>, DependencyError>;
}

/// 引用表中所有工厂的通配定位符
pub fn factory_locator() -> Locator {
    Descriptor::new("*", "factory", "*", "*", "*").into()
}

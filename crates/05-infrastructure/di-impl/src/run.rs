//! 组件批量生命周期操作
//!
//! 通过能力查询判断组件是否实现了对应接口，未实现的组件直接跳过。

use di_abstractions::{Component, References};
use infrastructure_common::{Context, InfrastructureError};
use std::sync::Arc;
use tracing::{debug, error};

/// 引用注入
pub struct Referencer;

impl Referencer {
    /// 为单个组件设置引用
    pub fn set_references_for_one(
        references: &Arc<dyn References>,
        component: &Arc<dyn Component>,
    ) -> Result<(), InfrastructureError> {
        match component.as_referenceable() {
            Some(referenceable) => {
                debug!(component = component.as_ref().type_name(), "设置组件引用");
                referenceable.set_references(references)
            }
            None => Ok(()),
        }
    }

    /// 按顺序为组件设置引用，遇到第一个错误即停止
    pub fn set_references(
        references: &Arc<dyn References>,
        components: &[Arc<dyn Component>],
    ) -> Result<(), InfrastructureError> {
        for component in components {
            Self::set_references_for_one(references, component)?;
        }
        Ok(())
    }

    /// 解除单个组件的引用
    pub fn unset_references_for_one(component: &Arc<dyn Component>) {
        if let Some(unreferenceable) = component.as_unreferenceable() {
            unreferenceable.unset_references();
        }
    }

    /// 按顺序解除组件引用
    pub fn unset_references(components: &[Arc<dyn Component>]) {
        for component in components {
            Self::unset_references_for_one(component);
        }
    }
}

/// 打开组件
pub struct Opener;

impl Opener {
    /// 组件是否已打开，未实现打开接口的组件视为已打开
    pub fn is_open_one(component: &Arc<dyn Component>) -> bool {
        component
            .as_openable()
            .map_or(true, |openable| openable.is_open())
    }

    /// 所有组件是否都已打开
    pub fn is_open(components: &[Arc<dyn Component>]) -> bool {
        components.iter().all(Self::is_open_one)
    }

    /// 打开单个组件
    pub async fn open_one(
        context: Option<&Context>,
        component: &Arc<dyn Component>,
    ) -> Result<(), InfrastructureError> {
        if let Some(openable) = component.as_openable() {
            debug!(component = component.as_ref().type_name(), "打开组件");
            openable.open(context).await?;
        }
        Ok(())
    }

    /// 按顺序打开组件，第 N 个失败时不再打开其后的组件
    pub async fn open(
        context: Option<&Context>,
        components: &[Arc<dyn Component>],
    ) -> Result<(), InfrastructureError> {
        for component in components {
            Self::open_one(context, component).await?;
        }
        Ok(())
    }
}

/// 关闭组件
pub struct Closer;

impl Closer {
    /// 关闭单个组件
    pub async fn close_one(
        context: Option<&Context>,
        component: &Arc<dyn Component>,
    ) -> Result<(), InfrastructureError> {
        if let Some(openable) = component.as_openable() {
            debug!(component = component.as_ref().type_name(), "关闭组件");
            openable.close(context).await
        } else if let Some(closable) = component.as_closable() {
            debug!(component = component.as_ref().type_name(), "关闭组件");
            closable.close(context).await
        } else {
            Ok(())
        }
    }

    /// 按给定顺序关闭所有组件
    ///
    /// 单次尽力而为：某个组件关闭失败会记录日志并继续关闭其余组件，最后返回第一个错误。
    pub async fn close(
        context: Option<&Context>,
        components: &[Arc<dyn Component>],
    ) -> Result<(), InfrastructureError> {
        let mut first_error = None;
        for component in components {
            if let Err(e) = Self::close_one(context, component).await {
                error!(
                    component = component.as_ref().type_name(),
                    error = %e,
                    "组件关闭失败"
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// 清理组件
pub struct Cleaner;

impl Cleaner {
    /// 清理单个组件
    pub async fn clear_one(
        context: Option<&Context>,
        component: &Arc<dyn Component>,
    ) -> Result<(), InfrastructureError> {
        match component.as_cleanable() {
            Some(cleanable) => cleanable.clear(context).await,
            None => Ok(()),
        }
    }

    /// 按顺序清理组件
    pub async fn clear(
        context: Option<&Context>,
        components: &[Arc<dyn Component>],
    ) -> Result<(), InfrastructureError> {
        for component in components {
            Self::clear_one(context, component).await?;
        }
        Ok(())
    }
}

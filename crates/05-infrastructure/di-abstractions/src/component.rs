//! 组件与可选能力接口
//!
//! 容器不要求组件继承公共基类。组件通过 [`Component`] 上的能力查询方法声明自己
//! 实现了哪些可选接口（配置、引用注入、打开/关闭、清理、工厂），容器按需调用。
//! 缓存、锁、状态存储与命令集同样以能力的形式暴露，使用方按接口而不是具体类型取用。

use crate::factory::Factory;
use crate::references::References;
use async_trait::async_trait;
use caching_abstractions::{Cache, Lock, StateStore};
use infrastructure_commands::Commandable;
use infrastructure_common::{ConfigError, ConfigParams, Context, InfrastructureError};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除辅助 trait，为所有 `Any + Send + Sync` 类型自动实现
pub trait AsAny: Any + Send + Sync {
    /// 转换为 `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// 转换为 `Arc<dyn Any>`，用于向下转型
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// 具体类型名称
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// 可放入引用表的组件
///
/// 能力查询默认返回 `None`，组件只需覆盖自己真正实现的接口：
///
/// ```ignore
/// impl Component for MyService {
///     fn as_openable(&self) -> Option<&dyn Openable> {
///         Some(self)
///     }
/// }
/// ```
pub trait Component: AsAny {
    /// 可配置能力
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }

    /// 引用注入能力
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        None
    }

    /// 引用解除能力
    fn as_unreferenceable(&self) -> Option<&dyn Unreferenceable> {
        None
    }

    /// 打开/关闭能力
    fn as_openable(&self) -> Option<&dyn Openable> {
        None
    }

    /// 仅关闭能力
    fn as_closable(&self) -> Option<&dyn Closable> {
        None
    }

    /// 清理能力
    fn as_cleanable(&self) -> Option<&dyn Cleanable> {
        None
    }

    /// 工厂能力
    fn as_factory(&self) -> Option<&dyn Factory> {
        None
    }

    /// 命令集能力
    fn as_commandable(&self) -> Option<&dyn Commandable> {
        None
    }

    /// 缓存能力
    fn into_cache(self: Arc<Self>) -> Option<Arc<dyn Cache>> {
        None
    }

    /// 锁能力
    fn into_lock(self: Arc<Self>) -> Option<Arc<dyn Lock>> {
        None
    }

    /// 状态存储能力
    fn into_state_store(self: Arc<Self>) -> Option<Arc<dyn StateStore>> {
        None
    }
}

/// 可配置组件
pub trait Configurable: Send + Sync {
    /// 应用配置参数
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError>;
}

/// 可注入引用的组件
pub trait Referenceable: Send + Sync {
    /// 设置引用，组件在此查找自己依赖的其它组件
    fn set_references(&self, references: &Arc<dyn References>) -> Result<(), InfrastructureError>;
}

/// 可解除引用的组件
pub trait Unreferenceable: Send + Sync {
    /// 解除引用
    fn unset_references(&self);
}

/// 可关闭组件
#[async_trait]
pub trait Closable: Send + Sync {
    /// 关闭组件并释放资源
    async fn close(&self, context: Option<&Context>) -> Result<(), InfrastructureError>;
}

/// 可打开组件
#[async_trait]
pub trait Openable: Closable {
    /// 是否已打开
    fn is_open(&self) -> bool;

    /// 打开组件
    async fn open(&self, context: Option<&Context>) -> Result<(), InfrastructureError>;
}

/// 可清理组件
#[async_trait]
pub trait Cleanable: Send + Sync {
    /// 清除组件持有的数据
    async fn clear(&self, context: Option<&Context>) -> Result<(), InfrastructureError>;
}

/// 将组件向下转型为具体类型
pub fn downcast_component<T>(component: &Arc<dyn Component>) -> Option<Arc<T>>
where
    T: Any + Send + Sync,
{
    AsAny::into_any(Arc::clone(component)).downcast::<T>().ok()
}

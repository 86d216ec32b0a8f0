//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 微服务工具集基础设施层的公共类型和错误定义。
//!
//! ## 核心类型
//!
//! - [`Descriptor`] / [`Locator`] - 支持通配符匹配的组件定位符
//! - [`ConfigParams`] - 有序的键值配置参数
//! - [`Context`] - 调用上下文（携带 trace id）
//! - [`LifecycleState`] - 组件/容器生命周期状态
//! - [`ValidationResult`] - 数据校验结果
//! - [`InfrastructureError`] - 统一的基础设施错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 错误携带机器可读的错误码、trace id 与结构化详情
//! - 定位符是纯值类型，不依赖任何全局注册表

pub mod configuration;
pub mod context;
pub mod errors;
pub mod lifecycle;
pub mod locator;
pub mod validation;

pub use configuration::*;
pub use context::*;
pub use errors::*;
pub use lifecycle::*;
pub use locator::*;
pub use validation::*;

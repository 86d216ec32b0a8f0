//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件模型、引用表与工厂的核心接口。
//!
//! ## 核心接口
//!
//! - [`Component`] - 组件及其可选能力查询
//! - [`Configurable`] / [`Referenceable`] / [`Openable`] / [`Closable`] / [`Cleanable`] - 可选能力
//! - [`References`] / [`ReferencesExt`] - 组件引用表与类型化查询，缓存、锁、状态存储按接口查询
//! - [`Factory`] - 组件工厂接口

pub mod component;
pub mod factory;
pub mod references;

pub use component::*;
pub use factory::*;
pub use references::*;

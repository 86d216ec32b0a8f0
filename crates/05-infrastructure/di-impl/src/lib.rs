//! # 依赖注入具体实现
//!
//! 提供引用表、工厂、依赖解析器以及组件批量生命周期操作的实现。
//!
//! ## 主要组件
//!
//! - [`ReferencesImpl`] - 有序引用表
//! - [`ContainerReferences`] - 支持按配置创建组件的容器引用表
//! - [`DefaultFactory`] / [`CompositeFactory`] - 工厂实现
//! - [`DependencyResolver`] - 命名依赖解析器
//! - [`Referencer`] / [`Opener`] / [`Closer`] / [`Cleaner`] - 批量生命周期操作

pub mod container_references;
pub mod factory;
pub mod references;
pub mod resolver;
pub mod run;

pub use container_references::*;
pub use factory::*;
pub use references::*;
pub use resolver::*;
pub use run::*;

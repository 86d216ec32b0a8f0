//! # 基础设施组合层
//!
//! 将工厂、引用表与配置组合成可运行的控制反转容器。
//!
//! ## 主要功能
//!
//! - **容器**: [`Container`] 按配置创建组件，按创建顺序注入引用并打开，按相反顺序关闭
//! - **上下文信息**: [`ContextInfo`] 标识运行中的容器
//! - **默认工厂**: [`DefaultContainerFactory`] 预置缓存、锁与状态存储
//! - **进程容器**: [`ProcessContainer`] 处理命令行参数与退出信号
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_common::{ConfigParams, Context};
//! use infrastructure_composition::Container;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = Container::new("orders", None);
//!     container.read_config_from_file(None, "./config/config.yml", &ConfigParams::new())?;
//!
//!     let context = Context::from_trace_id("startup");
//!     container.open(Some(&context)).await?;
//!     container.close(Some(&context)).await?;
//!     Ok(())
//! }
//! ```

pub mod container;
pub mod context_info;
pub mod factory;
pub mod logging;
pub mod process;

pub use container::Container;
pub use context_info::{context_info_descriptor, context_info_factory, ContextInfo};
pub use factory::{container_factory_descriptor, DefaultContainerFactory};
pub use logging::{init_logging, LoggingConfig};
pub use process::{ProcessArgs, ProcessContainer, DEFAULT_CONFIG_PATH};

pub use infrastructure_common::InfrastructureError;

#[cfg(test)]
mod tests;

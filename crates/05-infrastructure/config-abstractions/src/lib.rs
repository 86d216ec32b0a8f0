//! # Configuration Abstractions
//!
//! 配置抽象层，定义容器配置的数据模型与配置读取接口。
//!
//! ## 核心类型
//!
//! - [`ComponentConfig`] - 单个组件的配置块（定位符 + 参数）
//! - [`ContainerConfig`] - 按声明顺序排列的组件配置
//! - [`ConfigReader`] - 配置读取器接口

pub mod component_config;
pub mod container_config;
pub mod reader;

pub use component_config::*;
pub use container_config::*;
pub use reader::*;

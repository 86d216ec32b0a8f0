//! # Configuration Implementation
//!
//! 配置读取的具体实现。
//!
//! ## 主要组件
//!
//! - [`FileConfigReader`] - JSON / YAML / TOML 文件配置读取器
//! - [`MemoryConfigReader`] - 内存配置读取器
//! - [`ContainerConfigReader`] - 容器配置读取器
//! - [`parameterize`] - `{{ name }}` 模板参数替换

pub mod container_reader;
pub mod readers;
pub mod template;

pub use container_reader::*;
pub use readers::*;
pub use template::*;

#[cfg(test)]
mod tests;

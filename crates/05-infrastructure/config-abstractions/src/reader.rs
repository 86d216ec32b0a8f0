//! 配置读取器抽象接口

use async_trait::async_trait;
use infrastructure_common::{ConfigError, ConfigParams};

/// 配置读取器 trait
///
/// 从某个数据源读取配置，`parameters` 用于替换配置模板中的 `{{ name }}` 占位符。
#[async_trait]
pub trait ConfigReader: Send + Sync {
    /// 读取配置
    async fn read_config(
        &self,
        trace_id: Option<&str>,
        parameters: &ConfigParams,
    ) -> Result<ConfigParams, ConfigError>;

    /// 读取器名称
    fn name(&self) -> &str;
}

//! 容器配置读取

use crate::readers::FileConfigReader;
use config_abstractions::ContainerConfig;
use infrastructure_common::{ConfigError, ConfigParams};
use std::path::Path;
use tracing::info;

/// 容器配置读取器
pub struct ContainerConfigReader;

impl ContainerConfigReader {
    /// 从文件读取容器配置，保持文件中的声明顺序
    pub fn read_from_file<P: AsRef<Path>>(
        trace_id: Option<&str>,
        path: P,
        parameters: &ConfigParams,
    ) -> Result<ContainerConfig, ConfigError> {
        let reader = FileConfigReader::new(path);
        let value = reader.read_value(trace_id, parameters)?;

        let config = ContainerConfig::from_value(&value).map_err(|e| match e {
            ConfigError::InvalidConfig {
                trace_id: None,
                message,
            } => ConfigError::invalid_config(trace_id.map(ToString::to_string), message),
            other => other,
        })?;

        info!(
            trace_id,
            path = %reader.path().display(),
            components = config.len(),
            "容器配置读取完成"
        );
        Ok(config)
    }
}

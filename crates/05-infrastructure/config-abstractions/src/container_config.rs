//! 容器配置

use crate::component_config::ComponentConfig;
use infrastructure_common::{ConfigError, ConfigParams};
use serde_json::Value;
use tracing::debug;

/// 容器配置：按声明顺序排列的组件配置块
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerConfig {
    components: Vec<ComponentConfig>,
}

impl ContainerConfig {
    /// 创建空的容器配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从组件配置列表创建
    pub fn from_components(components: Vec<ComponentConfig>) -> Self {
        Self { components }
    }

    /// 从配置参数解析，每个顶层配置节是一个组件
    pub fn from_config(config: &ConfigParams) -> Result<Self, ConfigError> {
        let mut components = Vec::new();
        for section in config.get_section_names() {
            let block = config.get_section(&section);
            let component = ComponentConfig::from_config(&block).map_err(|e| match e {
                ConfigError::InvalidConfig { trace_id, message } => ConfigError::InvalidConfig {
                    trace_id,
                    message: format!("配置节 {section}: {message}"),
                },
                other => other,
            })?;
            debug!(section = %section, locator = %component.locator, "解析组件配置");
            components.push(component);
        }
        Ok(Self { components })
    }

    /// 从 JSON 值解析
    ///
    /// 接受组件对象数组，或以名称为键的组件对象。数组展开后的配置节为 `0`、`1`……，
    /// 顺序与数组一致。
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Array(_) | Value::Object(_) => Self::from_config(&ConfigParams::from_value(value)),
            Value::Null => Ok(Self::new()),
            _ => Err(ConfigError::invalid_config(
                None,
                "容器配置必须是数组或对象",
            )),
        }
    }

    /// 追加组件配置
    pub fn push(&mut self, component: ComponentConfig) {
        self.components.push(component);
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentConfig> {
        self.components.iter()
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContainerConfig {
    type Item = &'a ComponentConfig;
    type IntoIter = std::slice::Iter<'a, ComponentConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! 组件配置

use infrastructure_common::{ConfigError, ConfigParams, Descriptor, Locator};

/// 单个组件的配置块
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
    /// 组件定位符
    pub locator: Locator,
    /// 组件配置参数（整个配置块）
    pub config: ConfigParams,
}

impl ComponentConfig {
    /// 描述符键名
    pub const DESCRIPTOR_KEY: &'static str = "descriptor";
    /// 类型键名
    pub const TYPE_KEY: &'static str = "type";

    /// 创建组件配置
    pub fn new(locator: impl Into<Locator>, config: ConfigParams) -> Self {
        Self {
            locator: locator.into(),
            config,
        }
    }

    /// 从配置块解析组件配置
    ///
    /// 配置块必须包含 `descriptor`（五段描述符）或 `type`（类型名称）之一，
    /// 两者都存在时以 `descriptor` 为准。
    pub fn from_config(config: &ConfigParams) -> Result<Self, ConfigError> {
        let locator = if let Some(descriptor) = non_empty(config.get(Self::DESCRIPTOR_KEY)) {
            Locator::Descriptor(Descriptor::parse(descriptor)?)
        } else if let Some(type_name) = non_empty(config.get(Self::TYPE_KEY)) {
            Locator::name(type_name)
        } else {
            return Err(ConfigError::invalid_config(
                None,
                "组件配置必须包含 descriptor 或 type",
            ));
        };

        Ok(Self {
            locator,
            config: config.clone(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

//! 容器上下文信息

use chrono::{DateTime, Utc};
use di_abstractions::{Component, Configurable};
use di_impl::DefaultFactory;
use infrastructure_common::{ConfigError, ConfigParams, Descriptor};
use parking_lot::RwLock;

/// 上下文信息在引用表中的描述符
pub fn context_info_descriptor() -> Descriptor {
    Descriptor::new("pip-services", "context-info", "default", "default", "1.0")
}

#[derive(Debug, Clone)]
struct InfoState {
    name: String,
    description: Option<String>,
    properties: ConfigParams,
}

/// 容器上下文信息
///
/// 标识一个运行中的容器：名称、描述、自定义属性，以及创建时生成的
/// `context_id` 与 `start_time`。
#[derive(Debug)]
pub struct ContextInfo {
    state: RwLock<InfoState>,
    context_id: String,
    start_time: DateTime<Utc>,
}

impl ContextInfo {
    /// 创建上下文信息
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            state: RwLock::new(InfoState {
                name: name.into(),
                description,
                properties: ConfigParams::new(),
            }),
            context_id: uuid::Uuid::new_v4().simple().to_string(),
            start_time: Utc::now(),
        }
    }

    /// 上下文名称
    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    /// 描述
    pub fn description(&self) -> Option<String> {
        self.state.read().description.clone()
    }

    /// 附加属性
    pub fn properties(&self) -> ConfigParams {
        self.state.read().properties.clone()
    }

    /// 本次运行生成的唯一标识
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// 启动时间
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// 运行时长
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.start_time
    }
}

impl Default for ContextInfo {
    fn default() -> Self {
        Self::new("unknown", None)
    }
}

impl Configurable for ContextInfo {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let mut state = self.state.write();
        if let Some(name) = config
            .get_as_string("name")
            .or_else(|| config.get_as_string("info.name"))
        {
            state.name = name;
        }
        if let Some(description) = config
            .get_as_string("description")
            .or_else(|| config.get_as_string("info.description"))
        {
            state.description = Some(description);
        }
        state.properties = config.get_section("properties");
        Ok(())
    }
}

impl Component for ContextInfo {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

/// 上下文信息工厂
pub fn context_info_factory() -> DefaultFactory {
    let factory = DefaultFactory::new();
    factory.register_as_type::<ContextInfo>(Descriptor::new(
        "pip-services",
        "context-info",
        "default",
        "*",
        "1.0",
    ));
    factory
}

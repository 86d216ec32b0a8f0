//! 错误类型定义
//!
//! 每类错误都提供机器可读的错误码（[`code`](InfrastructureError::code)）、
//! 可选的 trace id 以及结构化详情，传输层适配器可以据此映射为协议相关的响应。

use crate::validation::ValidationResult;
use std::collections::HashMap;
use thiserror::Error;

/// 装箱的动态错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {path}, 原因: {source}")]
    ParseError { path: String, source: BoxError },

    #[error("缺少配置: {message}")]
    NoConfig {
        trace_id: Option<String>,
        message: String,
    },

    #[error("配置无效: {message}")]
    InvalidConfig {
        trace_id: Option<String>,
        message: String,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// 创建缺少配置错误
    pub fn no_config(trace_id: Option<String>, message: impl Into<String>) -> Self {
        Self::NoConfig {
            trace_id,
            message: message.into(),
        }
    }

    /// 创建配置无效错误
    pub fn invalid_config(trace_id: Option<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            trace_id,
            message: message.into(),
        }
    }

    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::FileReadError { .. } => "READ_FAILED",
            Self::ParseError { .. } => "PARSE_FAILED",
            Self::NoConfig { .. } => "NO_CONFIG",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::KeyNotFound { .. } => "KEY_NOT_FOUND",
            Self::SerializationError { .. } => "SERIALIZATION_FAILED",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::NoConfig { trace_id, .. } | Self::InvalidConfig { trace_id, .. } => {
                trace_id.as_deref()
            }
            _ => None,
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        match self {
            Self::FileNotFound { path } | Self::ParseError { path, .. } => {
                details.insert("path".to_string(), path.clone());
            }
            Self::KeyNotFound { key } => {
                details.insert("key".to_string(), key.clone());
            }
            _ => {}
        }
        details
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("无法创建组件: {locator}")]
    CannotCreate {
        trace_id: Option<String>,
        locator: String,
        source: Option<BoxError>,
    },

    #[error("未找到组件引用: {locator}")]
    ReferenceNotFound {
        trace_id: Option<String>,
        locator: String,
    },
}

impl DependencyError {
    /// 创建无法创建组件错误
    pub fn cannot_create(
        trace_id: Option<String>,
        locator: impl ToString,
        source: Option<BoxError>,
    ) -> Self {
        Self::CannotCreate {
            trace_id,
            locator: locator.to_string(),
            source,
        }
    }

    /// 创建未找到引用错误
    pub fn reference_not_found(trace_id: Option<String>, locator: impl ToString) -> Self {
        Self::ReferenceNotFound {
            trace_id,
            locator: locator.to_string(),
        }
    }

    /// 在尚未设置 trace id 时补上
    pub fn with_trace_id(mut self, value: Option<String>) -> Self {
        match &mut self {
            Self::CannotCreate { trace_id, .. } | Self::ReferenceNotFound { trace_id, .. } => {
                if trace_id.is_none() {
                    *trace_id = value;
                }
            }
        }
        self
    }

    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::CannotCreate { .. } => "CANNOT_CREATE",
            Self::ReferenceNotFound { .. } => "REF_NOT_FOUND",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::CannotCreate { trace_id, .. } | Self::ReferenceNotFound { trace_id, .. } => {
                trace_id.as_deref()
            }
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        match self {
            Self::CannotCreate { locator, .. } | Self::ReferenceNotFound { locator, .. } => {
                HashMap::from([("locator".to_string(), locator.clone())])
            }
        }
    }
}

/// 生命周期状态错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("组件尚未打开: {component}")]
    NotOpened {
        trace_id: Option<String>,
        component: String,
    },

    #[error("组件已经打开: {component}")]
    AlreadyOpened {
        trace_id: Option<String>,
        component: String,
    },
}

impl LifecycleError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOpened { .. } => "NOT_OPENED",
            Self::AlreadyOpened { .. } => "ALREADY_OPENED",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::NotOpened { trace_id, .. } | Self::AlreadyOpened { trace_id, .. } => {
                trace_id.as_deref()
            }
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        match self {
            Self::NotOpened { component, .. } | Self::AlreadyOpened { component, .. } => {
                HashMap::from([("component".to_string(), component.clone())])
            }
        }
    }
}

/// 锁冲突错误类型
#[derive(Error, Debug)]
pub enum LockError {
    #[error("获取锁 {key} 超时")]
    Timeout {
        trace_id: Option<String>,
        key: String,
    },
}

impl LockError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "LOCK_TIMEOUT",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Timeout { trace_id, .. } => trace_id.as_deref(),
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        match self {
            Self::Timeout { key, .. } => HashMap::from([("key".to_string(), key.clone())]),
        }
    }
}

/// 命令调用错误类型
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("数据校验失败: {}", join_results(.results))]
    ValidationFailed {
        trace_id: Option<String>,
        command: Option<String>,
        results: Vec<ValidationResult>,
    },

    #[error("命令 {command} 执行失败: {source}")]
    ExecutionFailed {
        trace_id: Option<String>,
        command: String,
        source: BoxError,
    },

    #[error("命令不存在: {command}")]
    CommandNotFound {
        trace_id: Option<String>,
        command: String,
    },
}

fn join_results(results: &[ValidationResult]) -> String {
    results
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl InvocationError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "INVALID_DATA",
            Self::ExecutionFailed { .. } => "EXEC_FAILED",
            Self::CommandNotFound { .. } => "CMD_NOT_FOUND",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { trace_id, .. }
            | Self::ExecutionFailed { trace_id, .. }
            | Self::CommandNotFound { trace_id, .. } => trace_id.as_deref(),
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        match self {
            Self::ValidationFailed { command, results, .. } => {
                if let Some(command) = command {
                    details.insert("command".to_string(), command.clone());
                }
                details.insert("violations".to_string(), results.len().to_string());
            }
            Self::ExecutionFailed { command, .. } | Self::CommandNotFound { command, .. } => {
                details.insert("command".to_string(), command.clone());
            }
        }
        details
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("生命周期错误: {source}")]
    LifecycleError {
        #[from]
        source: LifecycleError,
    },

    #[error("锁冲突: {source}")]
    LockError {
        #[from]
        source: LockError,
    },

    #[error("调用错误: {source}")]
    InvocationError {
        #[from]
        source: InvocationError,
    },

    #[error("内部错误: {message}")]
    Internal {
        trace_id: Option<String>,
        message: String,
        source: Option<BoxError>,
    },
}

impl InfrastructureError {
    /// 创建内部错误
    pub fn internal(trace_id: Option<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            trace_id,
            message: message.into(),
            source: None,
        }
    }

    /// 包装任意错误为内部错误
    pub fn wrap(trace_id: Option<String>, message: impl Into<String>, source: BoxError) -> Self {
        Self::Internal {
            trace_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError { source } => source.code(),
            Self::DependencyError { source } => source.code(),
            Self::LifecycleError { source } => source.code(),
            Self::LockError { source } => source.code(),
            Self::InvocationError { source } => source.code(),
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// trace id
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::ConfigError { source } => source.trace_id(),
            Self::DependencyError { source } => source.trace_id(),
            Self::LifecycleError { source } => source.trace_id(),
            Self::LockError { source } => source.trace_id(),
            Self::InvocationError { source } => source.trace_id(),
            Self::Internal { trace_id, .. } => trace_id.as_deref(),
        }
    }

    /// 结构化详情
    pub fn details(&self) -> HashMap<String, String> {
        match self {
            Self::ConfigError { source } => source.details(),
            Self::DependencyError { source } => source.details(),
            Self::LifecycleError { source } => source.details(),
            Self::LockError { source } => source.details(),
            Self::InvocationError { source } => source.details(),
            Self::Internal { .. } => HashMap::new(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
/// 依赖注入结果
pub type DependencyResult<T> = Result<T, DependencyError>;
/// 基础设施操作结果
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

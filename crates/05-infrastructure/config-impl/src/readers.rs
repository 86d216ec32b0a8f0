//! 配置读取器实现

use crate::template::parameterize;
use async_trait::async_trait;
use config_abstractions::ConfigReader;
use infrastructure_common::{ConfigError, ConfigParams};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// TOML
    Toml,
}

impl ConfigFormat {
    /// 根据文件扩展名判断格式
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::invalid_config(
                None,
                format!("不支持的配置文件格式: {}", path.display()),
            )),
        }
    }

    /// 解析配置文本
    pub fn parse(&self, path: &Path, content: &str) -> Result<Value, ConfigError> {
        let parse_error = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::ParseError {
            path: path.display().to_string(),
            source,
        };

        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| parse_error(Box::new(e))),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(Box::new(e))),
            Self::Toml => toml::from_str::<toml::Value>(content)
                .map(|value| toml_to_json(&value))
                .map_err(|e| parse_error(Box::new(e))),
        }
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// 文件配置读取器
///
/// 支持 JSON（`.json`）、YAML（`.yml`/`.yaml`）与 TOML（`.toml`）。
/// 解析前先替换文本中的 `{{ name }}` 占位符。
#[derive(Debug, Clone)]
pub struct FileConfigReader {
    path: PathBuf,
    format: Option<ConfigFormat>,
}

impl FileConfigReader {
    /// 创建文件配置读取器，格式由扩展名决定
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: None,
        }
    }

    /// 显式指定格式
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取并解析为 JSON 值
    pub fn read_value(
        &self,
        trace_id: Option<&str>,
        parameters: &ConfigParams,
    ) -> Result<Value, ConfigError> {
        debug!(trace_id, path = %self.path.display(), "读取配置文件");

        if !self.path.exists() {
            return Err(ConfigError::FileNotFound {
                path: self.path.display().to_string(),
            });
        }

        let format = match self.format {
            Some(format) => format,
            None => ConfigFormat::from_path(&self.path)?,
        };

        let content = std::fs::read_to_string(&self.path)?;
        let content = parameterize(&content, parameters)?;
        format.parse(&self.path, &content)
    }
}

#[async_trait]
impl ConfigReader for FileConfigReader {
    async fn read_config(
        &self,
        trace_id: Option<&str>,
        parameters: &ConfigParams,
    ) -> Result<ConfigParams, ConfigError> {
        let value = self.read_value(trace_id, parameters)?;
        Ok(ConfigParams::from_value(&value))
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// 内存配置读取器
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigReader {
    config: ConfigParams,
}

impl MemoryConfigReader {
    /// 创建内存配置读取器
    pub fn new(config: ConfigParams) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigReader for MemoryConfigReader {
    async fn read_config(
        &self,
        _trace_id: Option<&str>,
        parameters: &ConfigParams,
    ) -> Result<ConfigParams, ConfigError> {
        let mut config = self.config.clone();
        for (key, value) in parameters.iter() {
            if config.get(key).is_some() {
                config.set(key, value);
            }
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

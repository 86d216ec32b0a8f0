//! 组件定位符
//!
//! [`Descriptor`] 是由 group、type、kind、name、version 五部分组成的不可变标识，
//! 任何一部分都可以是通配符 `*`。[`Locator`] 在描述符之外还允许按名称定位组件。

use crate::errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 组件描述符
///
/// 通配符以 `None` 表示，只有 `*` 是通配符。比较时字段大小写不敏感（按 Unicode 小写比较）。
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    group: Option<String>,
    type_: Option<String>,
    kind: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

fn field(value: &str) -> Option<String> {
    if value == "*" {
        None
    } else {
        Some(value.to_string())
    }
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

fn match_field(left: &Option<String>, right: &Option<String>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => eq_ignore_case(left, right),
        _ => true,
    }
}

fn exact_match_field(left: &Option<String>, right: &Option<String>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => eq_ignore_case(left, right),
        (None, None) => true,
        _ => false,
    }
}

impl Descriptor {
    /// 创建新的描述符，`"*"` 表示通配
    pub fn new(group: &str, type_: &str, kind: &str, name: &str, version: &str) -> Self {
        Self {
            group: field(group),
            type_: field(type_),
            kind: field(kind),
            name: field(name),
            version: field(version),
        }
    }

    /// 解析 `group:type:kind:name:version` 格式的字符串
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 5 {
            return Err(ConfigError::invalid_config(
                None,
                format!("描述符 {value} 格式错误，期望 group:type:kind:name:version"),
            ));
        }
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(ConfigError::invalid_config(
                None,
                format!("描述符 {value} 含有空字段，通配请使用 *"),
            ));
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3], parts[4]))
    }

    /// 组
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// 类型
    pub fn type_(&self) -> Option<&str> {
        self.type_.as_deref()
    }

    /// 种类
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// 名称
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 版本
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// 通配匹配：任何一侧为通配符的字段视为相等，其余字段必须相等
    pub fn matches(&self, other: &Descriptor) -> bool {
        match_field(&self.group, &other.group)
            && match_field(&self.type_, &other.type_)
            && match_field(&self.kind, &other.kind)
            && match_field(&self.name, &other.name)
            && match_field(&self.version, &other.version)
    }

    /// 精确匹配：通配符只与通配符相等
    pub fn exact_match(&self, other: &Descriptor) -> bool {
        exact_match_field(&self.group, &other.group)
            && exact_match_field(&self.type_, &other.type_)
            && exact_match_field(&self.kind, &other.kind)
            && exact_match_field(&self.name, &other.name)
            && exact_match_field(&self.version, &other.version)
    }

    /// 通配字段数量
    pub fn wildcard_count(&self) -> usize {
        [&self.group, &self.type_, &self.kind, &self.name, &self.version]
            .iter()
            .filter(|field| field.is_none())
            .count()
    }

    /// 是否不含任何通配符
    pub fn is_complete(&self) -> bool {
        self.wildcard_count() == 0
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.exact_match(other)
    }
}

impl Eq for Descriptor {}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.group, &self.type_, &self.kind, &self.name, &self.version];
        let rendered: Vec<&str> = parts.iter().map(|p| p.as_deref().unwrap_or("*")).collect();
        write!(f, "{}", rendered.join(":"))
    }
}

impl FromStr for Descriptor {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// 组件定位符
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// 按描述符定位，支持通配匹配
    Descriptor(Descriptor),
    /// 按名称定位，要求完全相等
    Name(String),
}

impl Locator {
    /// 按名称创建定位符
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// 判断两个定位符是否匹配
    pub fn matches(&self, other: &Locator) -> bool {
        match (self, other) {
            (Self::Descriptor(left), Self::Descriptor(right)) => left.matches(right),
            (Self::Name(left), Self::Name(right)) => left == right,
            _ => false,
        }
    }

    /// 获取描述符（如果是描述符定位）
    pub fn as_descriptor(&self) -> Option<&Descriptor> {
        match self {
            Self::Descriptor(descriptor) => Some(descriptor),
            Self::Name(_) => None,
        }
    }

    /// 匹配精度：通配字段越少越具体
    pub fn specificity(&self) -> usize {
        match self {
            Self::Descriptor(descriptor) => 5 - descriptor.wildcard_count(),
            Self::Name(_) => 5,
        }
    }
}

impl From<Descriptor> for Locator {
    fn from(descriptor: Descriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl From<&Descriptor> for Locator {
    fn from(descriptor: &Descriptor) -> Self {
        Self::Descriptor(descriptor.clone())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor(descriptor) => descriptor.fmt(f),
            Self::Name(name) => f.write_str(name),
        }
    }
}

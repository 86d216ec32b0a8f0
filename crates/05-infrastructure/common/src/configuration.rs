//! 配置参数
//!
//! [`ConfigParams`] 是按声明顺序保存的字符串键值表，键使用 `.` 分隔的层级路径，
//! 例如 `options.timeout`。顺序对容器配置很重要：组件按照配置文件中的声明顺序创建。

use crate::errors::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 配置参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigParams {
    /// 配置数据
    data: IndexMap<String, String>,
}

impl ConfigParams {
    /// 创建空的配置参数
    pub fn new() -> Self {
        Self {
            data: IndexMap::new(),
        }
    }

    /// 从键值对创建配置参数
    pub fn from_tuples<K, V, I>(tuples: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in tuples {
            params.set(key, value.to_string());
        }
        params
    }

    /// 将 JSON 值展开为点分路径的配置参数
    pub fn from_value(value: &Value) -> Self {
        let mut params = Self::new();
        flatten_value("", value, &mut params.data);
        params
    }

    /// 设置配置项
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// 获取字符串配置项
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    /// 获取字符串配置项，缺失时返回默认值
    pub fn get_as_string_with_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// 获取 i64 配置项，缺失或无法解析时返回默认值
    pub fn get_as_long_with_default(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// 获取 i32 配置项，缺失或无法解析时返回默认值
    pub fn get_as_integer_with_default(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|value| value.trim().parse::<i32>().ok())
            .unwrap_or(default)
    }

    /// 获取布尔配置项，缺失或无法解析时返回默认值
    pub fn get_as_boolean_with_default(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if matches!(value.as_str(), "true" | "1" | "yes" | "y" | "t") => true,
            Some(value) if matches!(value.as_str(), "false" | "0" | "no" | "n" | "f") => false,
            _ => default,
        }
    }

    /// 获取配置节（去掉前缀后的子参数）
    pub fn get_section(&self, section: &str) -> ConfigParams {
        let prefix = format!("{section}.");
        let data = self
            .data
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        Self { data }
    }

    /// 获取所有配置节名称，保持首次出现的顺序
    pub fn get_section_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for key in self.data.keys() {
            let name = key.split('.').next().unwrap_or(key.as_str());
            if !name.is_empty() && !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// 添加配置节
    pub fn add_section(&mut self, section: &str, params: &ConfigParams) {
        for (key, value) in params.iter() {
            self.set(format!("{section}.{key}"), value);
        }
    }

    /// 用另一组参数覆盖当前参数，返回新的参数
    pub fn override_with(&self, other: &ConfigParams) -> ConfigParams {
        let mut result = self.clone();
        for (key, value) in other.iter() {
            result.set(key, value);
        }
        result
    }

    /// 为缺失的键补上默认值，返回新的参数
    pub fn set_defaults(&self, defaults: &ConfigParams) -> ConfigParams {
        defaults.override_with(self)
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按声明顺序遍历配置项
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 绑定到具体类型
    ///
    /// 点分路径还原为嵌套对象，看起来像数字或布尔值的字符串按对应类型处理。
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut root = Map::new();
        for (key, value) in &self.data {
            insert_path(&mut root, key, scalar_value(value));
        }

        serde_json::from_value(Value::Object(root))
            .map_err(|e| ConfigError::SerializationError { source: e })
    }
}

fn flatten_value(prefix: &str, value: &Value, data: &mut IndexMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_value(&join(key), nested, data);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_value(&join(&index.to_string()), nested, data);
            }
        }
        Value::String(text) => {
            data.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {
            data.insert(prefix.to_string(), String::new());
        }
        other => {
            data.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn scalar_value(value: &str) -> Value {
    if let Ok(number) = value.parse::<i64>() {
        return Value::from(number);
    }
    if let Ok(number) = value.parse::<f64>() {
        if number.is_finite() {
            return Value::from(number);
        }
    }
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(value.to_string()),
    }
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            root.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                insert_path(nested, rest, value);
            }
        }
    }
}

//! 调用上下文

use serde_json::Value;
use std::collections::HashMap;

/// 调用上下文
///
/// 沿调用链传递的键值集合，最常用的是用于日志关联的 trace id。
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    /// trace id 的键名
    pub const TRACE_ID: &'static str = "trace_id";

    /// 创建空上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 trace id 创建上下文
    pub fn from_trace_id(trace_id: impl Into<String>) -> Self {
        Self::new().with_value(Self::TRACE_ID, Value::String(trace_id.into()))
    }

    /// 添加值
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// 获取值
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// 获取 trace id，兼容旧的 `correlation_id` 键
    pub fn trace_id(&self) -> Option<&str> {
        self.get(Self::TRACE_ID)
            .or_else(|| self.get("correlation_id"))
            .and_then(Value::as_str)
    }
}

/// 从可选上下文中取出 trace id
pub fn trace_id_of(context: Option<&Context>) -> Option<String> {
    context.and_then(Context::trace_id).map(ToString::to_string)
}

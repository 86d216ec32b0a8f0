//! 状态存储抽象接口

use async_trait::async_trait;
use infrastructure_common::{Context, InfrastructureError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 键值状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateValue {
    /// 键
    pub key: String,
    /// 值
    pub value: Value,
}

impl StateValue {
    /// 创建状态值
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// 状态存储 trait
///
/// 与缓存不同，状态没有单条过期时间。
#[async_trait]
pub trait StateStore: Send + Sync {
    /// 读取状态
    async fn load(
        &self,
        context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError>;

    /// 批量读取状态，只返回存在的键，顺序与请求一致
    async fn load_bulk(
        &self,
        context: Option<&Context>,
        keys: &[String],
    ) -> Result<Vec<StateValue>, InfrastructureError>;

    /// 保存状态，返回保存的值
    async fn save(
        &self,
        context: Option<&Context>,
        key: &str,
        value: Value,
    ) -> Result<Value, InfrastructureError>;

    /// 删除状态，返回被删除的值
    async fn delete(
        &self,
        context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError>;
}

//! 缓存抽象接口

use async_trait::async_trait;
use infrastructure_common::{trace_id_of, Context, InfrastructureError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// 键值缓存 trait
#[async_trait]
pub trait Cache: Send + Sync {
    /// 读取缓存值，不存在或已过期时返回 `None`
    async fn retrieve(
        &self,
        context: Option<&Context>,
        key: &str,
    ) -> Result<Option<Value>, InfrastructureError>;

    /// 写入缓存值
    ///
    /// `timeout` 为毫秒；小于等于 0 时使用缓存配置的默认过期时间。返回写入的值。
    async fn store(
        &self,
        context: Option<&Context>,
        key: &str,
        value: Value,
        timeout: i64,
    ) -> Result<Value, InfrastructureError>;

    /// 删除缓存值，键不存在时不报错
    async fn remove(&self, context: Option<&Context>, key: &str) -> Result<(), InfrastructureError>;
}

/// 缓存的类型化读写扩展
#[async_trait]
pub trait CacheExt: Cache {
    /// 读取并反序列化缓存值
    async fn retrieve_as<T>(
        &self,
        context: Option<&Context>,
        key: &str,
    ) -> Result<Option<T>, InfrastructureError>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.retrieve(context, key).await?;
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                InfrastructureError::wrap(trace_id_of(context), "缓存值反序列化失败", Box::new(e))
            })
    }

    /// 序列化并写入缓存值
    async fn store_as<T>(
        &self,
        context: Option<&Context>,
        key: &str,
        value: &T,
        timeout: i64,
    ) -> Result<(), InfrastructureError>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value).map_err(|e| {
            InfrastructureError::wrap(trace_id_of(context), "缓存值序列化失败", Box::new(e))
        })?;
        self.store(context, key, value, timeout).await?;
        Ok(())
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

//! 锁抽象接口

use async_trait::async_trait;
use infrastructure_common::{trace_id_of, Context, InfrastructureError, LockError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 默认重试间隔（毫秒）
pub const DEFAULT_RETRY_TIMEOUT_MS: u64 = 100;

/// 按键互斥的锁 trait
#[async_trait]
pub trait Lock: Send + Sync {
    /// 尝试获取锁，只尝试一次
    ///
    /// `ttl` 为毫秒，到期后锁自动释放。
    async fn try_acquire_lock(
        &self,
        context: Option<&Context>,
        key: &str,
        ttl: i64,
    ) -> Result<bool, InfrastructureError>;

    /// 释放锁
    async fn release_lock(&self, context: Option<&Context>, key: &str)
        -> Result<(), InfrastructureError>;

    /// 阻塞获取时的重试间隔
    fn retry_timeout(&self) -> Duration {
        Duration::from_millis(DEFAULT_RETRY_TIMEOUT_MS)
    }

    /// 获取锁，在 `timeout` 毫秒内反复尝试
    ///
    /// 超时返回 [`LockError::Timeout`]。
    async fn acquire_lock(
        &self,
        context: Option<&Context>,
        key: &str,
        ttl: i64,
        timeout: i64,
    ) -> Result<(), InfrastructureError> {
        let deadline = Instant::now() + Duration::from_millis(u64::try_from(timeout).unwrap_or(0));

        loop {
            if self.try_acquire_lock(context, key, ttl).await? {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(key, timeout, "获取锁超时");
                return Err(LockError::Timeout {
                    trace_id: trace_id_of(context),
                    key: key.to_string(),
                }
                .into());
            }

            tokio::time::sleep(self.retry_timeout().min(deadline - now)).await;
        }
    }
}

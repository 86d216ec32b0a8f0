//! 命令拦截器

use crate::command::Command;
use crate::schema::ObjectSchema;
use async_trait::async_trait;
use infrastructure_common::{Context, InvocationError, ValidationResult};
use serde_json::Value;
use std::sync::Arc;

/// 命令拦截器
///
/// 每个方法要么委托给下一个命令，要么完全接管响应。默认实现全部直接委托。
#[async_trait]
pub trait CommandInterceptor: Send + Sync {
    /// 拦截后的命令名称
    fn get_name(&self, command: &dyn Command) -> String {
        command.name().to_string()
    }

    /// 拦截执行
    async fn execute(
        &self,
        context: Option<&Context>,
        command: &dyn Command,
        args: &Value,
    ) -> Result<Value, InvocationError> {
        command.execute(context, args).await
    }

    /// 拦截校验
    fn validate(&self, command: &dyn Command, args: &Value) -> Vec<ValidationResult> {
        command.validate(args)
    }
}

/// 经过拦截器包装的命令
pub struct InterceptedCommand {
    name: String,
    interceptor: Arc<dyn CommandInterceptor>,
    next: Arc<dyn Command>,
}

impl InterceptedCommand {
    /// 用拦截器包装命令
    pub fn new(interceptor: Arc<dyn CommandInterceptor>, next: Arc<dyn Command>) -> Self {
        let name = interceptor.get_name(next.as_ref());
        Self {
            name,
            interceptor,
            next,
        }
    }
}

#[async_trait]
impl Command for InterceptedCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&ObjectSchema> {
        self.next.schema()
    }

    async fn execute(
        &self,
        context: Option<&Context>,
        args: &Value,
    ) -> Result<Value, InvocationError> {
        self.interceptor
            .execute(context, self.next.as_ref(), args)
            .await
    }

    fn validate(&self, args: &Value) -> Vec<ValidationResult> {
        self.interceptor.validate(self.next.as_ref(), args)
    }
}

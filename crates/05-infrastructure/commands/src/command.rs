//! 命令抽象与函数命令

use crate::schema::ObjectSchema;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use infrastructure_common::{
    blocking_results, trace_id_of, BoxError, Context, InvocationError, ValidationResult,
};
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

/// 可调用的命名操作
#[async_trait]
pub trait Command: Send + Sync {
    /// 命令名称，在命令集中唯一
    fn name(&self) -> &str;

    /// 参数校验模式
    fn schema(&self) -> Option<&ObjectSchema> {
        None
    }

    /// 执行命令
    async fn execute(&self, context: Option<&Context>, args: &Value)
        -> Result<Value, InvocationError>;

    /// 只校验参数，不执行
    fn validate(&self, args: &Value) -> Vec<ValidationResult> {
        self.schema()
            .map(|schema| schema.validate(args))
            .unwrap_or_default()
    }
}

/// 命令处理函数返回的 future
pub type CommandFuture = BoxFuture<'static, Result<Value, BoxError>>;

type Handler = Arc<dyn Fn(Option<Context>, Value) -> CommandFuture + Send + Sync>;

/// 由函数实现的命令
///
/// 执行前先按模式校验参数，任何错误级别的结果都会阻止函数被调用；
/// 函数返回的错误或 panic 被包装为 [`InvocationError::ExecutionFailed`]，保留原始错误。
pub struct LambdaCommand {
    name: String,
    schema: Option<ObjectSchema>,
    handler: Handler,
}

impl LambdaCommand {
    /// 创建函数命令
    pub fn new<F>(name: impl Into<String>, schema: Option<ObjectSchema>, handler: F) -> Self
    where
        F: Fn(Option<Context>, Value) -> CommandFuture + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            schema,
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Command for LambdaCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&ObjectSchema> {
        self.schema.as_ref()
    }

    async fn execute(
        &self,
        context: Option<&Context>,
        args: &Value,
    ) -> Result<Value, InvocationError> {
        let trace_id = trace_id_of(context);

        let errors = blocking_results(&self.validate(args), false);
        if !errors.is_empty() {
            warn!(trace_id = ?trace_id, command = %self.name, violations = errors.len(), "命令参数校验失败");
            return Err(InvocationError::ValidationFailed {
                trace_id,
                command: Some(self.name.clone()),
                results: errors,
            });
        }

        debug!(trace_id = ?trace_id, command = %self.name, "执行命令");
        let handler = &self.handler;
        let (context, args) = (context.cloned(), args.clone());
        AssertUnwindSafe(async move { handler(context, args).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panic_error(payload)))
            .map_err(|source| {
                warn!(trace_id = ?trace_id, command = %self.name, error = %source, "命令执行失败");
                InvocationError::ExecutionFailed {
                    trace_id,
                    command: self.name.clone(),
                    source,
                }
            })
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> BoxError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "未知错误".to_string());
    format!("命令处理函数 panic: {message}").into()
}

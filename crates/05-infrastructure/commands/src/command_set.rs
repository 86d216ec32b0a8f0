//! 命令集

use crate::command::Command;
use crate::interceptor::{CommandInterceptor, InterceptedCommand};
use infrastructure_common::{
    blocking_results, trace_id_of, Context, InvocationError, ValidationResult,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 命令不存在时的校验结果码
pub const CMD_NOT_FOUND: &str = "CMD_NOT_FOUND";

/// 按名称组织的命令集合
///
/// 拦截器按添加顺序由外向内包装每个命令。同名命令后添加者替换先添加者，位置保持不变。
#[derive(Default)]
pub struct CommandSet {
    originals: Vec<Arc<dyn Command>>,
    commands: Vec<Arc<dyn Command>>,
    lookup: HashMap<String, usize>,
    interceptors: Vec<Arc<dyn CommandInterceptor>>,
}

impl CommandSet {
    /// 创建空的命令集
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加命令
    pub fn add_command(&mut self, command: Arc<dyn Command>) {
        match self
            .originals
            .iter()
            .position(|existing| existing.name() == command.name())
        {
            Some(index) => self.originals[index] = command,
            None => self.originals.push(command),
        }
        self.rebuild();
    }

    /// 批量添加命令
    pub fn add_commands(&mut self, commands: impl IntoIterator<Item = Arc<dyn Command>>) {
        for command in commands {
            self.add_command(command);
        }
    }

    /// 合并另一个命令集的全部命令
    pub fn add_command_set(&mut self, other: &CommandSet) {
        self.add_commands(other.originals.iter().cloned());
    }

    /// 添加拦截器，先添加的位于最外层
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn CommandInterceptor>) {
        self.interceptors.push(interceptor);
        self.rebuild();
    }

    /// 按名称查找命令
    pub fn find_command(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.lookup
            .get(name)
            .map(|index| Arc::clone(&self.commands[*index]))
    }

    /// 全部命令，按添加顺序
    pub fn get_commands(&self) -> Vec<Arc<dyn Command>> {
        self.commands.clone()
    }

    /// 命令数量
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 校验命令参数
    pub fn validate(&self, name: &str, args: &Value) -> Vec<ValidationResult> {
        match self.find_command(name) {
            Some(command) => command.validate(args),
            None => vec![ValidationResult::error(
                "",
                CMD_NOT_FOUND,
                format!("命令不存在: {name}"),
            )],
        }
    }

    /// 执行命令
    pub async fn execute(
        &self,
        context: Option<&Context>,
        name: &str,
        args: &Value,
    ) -> Result<Value, InvocationError> {
        let trace_id = trace_id_of(context);
        let command = self
            .find_command(name)
            .ok_or_else(|| InvocationError::CommandNotFound {
                trace_id: trace_id.clone(),
                command: name.to_string(),
            })?;

        let errors = blocking_results(&command.validate(args), false);
        if !errors.is_empty() {
            return Err(InvocationError::ValidationFailed {
                trace_id,
                command: Some(name.to_string()),
                results: errors,
            });
        }

        debug!(trace_id = ?trace_id, command = %name, "分发命令");
        command.execute(context, args).await
    }

    fn rebuild(&mut self) {
        self.commands.clear();
        self.lookup.clear();

        for original in &self.originals {
            let mut command = Arc::clone(original);
            for interceptor in self.interceptors.iter().rev() {
                command = Arc::new(InterceptedCommand::new(Arc::clone(interceptor), command));
            }
            self.lookup
                .insert(command.name().to_string(), self.commands.len());
            self.commands.push(command);
        }
    }
}

/// 暴露命令集的组件
pub trait Commandable {
    /// 组件的命令集
    fn get_command_set(&self) -> &CommandSet;
}

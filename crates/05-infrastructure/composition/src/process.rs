//! 进程容器
//!
//! 在 [`Container`] 之外处理命令行参数、日志初始化和退出信号。

use crate::container::Container;
use crate::logging::{init_logging, LoggingConfig};
use clap::Parser;
use di_abstractions::Factory;
use infrastructure_common::{ConfigParams, Context, InfrastructureError};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.yml";

/// 进程容器命令行参数
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct ProcessArgs {
    /// 容器配置文件
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 配置模板参数，形如 key=value，可重复
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// 日志级别
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: Level,
}

impl ProcessArgs {
    /// 模板参数
    pub fn parameters(&self) -> ConfigParams {
        ConfigParams::from_tuples(self.params.iter().cloned())
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("参数格式应为 key=value: {raw}")),
    }
}

/// 作为独立进程运行的容器
pub struct ProcessContainer {
    container: Container,
}

impl ProcessContainer {
    /// 创建进程容器
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            container: Container::new(name, description),
        }
    }

    /// 内部容器
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// 添加工厂
    pub fn add_factory(&self, factory: Arc<dyn Factory>) {
        self.container.add_factory(factory);
    }

    /// 解析进程参数并运行，直到收到 Ctrl-C
    pub async fn run(&self) -> Result<(), InfrastructureError> {
        self.run_with(ProcessArgs::parse()).await
    }

    /// 使用给定参数运行，直到收到 Ctrl-C
    pub async fn run_with(&self, args: ProcessArgs) -> Result<(), InfrastructureError> {
        init_logging(&LoggingConfig::default().with_level(args.log_level));

        let context = self.start(&args).await?;

        let signal = tokio::signal::ctrl_c().await;
        info!(container = %self.container.info().name(), "收到退出信号");

        self.container.close(Some(&context)).await?;
        signal.map_err(|e| {
            InfrastructureError::wrap(
                context.trace_id().map(ToString::to_string),
                "等待退出信号失败",
                Box::new(e),
            )
        })
    }

    /// 读取配置并打开容器，返回本次运行的上下文
    pub async fn start(&self, args: &ProcessArgs) -> Result<Context, InfrastructureError> {
        let info = self.container.info();
        let context = Context::from_trace_id(info.name());

        self.container.read_config_from_file(
            context.trace_id(),
            &args.config,
            &args.parameters(),
        )?;
        self.container.open(Some(&context)).await?;

        info!(
            container = %self.container.info().name(),
            config = %args.config.display(),
            "进程容器已启动，按 Ctrl-C 退出"
        );
        Ok(context)
    }

    /// 关闭容器
    pub async fn stop(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.container.close(context).await
    }
}

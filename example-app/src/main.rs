//! # 示例应用程序
//!
//! 以进程容器方式运行广告活动服务：从配置文件创建仓储、缓存、锁和控制器，
//! 通过命令演示读写，然后等待 Ctrl-C 退出。

mod campaigns;
mod controller;
mod factory;

use clap::Parser;
use di_abstractions::References;
use infrastructure_commands::Commandable;
use infrastructure_common::{Context, Locator};
use infrastructure_composition::{ProcessArgs, ProcessContainer};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProcessArgs::parse();

    let process = ProcessContainer::new("example-app", Some("Lorn ADSP 示例应用".to_string()));
    process.add_factory(Arc::new(factory::campaign_factory()));

    infrastructure_composition::init_logging(
        &infrastructure_composition::LoggingConfig::development().with_level(args.log_level),
    );

    let context = process.start(&args).await?;

    if let Err(e) = demonstrate_commands(&process, &context).await {
        warn!(error = %e, "命令演示失败");
    }

    tokio::signal::ctrl_c().await?;
    info!("收到退出信号，正在关闭应用");

    process.stop(Some(&context)).await?;
    info!("应用已关闭");
    Ok(())
}

/// 通过控制器的命令集读写广告活动
async fn demonstrate_commands(process: &ProcessContainer, context: &Context) -> anyhow::Result<()> {
    let references = process
        .container()
        .references()
        .ok_or_else(|| anyhow::anyhow!("容器未打开"))?;
    let controller =
        references.get_one_required_raw(&Locator::from(factory::controller_descriptor()))?;
    let commandable: &dyn Commandable = controller
        .as_commandable()
        .ok_or_else(|| anyhow::anyhow!("控制器未暴露命令集"))?;
    let commands = commandable.get_command_set();

    let saved = commands
        .execute(
            Some(context),
            "save_campaign",
            &json!({ "campaign": { "id": "42", "name": "spring-sale", "daily_budget": 250.0 } }),
        )
        .await?;
    info!(campaign = %saved, "已保存广告活动");

    let loaded = commands
        .execute(Some(context), "get_campaign", &json!({ "campaign_id": "42" }))
        .await?;
    info!(campaign = %loaded, "已读取广告活动");

    if let Err(e) = commands
        .execute(Some(context), "get_campaign", &json!({ "id": 42 }))
        .await
    {
        info!(code = e.code(), error = %e, "参数校验按预期拒绝了请求");
    }
    Ok(())
}

//! 广告活动控制器

use crate::campaigns::{Campaign, CampaignRepository};
use caching_abstractions::{Cache, CacheExt, Lock};
use di_abstractions::{Component, Configurable, References, Referenceable};
use di_impl::DependencyResolver;
use futures::FutureExt;
use infrastructure_commands::{
    CommandSet, Commandable, LambdaCommand, ObjectSchema, PropertySchema, TypeCode,
};
use infrastructure_common::{
    BoxError, ConfigError, ConfigParams, Context, Descriptor, InfrastructureError, Locator,
};
use serde_json::Value;
use std::sync::Arc;

const CACHE_TTL_MS: i64 = 30_000;

/// 通过命令暴露广告活动操作的控制器
pub struct CampaignController {
    resolver: Arc<DependencyResolver>,
    commands: CommandSet,
}

impl CampaignController {
    /// 创建控制器，缓存与锁可由配置中的任何实现提供
    pub fn new() -> Self {
        let resolver = Arc::new(DependencyResolver::with_references([
            (
                "repository",
                Locator::from(Descriptor::new("lorn-adsp", "repository", "*", "*", "1.0")),
            ),
            (
                "cache",
                Locator::from(Descriptor::new("pip-services", "cache", "*", "*", "1.0")),
            ),
            (
                "lock",
                Locator::from(Descriptor::new("pip-services", "lock", "*", "*", "1.0")),
            ),
        ]));

        let mut commands = CommandSet::new();
        commands.add_command(Arc::new(get_campaign(Arc::clone(&resolver))));
        commands.add_command(Arc::new(save_campaign(Arc::clone(&resolver))));

        Self { resolver, commands }
    }
}

impl Default for CampaignController {
    fn default() -> Self {
        Self::new()
    }
}

fn get_campaign(resolver: Arc<DependencyResolver>) -> LambdaCommand {
    let schema = ObjectSchema::new().with_required_property("campaign_id", TypeCode::String);

    LambdaCommand::new("get_campaign", Some(schema), move |context, args| {
        load_campaign(Arc::clone(&resolver), context, args).boxed()
    })
}

async fn load_campaign(
    resolver: Arc<DependencyResolver>,
    context: Option<Context>,
    args: Value,
) -> Result<Value, BoxError> {
    let id = args["campaign_id"].as_str().unwrap_or_default();
    let cache: Arc<dyn Cache> = resolver.get_one_required_cache("cache")?;
    let key = format!("campaign:{id}");

    if let Some(campaign) = cache
        .retrieve_as::<Campaign>(context.as_ref(), &key)
        .await?
    {
        return Ok(serde_json::to_value(campaign)?);
    }

    let repository = resolver.get_one_required::<CampaignRepository>("repository")?;
    match repository.get(id) {
        Some(campaign) => {
            cache
                .store_as(context.as_ref(), &key, &campaign, CACHE_TTL_MS)
                .await?;
            Ok(serde_json::to_value(campaign)?)
        }
        None => Ok(Value::Null),
    }
}

fn save_campaign(resolver: Arc<DependencyResolver>) -> LambdaCommand {
    let schema = ObjectSchema::new().with_property(
        PropertySchema::new("campaign", Some(TypeCode::Object), true).with_schema(
            ObjectSchema::new()
                .with_required_property("id", TypeCode::String)
                .with_required_property("name", TypeCode::String)
                .with_required_property("daily_budget", TypeCode::Double),
        ),
    );

    LambdaCommand::new("save_campaign", Some(schema), move |context, args| {
        store_campaign(Arc::clone(&resolver), context, args).boxed()
    })
}

async fn store_campaign(
    resolver: Arc<DependencyResolver>,
    context: Option<Context>,
    args: Value,
) -> Result<Value, BoxError> {
    let campaign: Campaign = serde_json::from_value(args["campaign"].clone())?;
    let lock: Arc<dyn Lock> = resolver.get_one_required_lock("lock")?;
    let cache: Arc<dyn Cache> = resolver.get_one_required_cache("cache")?;
    let repository = resolver.get_one_required::<CampaignRepository>("repository")?;

    let key = format!("campaign:{}", campaign.id);
    lock.acquire_lock(context.as_ref(), &key, 1_000, 500).await?;
    let saved = repository.save(campaign);
    let invalidated = cache.remove(context.as_ref(), &key).await;
    lock.release_lock(context.as_ref(), &key).await?;
    invalidated?;

    Ok(serde_json::to_value(saved)?)
}

impl Configurable for CampaignController {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        self.resolver.configure(config)
    }
}

impl Referenceable for CampaignController {
    fn set_references(&self, references: &Arc<dyn References>) -> Result<(), InfrastructureError> {
        self.resolver.set_references(references)?;
        // 启动时即校验必需依赖
        self.resolver.get_one_required::<CampaignRepository>("repository")?;
        Ok(())
    }
}

impl Commandable for CampaignController {
    fn get_command_set(&self) -> &CommandSet {
        &self.commands
    }
}

impl Component for CampaignController {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }

    fn as_commandable(&self) -> Option<&dyn Commandable> {
        Some(self)
    }
}

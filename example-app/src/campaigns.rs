//! 广告活动仓储

use async_trait::async_trait;
use di_abstractions::{Closable, Component, Configurable, Openable};
use infrastructure_common::{ConfigError, ConfigParams, Context, InfrastructureError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// 广告活动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// 活动标识
    pub id: String,
    /// 活动名称
    pub name: String,
    /// 每日预算
    pub daily_budget: f64,
}

/// 内存中的广告活动仓储
#[derive(Default)]
pub struct CampaignRepository {
    campaigns: RwLock<BTreeMap<String, Campaign>>,
    seed: RwLock<usize>,
    opened: AtomicBool,
}

impl CampaignRepository {
    /// 按标识读取活动
    pub fn get(&self, id: &str) -> Option<Campaign> {
        self.campaigns.read().get(id).cloned()
    }

    /// 保存活动，返回保存后的副本
    pub fn save(&self, campaign: Campaign) -> Campaign {
        self.campaigns
            .write()
            .insert(campaign.id.clone(), campaign.clone());
        campaign
    }
}

impl Configurable for CampaignRepository {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let seed = config.get_as_integer_with_default("options.seed", 0);
        *self.seed.write() = usize::try_from(seed).map_err(|_| {
            ConfigError::invalid_config(None, format!("options.seed 不能为负数: {seed}"))
        })?;
        Ok(())
    }
}

#[async_trait]
impl Closable for CampaignRepository {
    async fn close(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Openable for CampaignRepository {
    fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    async fn open(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        let seed = *self.seed.read();
        for index in 1..=seed {
            self.save(Campaign {
                id: index.to_string(),
                name: format!("campaign-{index}"),
                daily_budget: 100.0 * index as f64,
            });
        }
        self.opened.store(true, Ordering::SeqCst);
        info!(trace_id = ?context.and_then(Context::trace_id), campaigns = seed, "广告活动仓储已打开");
        Ok(())
    }
}

impl Component for CampaignRepository {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn as_openable(&self) -> Option<&dyn Openable> {
        Some(self)
    }
}

//! 示例组件工厂

use crate::campaigns::CampaignRepository;
use crate::controller::CampaignController;
use di_impl::DefaultFactory;
use infrastructure_common::Descriptor;

/// 广告活动仓储描述符
pub fn repository_descriptor() -> Descriptor {
    Descriptor::new("lorn-adsp", "repository", "memory", "*", "1.0")
}

/// 广告活动控制器描述符
pub fn controller_descriptor() -> Descriptor {
    Descriptor::new("lorn-adsp", "controller", "default", "*", "1.0")
}

/// 广告活动组件工厂
pub fn campaign_factory() -> DefaultFactory {
    let factory = DefaultFactory::new();
    factory.register_as_type::<CampaignRepository>(repository_descriptor());
    factory.register_as_type::<CampaignController>(controller_descriptor());
    factory
}

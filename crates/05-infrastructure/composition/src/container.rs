//! 控制反转容器

use crate::context_info::{context_info_descriptor, ContextInfo};
use crate::factory::{container_factory_descriptor, DefaultContainerFactory};
use config_abstractions::ContainerConfig;
use config_impl::ContainerConfigReader;
use di_abstractions::{Component, Factory, References, ReferencesExt};
use di_impl::{Closer, ContainerReferences, Opener, Referencer};
use infrastructure_common::{
    trace_id_of, ConfigError, ConfigParams, Context, InfrastructureError, LifecycleError,
    LifecycleState, Locator,
};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// 控制反转容器
///
/// 按配置创建组件、注入引用并按创建顺序打开；关闭时按相反顺序关闭。
/// 打开过程中任一步骤失败，容器会尽力关闭已创建的组件并回到 `Closed`，
/// 然后返回原始错误，调用方可以修正配置后重试。
pub struct Container {
    info: RwLock<Arc<ContextInfo>>,
    config: RwLock<Option<ContainerConfig>>,
    factories: Arc<DefaultContainerFactory>,
    references: RwLock<Option<Arc<ContainerReferences>>>,
    state: RwLock<LifecycleState>,
    // 串行化 open/close
    transition: Mutex<()>,
}

impl Container {
    /// 创建容器
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            info: RwLock::new(Arc::new(ContextInfo::new(name, description))),
            config: RwLock::new(None),
            factories: Arc::new(DefaultContainerFactory::new()),
            references: RwLock::new(None),
            state: RwLock::new(LifecycleState::Closed),
            transition: Mutex::new(()),
        }
    }

    /// 从配置参数读取容器配置
    pub fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        let config = ContainerConfig::from_config(config)?;
        self.set_config(config);
        Ok(())
    }

    /// 直接设置容器配置
    pub fn set_config(&self, config: ContainerConfig) {
        debug!(
            container = %self.info().name(),
            components = config.len(),
            "设置容器配置"
        );
        *self.config.write() = Some(config);
    }

    /// 从文件读取容器配置
    pub fn read_config_from_file<P: AsRef<Path>>(
        &self,
        trace_id: Option<&str>,
        path: P,
        parameters: &ConfigParams,
    ) -> Result<(), ConfigError> {
        let config = ContainerConfigReader::read_from_file(trace_id, path, parameters)?;
        self.set_config(config);
        Ok(())
    }

    /// 添加工厂，后添加的优先
    pub fn add_factory(&self, factory: Arc<dyn Factory>) {
        self.factories.add(factory);
    }

    /// 容器上下文信息
    pub fn info(&self) -> Arc<ContextInfo> {
        Arc::clone(&self.info.read())
    }

    /// 当前引用表，仅在打开期间存在
    pub fn references(&self) -> Option<Arc<ContainerReferences>> {
        self.references.read().clone()
    }

    /// 生命周期状态
    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    /// 是否已打开
    pub fn is_open(&self) -> bool {
        self.state() == LifecycleState::Open
    }

    fn set_state(&self, state: LifecycleState) {
        *self.state.write() = state;
    }

    fn set_references(&self, references: Option<Arc<ContainerReferences>>) {
        *self.references.write() = references;
    }

    /// 打开容器
    pub async fn open(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        let _transition = self.transition.lock().await;
        let trace_id = trace_id_of(context);
        let name = self.info().name();

        if !self.state().can_open() {
            return Err(LifecycleError::AlreadyOpened {
                trace_id,
                component: name,
            }
            .into());
        }

        let config = self
            .config
            .read()
            .clone()
            .ok_or_else(|| ConfigError::no_config(trace_id.clone(), "容器尚未配置"))?;

        info!(trace_id = ?trace_id, container = %name, "开始打开容器");
        self.set_state(LifecycleState::Opening);

        let references = Arc::new(ContainerReferences::new());
        self.set_references(Some(Arc::clone(&references)));

        match self.start(context, &references, &config).await {
            Ok(()) => {
                self.set_state(LifecycleState::Open);
                let info = self.info();
                info!(
                    trace_id = ?trace_id,
                    container = %info.name(),
                    context_id = info.context_id(),
                    components = references.get_all().len(),
                    "容器已打开"
                );
                Ok(())
            }
            Err(e) => {
                error!(trace_id = ?trace_id, container = %name, error = %e, "容器打开失败，开始回滚");
                self.set_state(LifecycleState::Failed);
                if let Err(close_error) = self.teardown(context, &references).await {
                    warn!(
                        trace_id = ?trace_id,
                        container = %name,
                        error = %close_error,
                        "回滚时关闭组件失败"
                    );
                }
                self.set_references(None);
                self.set_state(LifecycleState::Closed);
                Err(e)
            }
        }
    }

    async fn start(
        &self,
        context: Option<&Context>,
        references: &Arc<ContainerReferences>,
        config: &ContainerConfig,
    ) -> Result<(), InfrastructureError> {
        let info_locator: Locator = context_info_descriptor().into();

        references.put(info_locator.clone(), self.info() as Arc<dyn Component>);
        references.put(
            container_factory_descriptor().into(),
            Arc::clone(&self.factories) as Arc<dyn Component>,
        );
        references.put_from_config(context, config)?;

        let components = references.get_all();
        let shared: Arc<dyn References> = Arc::clone(references) as Arc<dyn References>;
        Referencer::set_references(&shared, &components)?;

        if let Some(info) = references.get_one_optional::<ContextInfo>(&info_locator) {
            *self.info.write() = info;
        }

        Opener::open(context, &components).await
    }

    /// 关闭容器，未打开时为空操作
    ///
    /// 按创建的相反顺序关闭全部组件，关闭失败会记录并在最后返回第一个错误。
    pub async fn close(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        let _transition = self.transition.lock().await;
        let trace_id = trace_id_of(context);

        if !self.state().can_close() {
            return Ok(());
        }

        let name = self.info().name();
        info!(trace_id = ?trace_id, container = %name, "开始关闭容器");
        self.set_state(LifecycleState::Closing);

        let references = self.references.write().take();
        let result = match references {
            Some(references) => self.teardown(context, &references).await,
            None => Ok(()),
        };
        self.set_state(LifecycleState::Closed);

        match &result {
            Ok(()) => info!(trace_id = ?trace_id, container = %name, "容器已关闭"),
            Err(e) => error!(trace_id = ?trace_id, container = %name, error = %e, "容器关闭失败"),
        }
        result
    }

    async fn teardown(
        &self,
        context: Option<&Context>,
        references: &ContainerReferences,
    ) -> Result<(), InfrastructureError> {
        let mut components = references.get_all();
        components.reverse();

        let result = Closer::close(context, &components).await;
        Referencer::unset_references(&components);
        references.clear();
        result
    }
}

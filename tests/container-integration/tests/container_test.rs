//! 容器端到端测试
//!
//! 通过临时配置文件驱动容器：创建顺序、引用注入、打开与关闭顺序、失败回滚和重试。

use async_trait::async_trait;
use caching_abstractions::{Cache, Lock};
use caching_memory::{MemoryCache, MemoryLock};
use di_abstractions::{
    Closable, Component, Configurable, Openable, References, ReferencesExt, Referenceable,
};
use di_impl::{DefaultFactory, DependencyResolver};
use infrastructure_common::{
    trace_id_of, ConfigError, ConfigParams, Context, Descriptor, InfrastructureError,
    LifecycleState, Locator,
};
use infrastructure_composition::{init_logging, Container, LoggingConfig};
use parking_lot::Mutex;
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use tempfile::NamedTempFile;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        init_logging(&LoggingConfig::development());
    });
}

type Journal = Arc<Mutex<Vec<String>>>;

/// 记录生命周期调用的测试组件
///
/// 通过 `dependencies.*` 声明的依赖在注入引用时必须已经可见。
struct Recorder {
    name: String,
    journal: Journal,
    resolver: DependencyResolver,
    fail_open: AtomicBool,
    opened: AtomicBool,
}

impl Recorder {
    fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
            resolver: DependencyResolver::new(),
            fail_open: AtomicBool::new(false),
            opened: AtomicBool::new(false),
        }
    }

    fn log(&self, event: &str) {
        self.journal.lock().push(format!("{event}:{}", self.name));
    }
}

impl Configurable for Recorder {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        self.resolver.configure(config)?;
        self.fail_open.store(
            config.get_as_boolean_with_default("options.fail_open", false),
            Ordering::SeqCst,
        );
        self.log("configure");
        Ok(())
    }
}

impl Referenceable for Recorder {
    fn set_references(&self, references: &Arc<dyn References>) -> Result<(), InfrastructureError> {
        self.resolver.set_references(references)?;
        if self.resolver.locate("upstream").is_ok() {
            let upstream = self.resolver.get_one_required::<Recorder>("upstream")?;
            self.log(&format!("reference({})", upstream.name));
        } else {
            self.log("reference");
        }
        Ok(())
    }
}

#[async_trait]
impl Closable for Recorder {
    async fn close(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.opened.store(false, Ordering::SeqCst);
        self.log("close");
        Ok(())
    }
}

#[async_trait]
impl Openable for Recorder {
    fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    async fn open(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        if self.fail_open.load(Ordering::SeqCst) {
            self.log("fail");
            return Err(InfrastructureError::internal(
                trace_id_of(context),
                format!("{} refused to open", self.name),
            ));
        }
        self.opened.store(true, Ordering::SeqCst);
        self.log("open");
        Ok(())
    }
}

impl Component for Recorder {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }

    fn as_openable(&self) -> Option<&dyn Openable> {
        Some(self)
    }
}

fn recorder_factory(journal: &Journal) -> Arc<DefaultFactory> {
    let factory = Arc::new(DefaultFactory::new());
    let journal = Arc::clone(journal);
    factory.register(
        Descriptor::new("test", "recorder", "*", "*", "1.0"),
        move |locator| {
            let name = locator
                .as_descriptor()
                .and_then(|d| d.name())
                .unwrap_or("anonymous")
                .to_string();
            let component: Arc<dyn Component> = Arc::new(Recorder::new(&name, &journal));
            Ok(component)
        },
    );
    factory
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const CHAIN_CONFIG: &str = r#"
- descriptor: "test:recorder:default:database:1.0"

- descriptor: "test:recorder:default:service:1.0"
  dependencies:
    upstream: "test:recorder:*:database:1.0"

- descriptor: "test:recorder:default:gateway:1.0"
  dependencies:
    upstream: "test:recorder:*:service:1.0"
  options:
    fail_open: {{ FAIL_GATEWAY }}
"#;

fn recorder_container(journal: &Journal) -> Container {
    let container = Container::new("integration", None);
    container.add_factory(recorder_factory(journal));
    container
}

#[tokio::test]
async fn test_components_are_wired_opened_and_closed_in_order() {
    init_test_logger();
    let journal: Journal = Arc::default();
    let container = recorder_container(&journal);
    let file = write_config(CHAIN_CONFIG);

    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();
    container.open(None).await.unwrap();
    assert!(container.is_open());

    container.close(None).await.unwrap();
    assert!(!container.is_open());

    assert_eq!(
        *journal.lock(),
        vec![
            "configure:database",
            "configure:service",
            "configure:gateway",
            "reference:database",
            "reference(database):service",
            "reference(service):gateway",
            "open:database",
            "open:service",
            "open:gateway",
            "close:gateway",
            "close:service",
            "close:database",
        ]
    );
}

#[tokio::test]
async fn test_failed_open_rolls_back_and_can_be_retried() {
    init_test_logger();
    let journal: Journal = Arc::default();
    let container = recorder_container(&journal);
    let file = write_config(CHAIN_CONFIG);
    let context = Context::from_trace_id("rollback");

    container
        .read_config_from_file(
            context.trace_id(),
            file.path(),
            &ConfigParams::from_tuples([("FAIL_GATEWAY", "true")]),
        )
        .unwrap();

    let error = container.open(Some(&context)).await.unwrap_err();
    assert_eq!(error.code(), "INTERNAL");
    assert_eq!(error.trace_id(), Some("rollback"));
    assert!(error.to_string().contains("gateway refused to open"));
    assert_eq!(container.state(), LifecycleState::Closed);
    assert!(container.references().is_none());

    let events: Vec<String> = journal
        .lock()
        .iter()
        .filter(|event| !event.starts_with("configure") && !event.starts_with("reference"))
        .cloned()
        .collect();
    assert_eq!(
        events,
        vec![
            "open:database",
            "open:service",
            "fail:gateway",
            "close:gateway",
            "close:service",
            "close:database",
        ]
    );

    journal.lock().clear();
    container
        .read_config_from_file(
            context.trace_id(),
            file.path(),
            &ConfigParams::from_tuples([("FAIL_GATEWAY", "false")]),
        )
        .unwrap();
    container.open(Some(&context)).await.unwrap();
    assert!(container.is_open());
    assert!(journal.lock().contains(&"open:gateway".to_string()));

    container.close(Some(&context)).await.unwrap();
}

#[tokio::test]
async fn test_missing_dependency_aborts_startup() {
    init_test_logger();
    let journal: Journal = Arc::default();
    let container = recorder_container(&journal);
    let file = write_config(
        r#"
- descriptor: "test:recorder:default:service:1.0"
  dependencies:
    upstream: "test:recorder:*:database:1.0"
"#,
    );

    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();
    let error = container.open(None).await.unwrap_err();

    assert_eq!(error.code(), "REF_NOT_FOUND");
    assert_eq!(container.state(), LifecycleState::Closed);
    assert!(!journal.lock().iter().any(|event| event.starts_with("open")));
}

#[tokio::test]
async fn test_unknown_component_fails_with_cannot_create() {
    init_test_logger();
    let journal: Journal = Arc::default();
    let container = recorder_container(&journal);
    let file = write_config(
        r#"
- descriptor: "test:recorder:default:database:1.0"
- descriptor: "test:unknown:default:default:1.0"
"#,
    );

    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();
    let error = container.open(None).await.unwrap_err();

    assert_eq!(error.code(), "CANNOT_CREATE");
    assert_eq!(
        error.details().get("locator").map(String::as_str),
        Some("test:unknown:default:default:1.0")
    );
    assert_eq!(
        *journal.lock(),
        vec!["configure:database", "close:database"]
    );
}

/// 端到端场景使用的业务服务
#[derive(Default)]
struct ConcreteService {
    opened: AtomicBool,
}

#[async_trait]
impl Closable for ConcreteService {
    async fn close(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Openable for ConcreteService {
    fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    async fn open(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Component for ConcreteService {
    fn as_openable(&self) -> Option<&dyn Openable> {
        Some(self)
    }
}

#[tokio::test]
async fn test_end_to_end_service_container() {
    init_test_logger();
    let factory = DefaultFactory::new();
    factory.register_as_type::<ConcreteService>(Descriptor::new(
        "grp", "service", "default", "*", "1.0",
    ));

    let container = Container::new("e2e", None);
    container.add_factory(Arc::new(factory));
    let file = write_config("- descriptor: \"grp:service:default:default:1.0\"\n");
    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();

    container.open(None).await.unwrap();
    assert!(container.is_open());

    let locator = Locator::from(Descriptor::new("grp", "service", "default", "*", "1.0"));
    let service = container
        .references()
        .unwrap()
        .get_one_required::<ConcreteService>(&locator)
        .unwrap();
    assert!(service.is_open());

    container.close(None).await.unwrap();
    assert!(!container.is_open());
    assert!(!service.is_open());
}

#[tokio::test]
async fn test_default_factories_provide_cache_and_lock() {
    init_test_logger();
    let container = Container::new("caching", None);
    let file = write_config(
        r#"
cache:
  descriptor: "pip-services:cache:memory:default:1.0"
  options:
    max_size: 2
    timeout: 5000
lock:
  descriptor: "pip-services:lock:memory:default:1.0"
  options:
    retry_timeout: 10
"#,
    );
    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();
    container.open(None).await.unwrap();

    let references = container.references().unwrap();
    let cache = references
        .get_one_required::<MemoryCache>(&Descriptor::new("*", "cache", "*", "*", "*").into())
        .unwrap();
    assert_eq!(cache.max_size(), 2);
    cache.store(None, "k", json!({ "v": 1 }), 0).await.unwrap();
    assert_eq!(cache.retrieve(None, "k").await.unwrap(), Some(json!({ "v": 1 })));

    let lock = references
        .get_one_required::<MemoryLock>(&Descriptor::new("*", "lock", "*", "*", "*").into())
        .unwrap();
    assert!(lock.try_acquire_lock(None, "k", 1000).await.unwrap());
    assert!(!lock.try_acquire_lock(None, "k", 1000).await.unwrap());

    container.close(None).await.unwrap();
}

#[tokio::test]
async fn test_configured_null_variants_resolve_by_contract() {
    init_test_logger();
    let container = Container::new("null-caching", None);
    let file = write_config(
        r#"
- descriptor: "pip-services:cache:null:default:1.0"
- descriptor: "pip-services:lock:null:default:1.0"
"#,
    );
    container
        .read_config_from_file(None, file.path(), &ConfigParams::new())
        .unwrap();
    container.open(None).await.unwrap();

    let references = container.references().unwrap();
    let cache: Arc<dyn Cache> = references
        .get_one_required_cache(&Descriptor::new("pip-services", "cache", "*", "*", "1.0").into())
        .unwrap();
    cache.store(None, "k", json!(1), 0).await.unwrap();
    assert_eq!(cache.retrieve(None, "k").await.unwrap(), None);

    let lock: Arc<dyn Lock> = references
        .get_one_required_lock(&Descriptor::new("pip-services", "lock", "*", "*", "1.0").into())
        .unwrap();
    assert!(lock.try_acquire_lock(None, "k", 1000).await.unwrap());
    assert!(lock.try_acquire_lock(None, "k", 1000).await.unwrap());

    container.close(None).await.unwrap();
}

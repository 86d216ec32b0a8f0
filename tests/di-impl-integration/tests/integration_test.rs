//! Centralized integration tests for di-impl crate
//!
//! 覆盖按配置创建组件、命名依赖解析与批量生命周期操作。

use async_trait::async_trait;
use config_abstractions::{ComponentConfig, ContainerConfig};
use di_abstractions::{
    Closable, Component, Configurable, Openable, References, ReferencesExt, Referenceable,
};
use di_impl::{Closer, ContainerReferences, DefaultFactory, DependencyResolver, Opener, Referencer};
use infrastructure_common::{
    ConfigError, ConfigParams, Context, Descriptor, InfrastructureError, Locator,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Journal = Arc<Mutex<Vec<String>>>;

/// 记录生命周期调用的测试组件
#[derive(Debug)]
struct Recorder {
    name: String,
    journal: Journal,
    fail_open: AtomicBool,
    opened: AtomicBool,
    timeout: Mutex<i64>,
    peers: Mutex<usize>,
}

impl Recorder {
    fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
            fail_open: AtomicBool::new(false),
            opened: AtomicBool::new(false),
            timeout: Mutex::new(0),
            peers: Mutex::new(0),
        }
    }

    fn log(&self, event: &str) {
        self.journal.lock().push(format!("{}:{}", event, self.name));
    }
}

impl Configurable for Recorder {
    fn configure(&self, config: &ConfigParams) -> Result<(), ConfigError> {
        *self.timeout.lock() = config.get_as_long_with_default("options.timeout", 0);
        self.fail_open
            .store(config.get_as_boolean_with_default("options.fail_open", false), Ordering::SeqCst);
        self.log("configure");
        Ok(())
    }
}

impl Referenceable for Recorder {
    fn set_references(&self, references: &Arc<dyn References>) -> Result<(), InfrastructureError> {
        let peers = references.get_all_of::<Recorder>(&Descriptor::new("*", "recorder", "*", "*", "*").into());
        *self.peers.lock() = peers.len();
        self.log("reference");
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
            return Err(InfrastructureError::internal(
                infrastructure_common::trace_id_of(context),
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
    factory.register(Descriptor::new("test", "recorder", "*", "*", "1.0"), move |locator| {
        let name = locator
            .as_descriptor()
            .and_then(|d| d.name())
            .unwrap_or("anonymous")
            .to_string();
        let component: Arc<dyn Component> = Arc::new(Recorder::new(&name, &journal));
        Ok(component)
    });
    factory
}

fn recorder_config(name: &str, extra: &[(&str, &str)]) -> ComponentConfig {
    let mut params = ConfigParams::from_tuples([(
        "descriptor",
        format!("test:recorder:default:{name}:1.0"),
    )]);
    for (key, value) in extra {
        params.set(*key, *value);
    }
    ComponentConfig::from_config(&params).unwrap()
}

#[tokio::test]
async fn test_put_from_config_creates_and_configures_in_order() {
    let journal: Journal = Arc::default();
    let references = Arc::new(ContainerReferences::new());
    references.put(
        Descriptor::new("test", "factory", "default", "default", "1.0").into(),
        recorder_factory(&journal),
    );

    let config = ContainerConfig::from_components(vec![
        recorder_config("a", &[("options.timeout", "250")]),
        recorder_config("b", &[]),
    ]);
    let context = Context::from_trace_id("123");
    references.put_from_config(Some(&context), &config).unwrap();

    let a = references
        .get_one_required::<Recorder>(&Descriptor::new("*", "recorder", "*", "a", "*").into())
        .unwrap();
    assert_eq!(*a.timeout.lock(), 250);
    assert_eq!(
        *journal.lock(),
        vec!["configure:a".to_string(), "configure:b".to_string()]
    );
}

#[tokio::test]
async fn test_put_from_config_without_factory_fails_with_trace_id() {
    let references = ContainerReferences::new();
    let config = ContainerConfig::from_components(vec![recorder_config("a", &[])]);
    let context = Context::from_trace_id("abc");

    let error = references.put_from_config(Some(&context), &config).unwrap_err();
    assert_eq!(error.code(), "CANNOT_CREATE");
    assert_eq!(error.trace_id(), Some("abc"));
    assert!(references.get_all().is_empty());
}

#[tokio::test]
async fn test_run_helpers_respect_order() {
    let journal: Journal = Arc::default();
    let references: Arc<dyn References> = Arc::new(ContainerReferences::new());
    let a: Arc<dyn Component> = Arc::new(Recorder::new("a", &journal));
    let b: Arc<dyn Component> = Arc::new(Recorder::new("b", &journal));
    references.put(Descriptor::new("test", "recorder", "default", "a", "1.0").into(), Arc::clone(&a));
    references.put(Descriptor::new("test", "recorder", "default", "b", "1.0").into(), Arc::clone(&b));

    let components = references.get_all();
    Referencer::set_references(&references, &components).unwrap();
    let b = di_abstractions::downcast_component::<Recorder>(&b).unwrap();
    assert_eq!(*b.peers.lock(), 2);
    Opener::open(None, &components).await.unwrap();
    assert!(Opener::is_open(&components));

    let mut reversed = components.clone();
    reversed.reverse();
    Closer::close(None, &reversed).await.unwrap();
    assert!(!Opener::is_open(&components));

    assert_eq!(
        *journal.lock(),
        vec![
            "reference:a",
            "reference:b",
            "open:a",
            "open:b",
            "close:b",
            "close:a"
        ]
    );
}

#[tokio::test]
async fn test_opener_stops_at_first_failure() {
    let journal: Journal = Arc::default();
    let a = Recorder::new("a", &journal);
    let b = Recorder::new("b", &journal);
    let c = Recorder::new("c", &journal);
    b.fail_open.store(true, Ordering::SeqCst);

    let components: Vec<Arc<dyn Component>> = vec![Arc::new(a), Arc::new(b), Arc::new(c)];
    let error = Opener::open(Some(&Context::from_trace_id("t1")), &components)
        .await
        .unwrap_err();

    assert_eq!(error.code(), "INTERNAL");
    assert_eq!(error.trace_id(), Some("t1"));
    assert_eq!(*journal.lock(), vec!["open:a".to_string()]);
}

#[test]
fn test_dependency_resolver_from_config() {
    let journal: Journal = Arc::default();
    let references: Arc<dyn References> = Arc::new(ContainerReferences::new());
    references.put(
        Descriptor::new("test", "recorder", "memory", "primary", "1.0").into(),
        Arc::new(Recorder::new("primary", &journal)),
    );

    let resolver = DependencyResolver::with_references([(
        "persistence",
        Locator::from(Descriptor::new("test", "recorder", "file", "*", "1.0")),
    )]);
    resolver
        .configure(&ConfigParams::from_tuples([(
            "dependencies.persistence",
            "test:recorder:memory:*:1.0",
        )]))
        .unwrap();

    // 尚未设置引用时无法解析
    assert!(resolver.get_one_required::<Recorder>("persistence").is_err());

    resolver.set_references(&references).unwrap();

    let persistence = resolver.get_one_required::<Recorder>("persistence").unwrap();
    assert_eq!(persistence.name, "primary");
    assert_eq!(resolver.get_optional("persistence").len(), 1);

    let error = resolver.get_one_required::<Recorder>("unknown").unwrap_err();
    assert_eq!(error.code(), "REF_NOT_FOUND");
    assert!(resolver.get_one_optional::<Recorder>("unknown").is_none());
}

#[test]
fn test_dependency_resolver_named_locator() {
    let references: Arc<dyn References> = Arc::new(ContainerReferences::new());
    let journal: Journal = Arc::default();
    references.put(Locator::name("Controller"), Arc::new(Recorder::new("ctl", &journal)));

    let resolver = DependencyResolver::new();
    resolver
        .configure(&ConfigParams::from_tuples([("dependencies.controller", "Controller")]))
        .unwrap();
    resolver.set_references(&references).unwrap();

    assert_eq!(resolver.locate("controller").unwrap(), Locator::name("Controller"));
    assert_eq!(
        resolver.get_one_required::<Recorder>("controller").unwrap().name,
        "ctl"
    );
    assert!(resolver.find("controller", true).is_ok());
}

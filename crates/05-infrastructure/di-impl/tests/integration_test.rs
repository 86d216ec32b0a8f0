//! 引用表与工厂的集成测试

use async_trait::async_trait;
use di_abstractions::{Cleanable, Closable, Component, Factory, References, ReferencesExt};
use di_impl::{Cleaner, Closer, CompositeFactory, DefaultFactory, ReferencesImpl};
use infrastructure_commands::{Command, CommandSet, Commandable};
use infrastructure_common::{
    trace_id_of, Context, Descriptor, InfrastructureError, InvocationError, Locator,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// 测试组件
#[derive(Debug, Default)]
struct TestService {
    name: String,
}

impl Component for TestService {}

impl TestService {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct OtherService;

impl Component for OtherService {}

fn descriptor(group: &str, type_: &str, kind: &str, name: &str, version: &str) -> Locator {
    Descriptor::new(group, type_, kind, name, version).into()
}

#[test]
fn test_put_and_typed_lookup() {
    let references = ReferencesImpl::new();
    references.put(
        descriptor("grp", "service", "default", "a", "1.0"),
        Arc::new(TestService::new("a")),
    );
    references.put(
        descriptor("grp", "service", "default", "b", "1.0"),
        Arc::new(TestService::new("b")),
    );

    let all = references.get_all_of::<TestService>(&descriptor("grp", "service", "*", "*", "*"));
    let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    // 单个查询返回最近放入的匹配项
    let newest = references
        .get_one_required::<TestService>(&descriptor("*", "service", "*", "*", "*"))
        .unwrap();
    assert_eq!(newest.name, "b");
}

#[test]
fn test_typed_lookup_skips_other_types() {
    let references = ReferencesImpl::new();
    references.put(
        descriptor("grp", "service", "default", "a", "1.0"),
        Arc::new(TestService::new("a")),
    );
    references.put(
        descriptor("grp", "service", "other", "b", "1.0"),
        Arc::new(OtherService),
    );

    let pattern = descriptor("grp", "service", "*", "*", "*");
    let service = references.get_one_optional::<TestService>(&pattern).unwrap();
    assert_eq!(service.name, "a");
    assert_eq!(references.get_optional(&pattern).len(), 2);
}

#[test]
fn test_required_lookup_names_the_locator() {
    let references = ReferencesImpl::new();
    let error = references
        .get_one_required::<TestService>(&descriptor("grp", "missing", "*", "*", "1.0"))
        .unwrap_err();

    assert_eq!(error.code(), "REF_NOT_FOUND");
    assert_eq!(
        error.details().get("locator").map(String::as_str),
        Some("grp:missing:*:*:1.0")
    );
    assert!(references
        .find(&descriptor("grp", "missing", "*", "*", "1.0"), true)
        .is_err());
}

#[test]
fn test_remove_and_clear() {
    let references = ReferencesImpl::new();
    let locator = descriptor("grp", "service", "default", "a", "1.0");
    references.put(locator.clone(), Arc::new(TestService::new("first")));
    references.put(locator.clone(), Arc::new(TestService::new("second")));
    references.put(Locator::name("named"), Arc::new(OtherService));

    let removed = references.remove(&locator).unwrap();
    assert_eq!(
        di_abstractions::downcast_component::<TestService>(&removed)
            .unwrap()
            .name,
        "second"
    );
    assert_eq!(references.len(), 2);

    assert_eq!(references.remove_all(&locator).len(), 1);
    assert_eq!(references.get_all_locators(), vec![Locator::name("named")]);

    references.clear();
    assert!(references.is_empty());
}

#[test]
fn test_default_factory_prefers_most_specific_registration() {
    let factory = DefaultFactory::new();
    factory.register(descriptor("grp", "service", "*", "*", "1.0"), |_| {
        let component: Arc<dyn Component> = Arc::new(TestService::new("generic"));
        Ok(component)
    });
    factory.register(descriptor("grp", "service", "memory", "*", "1.0"), |_| {
        let component: Arc<dyn Component> = Arc::new(TestService::new("memory"));
        Ok(component)
    });

    let request = descriptor("grp", "service", "memory", "main", "1.0");
    assert_eq!(
        factory.can_create(&request),
        Some(descriptor("grp", "service", "memory", "*", "1.0"))
    );

    let created = factory.create(&request).unwrap();
    let service = di_abstractions::downcast_component::<TestService>(&created).unwrap();
    assert_eq!(service.name, "memory");
}

#[test]
fn test_default_factory_errors() {
    let factory = DefaultFactory::new();
    factory.register(descriptor("grp", "broken", "*", "*", "1.0"), |_| {
        Err("constructor failed".into())
    });

    let unknown = descriptor("grp", "unknown", "default", "default", "1.0");
    assert!(factory.can_create(&unknown).is_none());
    let error = factory.create(&unknown).err().unwrap();
    assert_eq!(error.code(), "CANNOT_CREATE");

    let broken = descriptor("grp", "broken", "default", "default", "1.0");
    let error = factory.create(&broken).err().unwrap();
    assert_eq!(error.code(), "CANNOT_CREATE");
    assert_eq!(
        std::error::Error::source(&error).map(|e| e.to_string()),
        Some("constructor failed".to_string())
    );
}

#[test]
fn test_composite_factory_last_registered_wins() {
    let production = Arc::new(DefaultFactory::new());
    production.register(descriptor("grp", "service", "default", "*", "1.0"), |_| {
        let component: Arc<dyn Component> = Arc::new(TestService::new("production"));
        Ok(component)
    });

    let mock = Arc::new(DefaultFactory::new());
    mock.register(descriptor("grp", "service", "*", "*", "*"), |_| {
        let component: Arc<dyn Component> = Arc::new(TestService::new("mock"));
        Ok(component)
    });

    let composite = CompositeFactory::new();
    composite.add(production.clone());
    composite.add(mock.clone());

    let request = descriptor("grp", "service", "default", "main", "1.0");
    let created = composite.create(&request).unwrap();
    let service = di_abstractions::downcast_component::<TestService>(&created).unwrap();
    assert_eq!(service.name, "mock");

    let mock: Arc<dyn Factory> = mock;
    composite.remove(&mock);
    assert_eq!(composite.len(), 1);

    let created = composite.create(&request).unwrap();
    let service = di_abstractions::downcast_component::<TestService>(&created).unwrap();
    assert_eq!(service.name, "production");
}

#[test]
fn test_register_as_type() {
    let factory = DefaultFactory::new();
    factory.register_as_type::<OtherService>(Locator::name("OtherService"));

    let created = factory.create(&Locator::name("OtherService")).unwrap();
    assert!(di_abstractions::downcast_component::<OtherService>(&created).is_some());
    assert!(factory.create(&Locator::name("Missing")).is_err());
}

/// 关闭时可能失败的组件
struct Resource {
    name: &'static str,
    fail_close: bool,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Closable for Resource {
    async fn close(&self, context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.events.lock().push(format!("close:{}", self.name));
        if self.fail_close {
            return Err(InfrastructureError::internal(
                trace_id_of(context),
                format!("{} failed to close", self.name),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Cleanable for Resource {
    async fn clear(&self, _context: Option<&Context>) -> Result<(), InfrastructureError> {
        self.events.lock().push(format!("clear:{}", self.name));
        Ok(())
    }
}

impl Component for Resource {
    fn as_closable(&self) -> Option<&dyn Closable> {
        Some(self)
    }

    fn as_cleanable(&self) -> Option<&dyn Cleanable> {
        Some(self)
    }
}

#[tokio::test]
async fn test_closer_is_best_effort_and_returns_first_error() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let resource = |name, fail_close| -> Arc<dyn Component> {
        Arc::new(Resource {
            name,
            fail_close,
            events: Arc::clone(&events),
        })
    };
    let components = vec![
        resource("c", false),
        resource("b", true),
        resource("a", true),
        Arc::new(OtherService) as Arc<dyn Component>,
    ];

    let context = Context::from_trace_id("close-1");
    let error = Closer::close(Some(&context), &components)
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "内部错误: b failed to close");
    assert_eq!(error.trace_id(), Some("close-1"));
    assert_eq!(*events.lock(), vec!["close:c", "close:b", "close:a"]);

    events.lock().clear();
    Cleaner::clear(None, &components).await.unwrap();
    assert_eq!(*events.lock(), vec!["clear:c", "clear:b", "clear:a"]);
}

/// 回显参数的命令
struct Echo;

#[async_trait]
impl Command for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(
        &self,
        _context: Option<&Context>,
        args: &Value,
    ) -> Result<Value, InvocationError> {
        Ok(args.clone())
    }
}

/// 对外暴露命令集的组件
struct EchoController {
    commands: CommandSet,
}

impl Commandable for EchoController {
    fn get_command_set(&self) -> &CommandSet {
        &self.commands
    }
}

impl Component for EchoController {
    fn as_commandable(&self) -> Option<&dyn Commandable> {
        Some(self)
    }
}

#[tokio::test]
async fn test_commandables_are_discovered_without_concrete_types() {
    let mut commands = CommandSet::new();
    commands.add_command(Arc::new(Echo));

    let references = ReferencesImpl::new();
    references.put(
        descriptor("grp", "service", "default", "a", "1.0"),
        Arc::new(TestService::new("a")),
    );
    references.put(
        descriptor("grp", "controller", "default", "echo", "1.0"),
        Arc::new(EchoController { commands }),
    );

    let all = references.get_all();
    let commandables: Vec<&dyn Commandable> = all
        .iter()
        .filter_map(|component| component.as_commandable())
        .collect();
    assert_eq!(commandables.len(), 1);

    let result = commandables[0]
        .get_command_set()
        .execute(None, "echo", &json!({ "ping": 1 }))
        .await
        .unwrap();
    assert_eq!(result, json!({ "ping": 1 }));
}

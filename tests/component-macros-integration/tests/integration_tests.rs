//! 组件宏集成测试

use di_abstractions::{
    CandidateType, ComponentResolver, ContainerBuilder, ContractKey, DiContainer, Inject,
    Injectable, PropertyInjector,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn log(&self, message: &str) -> String;
}

trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

trait Sink: Send + Sync {}

#[derive(Injectable)]
#[injectable(provides(dyn Logger, dyn Sink))]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) -> String {
        format!("[console] {message}")
    }
}

impl Sink for ConsoleLogger {}

#[derive(Injectable)]
#[injectable(provides(dyn Cache))]
struct MemoryCache;

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        Some(format!("cached:{key}"))
    }
}

#[derive(Injectable)]
struct Reporter {
    logger: Arc<dyn Logger>,
    #[value]
    retries: u8,
    #[inject]
    cache: Inject<dyn Cache>,
    #[skip]
    sent: AtomicUsize,
}

impl Reporter {
    fn report(&self, key: &str) -> String {
        self.sent.fetch_add(1, Ordering::SeqCst);
        let value = self
            .cache
            .get()
            .and_then(|cache| cache.get(key))
            .unwrap_or_default();
        self.logger.log(&value)
    }
}

#[derive(Injectable, Default)]
#[injectable(unmarked, no_constructor)]
struct Dashboard {
    #[inject]
    logger: Inject<dyn Logger>,
    #[inject]
    database: Inject<dyn Database>,
}

trait Database: Send + Sync {}

#[derive(Injectable)]
#[injectable(unmarked)]
struct Unused {
    _logger: Arc<dyn Logger>,
}

#[test]
fn test_derived_description() {
    assert!(Reporter::marked());
    assert!(Reporter::contracts().is_empty());

    let constructor = Reporter::constructor().unwrap();
    assert_eq!(
        constructor.parameters(),
        &[ContractKey::of::<dyn Logger>(), ContractKey::of::<u8>()]
    );

    let properties = Reporter::properties();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name(), "cache");
    assert_eq!(properties[0].contract(), ContractKey::of::<dyn Cache>());
}

#[test]
fn test_provides_lists_contracts_in_order() {
    let contracts = ConsoleLogger::contracts();
    assert_eq!(contracts.len(), 2);
    assert_eq!(contracts[0].contract, ContractKey::of::<dyn Logger>());
    assert_eq!(contracts[1].contract, ContractKey::of::<dyn Sink>());
    assert_eq!(
        CandidateType::of::<ConsoleLogger>().primary_binding().contract,
        ContractKey::of::<dyn Logger>()
    );
}

#[test]
fn test_unmarked_flags() {
    assert!(!Dashboard::marked());
    assert!(Dashboard::constructor().is_none());
    assert!(CandidateType::of::<Dashboard>().is_injectable());
    assert!(!CandidateType::of::<Unused>().is_injectable());
}

#[test]
fn test_scanned_reporter_is_fully_wired() {
    let container = DiContainerBuilder::new()
        .add_injectable::<ConsoleLogger>()
        .add_injectable::<MemoryCache>()
        .add_injectable::<Reporter>()
        .add_injectable::<Unused>()
        .build()
        .unwrap();

    assert!(!container.is_registered::<Unused>());
    assert!(!container.is_registered::<dyn Sink>());

    let reporter = container.resolve::<Reporter>().unwrap();
    assert_eq!(reporter.retries, 0);
    assert!(reporter.cache.is_wired());
    assert_eq!(reporter.report("k"), "[console] cached:k");

    let again = container.resolve::<Reporter>().unwrap();
    assert!(Arc::ptr_eq(&reporter, &again));
    assert_eq!(again.sent.load(Ordering::SeqCst), 1);
}

#[test]
fn test_inject_into_caller_built_object() {
    let container = DiContainerImpl::new();
    container.register::<dyn Logger, ConsoleLogger>();

    let mut dashboard = Dashboard::default();
    let report = container.inject_into(&mut dashboard);

    assert_eq!(report.wired, vec!["logger"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "database");
    assert!(dashboard.logger.is_wired());
    assert!(!dashboard.database.is_wired());
}

//! Centralized integration tests for di-impl crate

use anyhow::Result;
use di_abstractions::{
    Arguments, ComponentResolver, Constructor, ContainerBuilder, ContainerConfig, ContractBinding,
    ContractKey, DiContainer, Implements, Inject, Injectable, PropertyInjector, PropertySlot,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use di_impl_integration_tests::init_test_logging;
use infrastructure_common::{ComponentError, DependencyError};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

trait Logger: Send + Sync {
    fn name(&self) -> &'static str;
}

trait Cache: Send + Sync {
    fn capacity(&self) -> usize;
}

trait Database: Send + Sync {}

#[derive(Injectable)]
#[injectable(provides(dyn Logger))]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn name(&self) -> &'static str {
        "console"
    }
}

#[derive(Injectable)]
#[injectable(provides(dyn Cache))]
struct MemoryCache;

impl Cache for MemoryCache {
    fn capacity(&self) -> usize {
        128
    }
}

#[derive(Injectable)]
struct Reporter {
    logger: Arc<dyn Logger>,
    #[inject]
    cache: Inject<dyn Cache>,
}

fn reporter_container() -> DiContainerImpl {
    let container = DiContainerImpl::new();
    container.register::<dyn Logger, ConsoleLogger>();
    container.register::<dyn Cache, MemoryCache>();
    container.register::<Reporter, Reporter>();
    container
}

#[test]
fn test_reporter_scenario() -> Result<()> {
    init_test_logging();
    let container = reporter_container();

    let reporter = container.resolve::<Reporter>()?;
    assert_eq!(reporter.logger.name(), "console");
    assert_eq!(reporter.cache.get().map(Cache::capacity), Some(128));

    let again = container.resolve::<Reporter>()?;
    assert!(Arc::ptr_eq(&reporter, &again));

    let stats = container.stats();
    assert_eq!(stats.constructions, 3);
    assert_eq!(stats.cached_singletons, 3);
    assert!(stats.cache_hits >= 1);
    Ok(())
}

#[test]
fn test_singleton_per_contract() -> Result<()> {
    let container = reporter_container();
    let first = container.resolve::<dyn Logger>()?;
    let second = container.resolve::<dyn Logger>()?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_unregistered_contract_names_the_contract() {
    init_test_logging();
    let container = reporter_container();

    let err = container.resolve::<dyn Database>().err().unwrap();
    assert!(matches!(err, DependencyError::ComponentNotRegistered { .. }));
    assert!(err.to_string().contains("Database"));
    assert_eq!(container.stats().resolution_errors, 1);
}

#[test]
fn test_registered_instance_is_returned_without_construction() -> Result<()> {
    let container = DiContainerImpl::new();
    let pinned: Arc<dyn Cache> = Arc::new(MemoryCache);
    container.register::<dyn Cache, MemoryCache>();
    container.register_instance(pinned.clone());

    let resolved = container.resolve::<dyn Cache>()?;
    assert!(Arc::ptr_eq(&resolved, &pinned));
    assert_eq!(container.stats().constructions, 0);
    Ok(())
}

#[test]
fn test_register_instance_replaces_cached_singleton() -> Result<()> {
    let container = reporter_container();
    let built = container.resolve::<dyn Cache>()?;

    let pinned: Arc<dyn Cache> = Arc::new(MemoryCache);
    container.register_instance(pinned.clone());

    let resolved = container.resolve::<dyn Cache>()?;
    assert!(Arc::ptr_eq(&resolved, &pinned));
    assert!(!Arc::ptr_eq(&resolved, &built));
    Ok(())
}

#[test]
fn test_factory_runs_once_and_is_cached() -> Result<()> {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let container = DiContainerImpl::new();
    container.register_factory::<dyn Cache, _>(|| {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryCache) as Arc<dyn Cache>)
    });

    let first = container.resolve::<dyn Cache>()?;
    let second = container.resolve::<dyn Cache>()?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_factory_error_propagates() {
    let container = DiContainerImpl::new();
    container.register_factory::<dyn Database, _>(|| {
        Err(DependencyError::creation_failed("dyn Database", "connection refused"))
    });

    let err = container.resolve::<dyn Database>().err().unwrap();
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(container.stats().cached_singletons, 0);
}

#[test]
fn test_plain_values_are_never_cached() -> Result<()> {
    static NEXT: AtomicUsize = AtomicUsize::new(10);

    let container = DiContainerImpl::new();
    assert_eq!(container.resolve_value::<u32>()?, 0);
    assert_eq!(container.resolve_value::<String>()?, "");

    container.register_value_factory(|| NEXT.fetch_add(1, Ordering::SeqCst));
    assert_eq!(container.resolve_value::<usize>()?, 10);
    assert_eq!(container.resolve_value::<usize>()?, 11);
    assert_eq!(container.stats().cached_singletons, 0);
    Ok(())
}

#[derive(Injectable)]
struct Poller {
    interval: Arc<u32>,
}

#[test]
fn test_value_factory_is_not_cached_when_requested_as_service() -> Result<()> {
    static NEXT: AtomicU32 = AtomicU32::new(100);

    let container = DiContainerImpl::new();
    container.register_value_factory(|| NEXT.fetch_add(1, Ordering::SeqCst));
    container.register::<Poller, Poller>();

    let first = container.resolve::<u32>()?;
    let second = container.resolve::<u32>()?;
    assert_eq!((*first, *second), (100, 101));

    let poller = container.resolve::<Poller>()?;
    assert_eq!(*poller.interval, 102);
    assert_eq!(container.resolve_value::<u32>()?, 103);

    assert_eq!(container.stats().cached_singletons, 1);
    Ok(())
}

static BUILD_ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn record(step: &'static str) {
    if let Ok(mut order) = BUILD_ORDER.lock() {
        order.push(step);
    }
}

struct Store;

impl Injectable for Store {
    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(Vec::new(), |_| {
            record("store");
            Ok(Self)
        }))
    }
}

struct Audit;

impl Injectable for Audit {
    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(Vec::new(), |_| {
            record("audit");
            Ok(Self)
        }))
    }
}

struct Ledger;

impl Injectable for Ledger {
    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(Vec::new(), |_| {
            record("ledger");
            Ok(Self)
        }))
    }
}

struct Accounting {
    store: Arc<Store>,
    audit: Arc<Audit>,
    ledger: Inject<Ledger>,
}

impl Injectable for Accounting {
    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(
            vec![ContractKey::of::<Store>(), ContractKey::of::<Audit>()],
            |arguments: &mut Arguments| {
                let store = arguments.next::<Store>()?;
                let audit = arguments.next::<Audit>()?;
                record("accounting");
                Ok(Self {
                    store,
                    audit,
                    ledger: Inject::empty(),
                })
            },
        ))
    }

    fn properties() -> Vec<PropertySlot<Self>> {
        vec![PropertySlot::new("ledger", |a| &mut a.ledger)]
    }
}

#[test]
fn test_dependencies_built_before_parent_and_properties_after() -> Result<()> {
    let container = DiContainerImpl::new();
    container.register::<Store, Store>();
    container.register::<Audit, Audit>();
    container.register::<Ledger, Ledger>();
    container.register::<Accounting, Accounting>();

    let accounting = container.resolve::<Accounting>()?;
    assert!(Arc::ptr_eq(&accounting.store, &container.resolve::<Store>()?));
    assert!(Arc::ptr_eq(&accounting.audit, &container.resolve::<Audit>()?));
    assert!(accounting.ledger.is_wired());

    let order = BUILD_ORDER.lock().map(|o| o.clone()).unwrap_or_default();
    assert_eq!(order, vec!["store", "audit", "accounting", "ledger"]);
    Ok(())
}

#[test]
fn test_unresolvable_property_is_skipped() -> Result<()> {
    init_test_logging();
    let container = DiContainerImpl::new();
    container.register::<dyn Logger, ConsoleLogger>();
    container.register::<Reporter, Reporter>();

    let reporter = container.resolve::<Reporter>()?;
    assert_eq!(reporter.logger.name(), "console");
    assert!(!reporter.cache.is_wired());

    let stats = container.stats();
    assert_eq!(stats.skipped_injections, 1);
    assert_eq!(stats.resolution_errors, 0);
    Ok(())
}

#[derive(Injectable, Default)]
#[injectable(unmarked, no_constructor)]
struct Page {
    #[inject]
    logger: Inject<dyn Logger>,
    #[inject]
    database: Inject<dyn Database>,
}

#[test]
fn test_skipped_property_on_caller_built_object_is_not_a_resolution_error() {
    init_test_logging();
    let container = DiContainerImpl::new();
    container.register::<dyn Logger, ConsoleLogger>();

    let mut page = Page::default();
    let report = container.inject_into(&mut page);

    assert_eq!(report.wired, vec!["logger"]);
    assert_eq!(report.skipped.len(), 1);
    assert!(!page.database.is_wired());

    let stats = container.stats();
    assert_eq!(stats.skipped_injections, 1);
    assert_eq!(stats.resolution_errors, 0);
}

#[test]
fn test_unresolvable_constructor_parameter_fails() {
    let container = DiContainerImpl::new();
    container.register::<dyn Cache, MemoryCache>();
    container.register::<Reporter, Reporter>();

    let err = container.resolve::<Reporter>().err().unwrap();
    assert!(matches!(err, DependencyError::ComponentNotRegistered { ref type_name } if type_name.contains("Logger")));
    assert!(!container.can_resolve(&ContractKey::of::<dyn Logger>()));
    assert_eq!(container.stats().cached_singletons, 0);
}

#[derive(Injectable)]
#[injectable(no_constructor)]
struct Handle {
    #[inject]
    logger: Inject<dyn Logger>,
}

#[test]
fn test_missing_constructor_fails_at_resolution() {
    let container = DiContainerBuilder::new()
        .add_injectable::<ConsoleLogger>()
        .add_injectable::<Handle>()
        .build()
        .unwrap();

    assert!(container.is_registered::<Handle>());
    let err = container.resolve::<Handle>().err().unwrap();
    assert!(matches!(err, DependencyError::NoSuitableConstructor { .. }));
}

#[derive(Injectable)]
struct CycleA {
    _b: Arc<CycleB>,
}

#[derive(Injectable)]
struct CycleB {
    _a: Arc<CycleA>,
}

#[test]
fn test_cycle_is_detected_at_build() {
    let result = DiContainerBuilder::new()
        .add_injectable::<CycleA>()
        .add_injectable::<CycleB>()
        .build();
    assert!(matches!(result, Err(ComponentError::CircularDependency { .. })));
}

#[test]
fn test_cycle_fails_fast_at_resolution() {
    let container = DiContainerBuilder::new()
        .add_injectable::<CycleA>()
        .add_injectable::<CycleB>()
        .with_config(ContainerConfig {
            validate_on_build: false,
            ..ContainerConfig::default()
        })
        .build()
        .unwrap();

    match container.resolve::<CycleA>() {
        Err(DependencyError::CircularDependency { dependency_chain }) => {
            assert_eq!(dependency_chain, "CycleA -> CycleB -> CycleA");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("cycle resolved"),
    }
}

#[test]
fn test_depth_limit_without_cycle_detection() {
    let container = DiContainerBuilder::new()
        .add_injectable::<CycleA>()
        .add_injectable::<CycleB>()
        .with_config(ContainerConfig {
            enable_circular_dependency_detection: false,
            max_resolution_depth: 8,
            validate_on_build: false,
            ..ContainerConfig::default()
        })
        .build()
        .unwrap();

    let err = container.resolve::<CycleB>().err().unwrap();
    assert!(matches!(err, DependencyError::MaxDepthExceeded { depth: 8, .. }));
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

struct InstanceId(usize);

impl Default for InstanceId {
    fn default() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }
}

trait Metrics: Send + Sync {
    fn id(&self) -> usize;
}

trait Tracer: Send + Sync {
    fn id(&self) -> usize;
}

#[derive(Injectable)]
#[injectable(provides(dyn Metrics, dyn Tracer))]
struct Telemetry {
    #[skip]
    id: InstanceId,
}

impl Metrics for Telemetry {
    fn id(&self) -> usize {
        self.id.0
    }
}

impl Tracer for Telemetry {
    fn id(&self) -> usize {
        self.id.0
    }
}

#[test]
fn test_same_type_through_two_contracts_is_built_twice() -> Result<()> {
    let container = DiContainerImpl::new();
    container.register::<dyn Metrics, Telemetry>();
    container.register::<dyn Tracer, Telemetry>();

    let metrics = container.resolve::<dyn Metrics>()?;
    let tracer = container.resolve::<dyn Tracer>()?;
    assert_ne!(metrics.id(), tracer.id());
    assert_eq!(container.resolve::<dyn Metrics>()?.id(), metrics.id());
    Ok(())
}

#[test]
fn test_resolve_by_name() -> Result<()> {
    let container = reporter_container();
    let instance = container.resolve_by_name("Logger")?;
    let logger = di_abstractions::downcast::<dyn Logger>(&instance, &ContractKey::of::<dyn Logger>())?;
    assert_eq!(logger.name(), "console");
    Ok(())
}

#[test]
fn test_registered_components_metadata() {
    let container = reporter_container();
    let mut names: Vec<String> = container
        .get_registered_components()
        .into_iter()
        .map(|m| m.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Reporter", "dyn Cache", "dyn Logger"]);
}

struct SlowService {
    id: usize,
}

static SLOW_BUILDS: AtomicUsize = AtomicUsize::new(0);

impl Injectable for SlowService {
    fn constructor() -> Option<Constructor<Self>> {
        Some(Constructor::new(Vec::new(), |_| {
            let id = SLOW_BUILDS.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(Self { id })
        }))
    }
}

trait Slow: Send + Sync {
    fn id(&self) -> usize;
}

impl Slow for SlowService {
    fn id(&self) -> usize {
        self.id
    }
}

impl Implements<dyn Slow> for SlowService {
    fn upcast(self: Arc<Self>) -> Arc<dyn Slow> {
        self
    }
}

#[test]
fn test_concurrent_first_resolution_yields_one_instance() {
    let container = Arc::new(DiContainerImpl::new());
    container.register_type(
        ContractKey::of::<SlowService>(),
        di_abstractions::TypeMapping::of::<SlowService, SlowService>(),
    );

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                container.resolve::<SlowService>()
            })
        })
        .collect();

    let resolved: Vec<Arc<SlowService>> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    let first = &resolved[0];
    assert!(resolved.iter().all(|r| Arc::ptr_eq(r, first)));
    assert!(Arc::ptr_eq(first, &container.resolve::<SlowService>().unwrap()));
    assert_eq!(container.stats().cached_singletons, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_from_tasks() -> Result<()> {
    let container = Arc::new(DiContainerImpl::new());
    container.register::<dyn Slow, SlowService>();
    container.register::<dyn Logger, ConsoleLogger>();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let container = Arc::clone(&container);
            tokio::task::spawn_blocking(move || {
                let slow = container.resolve::<dyn Slow>()?;
                let logger = container.resolve::<dyn Logger>()?;
                Ok::<_, DependencyError>((slow, logger))
            })
        })
        .collect();

    let mut ids = Vec::new();
    let mut loggers = Vec::new();
    for task in tasks {
        let (slow, logger) = task.await??;
        ids.push(slow.id());
        loggers.push(logger);
    }

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert!(loggers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    Ok(())
}

#[test]
fn test_contract_binding_registration_by_key() -> Result<()> {
    let binding = ContractBinding::of::<dyn Logger, ConsoleLogger>();
    let container = DiContainerImpl::new();
    container.register_type(
        binding.contract,
        di_abstractions::TypeMapping::from_parts(
            di_abstractions::ImplementationType::of::<ConsoleLogger>(),
            binding,
        ),
    );
    assert_eq!(container.resolve::<dyn Logger>()?.name(), "console");
    Ok(())
}

//! 依赖注入容器实现

use crate::registry::InMemoryComponentRegistry;
use chrono::{DateTime, Utc};
use di_abstractions::{
    erase, CircularDependencyDetector, ComponentRegistry, ComponentResolver, ContainerConfig,
    ContainerStats, ContractKey, DefaultCircularDependencyDetector, DiContainer, Factory, Instance,
    RegistrationEntry, TypeMapping,
};
use infrastructure_common::{ComponentError, ComponentMetadata, DependencyError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 已缓存的单例
#[derive(Debug, Clone)]
pub(crate) struct CachedInstance {
    pub(crate) instance: Instance,
    pub(crate) created_at: DateTime<Utc>,
}

impl CachedInstance {
    fn new(instance: Instance) -> Self {
        Self {
            instance,
            created_at: Utc::now(),
        }
    }
}

/// 锁保护的容器状态
#[derive(Debug, Default)]
pub(crate) struct ContainerState {
    pub(crate) registry: InMemoryComponentRegistry,
    pub(crate) instances: HashMap<ContractKey, CachedInstance>,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) resolutions: AtomicU64,
    pub(crate) cache_hits: AtomicU64,
    pub(crate) constructions: AtomicU64,
    pub(crate) resolution_errors: AtomicU64,
    pub(crate) skipped_injections: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// 具体的依赖注入容器实现
///
/// 注册表和单例缓存由同一把锁保护。锁只在检查缓存、读取注册项和发布实例时持有，
/// 实例的构造（包括递归解析和属性注入）在锁外进行。
/// 两个线程同时首次解析同一个契约时可能各自构造一次，先发布的实例被保留并返回给所有调用方。
pub struct DiContainerImpl {
    id: Uuid,
    config: ContainerConfig,
    pub(crate) state: Mutex<ContainerState>,
    pub(crate) counters: StatsCounters,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self::from_registry(InMemoryComponentRegistry::new(), config)
    }

    /// 用已填充的注册表创建容器
    pub fn from_registry(registry: InMemoryComponentRegistry, config: ContainerConfig) -> Self {
        let id = Uuid::new_v4();
        info!(container = %id, "创建依赖注入容器, 已注册 {} 个组件", registry.len());

        let mut instances = HashMap::new();
        for key in registry.keys() {
            if let Some(RegistrationEntry::Instance(instance)) = registry.lookup(&key) {
                instances.insert(key, CachedInstance::new(instance.clone()));
            }
        }

        Self {
            id,
            config,
            state: Mutex::new(ContainerState {
                registry,
                instances,
            }),
            counters: StatsCounters::default(),
        }
    }

    /// 容器ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 输出调试日志，仅在调试模式下生效
    pub fn debug_log(&self, message: impl fmt::Display) {
        if self.config.debug_mode {
            debug!(container = %self.id, "{}", message);
        }
    }

    /// 单例的创建时间，未缓存时返回 `None`
    pub fn cached_at(&self, key: &ContractKey) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .instances
            .get(key)
            .map(|cached| cached.created_at)
    }

    /// 把实例发布到缓存，已有实例时返回已有的
    pub(crate) fn publish(&self, key: &ContractKey, instance: Instance) -> Instance {
        let mut state = self.state.lock();
        if let Some(existing) = state.instances.get(key) {
            debug!(container = %self.id, "并发构建的实例已被丢弃: {}", key);
            return existing.instance.clone();
        }
        state
            .instances
            .insert(*key, CachedInstance::new(instance.clone()));
        instance
    }

    fn insert_entry(&self, key: ContractKey, entry: RegistrationEntry) {
        info!(container = %self.id, "注册组件: {} ({})", key, entry.kind());
        let mut state = self.state.lock();
        match entry {
            RegistrationEntry::Type(mapping) => state.registry.register(key, mapping),
            RegistrationEntry::Factory(factory) => state.registry.register_factory(key, factory),
            RegistrationEntry::Instance(instance) => {
                state
                    .instances
                    .insert(key, CachedInstance::new(instance.clone()));
                state.registry.register_instance(key, instance)
            }
        };
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DiContainer for DiContainerImpl {
    fn register_type(&self, key: ContractKey, mapping: TypeMapping) {
        self.insert_entry(key, RegistrationEntry::Type(mapping));
    }

    fn register_factory<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        let factory = Factory::new(factory);
        self.insert_entry(factory.produces(), RegistrationEntry::Factory(factory));
    }

    fn register_value_factory<T, F>(&self, factory: F)
    where
        T: Default + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory = Factory::value(factory);
        self.insert_entry(factory.produces(), RegistrationEntry::Factory(factory));
    }

    fn register_instance<T>(&self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert_entry(
            ContractKey::of::<T>(),
            RegistrationEntry::Instance(erase(instance)),
        );
    }

    fn resolve_by_name(&self, name: &str) -> Result<Instance, DependencyError> {
        if name.trim().is_empty() {
            return Err(DependencyError::null_argument("name"));
        }

        let key = self
            .state
            .lock()
            .registry
            .find_by_name(name)
            .ok_or_else(|| DependencyError::not_registered(name))?;

        self.resolve_root(&key)
    }

    fn get_registered_components(&self) -> Vec<ComponentMetadata> {
        self.state.lock().registry.get_registered_components()
    }

    fn validate(&self) -> Result<(), Vec<ComponentError>> {
        info!(container = %self.id, "验证容器状态");
        let detector = DefaultCircularDependencyDetector;
        let state = self.state.lock();
        let graph = detector.build_dependency_graph(&state.registry);
        let mut errors = Vec::new();

        for node in &graph {
            if let Some(RegistrationEntry::Type(mapping)) = state.registry.lookup(&node.key) {
                if mapping.implementation.constructor.is_none() {
                    warn!("{} 没有可用的构造函数, 解析时将失败", mapping.implementation.name());
                }
            }
            for dependency in &node.dependencies {
                if !dependency.is_plain_value() && !state.registry.is_registered(dependency) {
                    errors.push(ComponentError::MissingDependency {
                        type_name: node.name.clone(),
                        dependency: dependency.type_info().name,
                    });
                }
            }
        }

        if self.config.enable_circular_dependency_detection {
            if let Err(err) = detector.detect_circular_dependencies(&graph) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            for err in &errors {
                warn!(container = %self.id, "容器验证失败: {}", err);
            }
            Err(errors)
        }
    }

    fn stats(&self) -> ContainerStats {
        let (registered_components, cached_singletons) = {
            let state = self.state.lock();
            (state.registry.len(), state.instances.len())
        };
        ContainerStats {
            registered_components,
            cached_singletons,
            resolutions: self.counters.resolutions.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            constructions: self.counters.constructions.load(Ordering::Relaxed),
            resolution_errors: self.counters.resolution_errors.load(Ordering::Relaxed),
            skipped_injections: self.counters.skipped_injections.load(Ordering::Relaxed),
        }
    }
}

//! 容器构建器实现

use crate::container::DiContainerImpl;
use crate::registry::InMemoryComponentRegistry;
use crate::scanner::DefaultComponentScanner;
use di_abstractions::{
    erase, CandidateType, ComponentRegistry, ComponentScanner, ContainerBuilder, ContainerConfig,
    ContractKey, DiContainer, Factory, Implements, Injectable, RegistrationEntry, TypeMapping,
};
use infrastructure_common::{ComponentError, DependencyError};
use std::sync::Arc;
use tracing::{info, warn};

/// 容器构建器实现
///
/// 扫描在 `build` 时执行一次，手动注册在扫描之后写入，因此会覆盖扫描结果。
pub struct DiContainerBuilder {
    candidates: Vec<CandidateType>,
    registrations: Vec<(ContractKey, RegistrationEntry)>,
    scanner: Box<dyn ComponentScanner>,
    config: ContainerConfig,
}

impl DiContainerBuilder {
    /// 创建构建器，默认使用 [`DefaultComponentScanner`]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            registrations: Vec::new(),
            scanner: Box::new(DefaultComponentScanner::new()),
            config: ContainerConfig::default(),
        }
    }

    /// 添加可注入类型作为候选
    pub fn add_injectable<I: Injectable>(self) -> Self {
        self.add_candidate(CandidateType::of::<I>())
    }

    /// 注册契约 `C` 由 `I` 实现
    pub fn register<C, I>(mut self) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<C>,
    {
        self.registrations.push((
            ContractKey::of::<C>(),
            RegistrationEntry::Type(TypeMapping::of::<C, I>()),
        ));
        self
    }

    /// 注册服务工厂
    pub fn register_factory<T, F>(mut self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        let factory = Factory::new(factory);
        self.registrations
            .push((factory.produces(), RegistrationEntry::Factory(factory)));
        self
    }

    /// 注册普通值工厂
    pub fn register_value_factory<T, F>(mut self, factory: F) -> Self
    where
        T: Default + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory = Factory::value(factory);
        self.registrations
            .push((factory.produces(), RegistrationEntry::Factory(factory)));
        self
    }

    /// 注册实例
    pub fn register_instance<T>(mut self, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registrations.push((
            ContractKey::of::<T>(),
            RegistrationEntry::Instance(erase(instance)),
        ));
        self
    }
}

impl Default for DiContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = DiContainerImpl;

    fn build(self) -> Result<Self::Container, ComponentError> {
        let mut registry = InMemoryComponentRegistry::new();

        let report = self.scanner.scan(&self.candidates, &mut registry)?;
        info!(
            "扫描器 {} 注册了 {} 个组件",
            self.scanner.name(),
            report.registered.len()
        );

        let registration_count = self.registrations.len();
        for (key, entry) in self.registrations {
            match entry {
                RegistrationEntry::Type(mapping) => registry.register(key, mapping),
                RegistrationEntry::Factory(factory) => registry.register_factory(key, factory),
                RegistrationEntry::Instance(instance) => registry.register_instance(key, instance),
            };
        }

        let container = DiContainerImpl::from_registry(registry, self.config);
        info!("构建容器完成，手动注册了 {} 个组件", registration_count);

        if container.config().validate_on_build {
            if let Err(mut errors) = container.validate() {
                for err in &errors {
                    warn!("容器验证失败: {}", err);
                }
                return Err(errors.remove(0));
            }
        }

        Ok(container)
    }

    fn add_candidate(mut self, candidate: CandidateType) -> Self {
        self.candidates.push(candidate);
        self
    }

    fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }
}

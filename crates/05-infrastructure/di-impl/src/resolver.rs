//! 依赖解析
//!
//! 解析顺序：
//! 1. 普通值：有工厂时调用工厂，否则返回零值，不缓存。
//!    注册为普通值工厂的契约无论以哪种契约键请求都按普通值处理
//! 2. 单例缓存命中直接返回
//! 3. 工厂、实例或类型映射，构造后按请求的契约键缓存

use crate::container::{DiContainerImpl, StatsCounters};
use di_abstractions::{
    Arguments, ComponentRegistry, ComponentResolver, ContractKey, Instance, PropertyInjector,
    RegistrationEntry, ResolveContext, TypeMapping,
};
use infrastructure_common::DependencyError;
use tracing::error;

impl ComponentResolver for DiContainerImpl {
    fn resolve_key(
        &self,
        key: &ContractKey,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        StatsCounters::bump(&self.counters.resolutions);
        self.resolve_internal(key, context)
    }

    fn resolve_root(&self, key: &ContractKey) -> Result<Instance, DependencyError> {
        let result = self.resolve_key(key, &mut self.new_context());
        if let Err(err) = &result {
            StatsCounters::bump(&self.counters.resolution_errors);
            error!(container = %self.id(), "解析失败: {}: {}", key, err);
        }
        result
    }

    fn can_resolve(&self, key: &ContractKey) -> bool {
        if key.is_plain_value() {
            return true;
        }
        let state = self.state.lock();
        state.instances.contains_key(key) || state.registry.is_registered(key)
    }

    fn new_context(&self) -> ResolveContext {
        ResolveContext::with_options(self.config().to_resolve_options())
    }
}

impl DiContainerImpl {
    fn resolve_internal(
        &self,
        key: &ContractKey,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        if key.is_plain_value() {
            return self.produce_value(key);
        }

        let entry = {
            let state = self.state.lock();
            let value_factory = match state.registry.lookup(key) {
                Some(RegistrationEntry::Factory(factory)) if factory.is_plain_value() => {
                    Some(factory.clone())
                }
                _ => None,
            };
            if let Some(factory) = value_factory {
                drop(state);
                return factory.create();
            }
            if let Some(cached) = state.instances.get(key) {
                StatsCounters::bump(&self.counters.cache_hits);
                self.debug_log(format_args!("缓存命中: {key}"));
                return Ok(cached.instance.clone());
            }
            state.registry.lookup(key).cloned()
        };
        let entry = entry.ok_or_else(|| DependencyError::not_registered(key.type_name()))?;

        context.push_type(*key)?;
        let built = self.build_entry(key, entry, context);
        context.pop_type();

        Ok(self.publish(key, built?))
    }

    fn produce_value(&self, key: &ContractKey) -> Result<Instance, DependencyError> {
        let factory = {
            let state = self.state.lock();
            match state.registry.lookup(key) {
                Some(RegistrationEntry::Factory(factory)) => Some(factory.clone()),
                Some(RegistrationEntry::Instance(instance)) => return Ok(instance.clone()),
                _ => None,
            }
        };

        match factory {
            Some(factory) => factory.create(),
            None => key
                .zero_value()
                .ok_or_else(|| DependencyError::not_registered(key.type_name())),
        }
    }

    fn build_entry(
        &self,
        key: &ContractKey,
        entry: RegistrationEntry,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        match entry {
            RegistrationEntry::Instance(instance) => Ok(instance),
            RegistrationEntry::Factory(factory) => {
                self.debug_log(format_args!("调用工厂: {key}"));
                let instance = factory.create()?;
                StatsCounters::bump(&self.counters.constructions);
                Ok(instance)
            }
            RegistrationEntry::Type(mapping) => self.construct(key, &mapping, context),
        }
    }

    fn construct(
        &self,
        key: &ContractKey,
        mapping: &TypeMapping,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        let implementation = &mapping.implementation;
        let constructor = implementation.constructor.as_ref().ok_or_else(|| {
            DependencyError::NoSuitableConstructor {
                type_name: implementation.name().to_string(),
            }
        })?;

        let mut values = Vec::with_capacity(constructor.parameters().len());
        for parameter in constructor.parameters() {
            let argument = self.resolve_key(parameter, context)?;
            values.push((*parameter, argument));
        }

        let mut arguments = Arguments::new(implementation.name(), values);
        let mut built = constructor.build(&mut arguments)?;
        StatsCounters::bump(&self.counters.constructions);
        self.debug_log(format_args!("构造组件: {} -> {}", key, implementation.name()));

        self.inject_erased(
            built.as_mut(),
            implementation.name(),
            &implementation.properties,
            context,
        );

        mapping.upcast(built)
    }
}

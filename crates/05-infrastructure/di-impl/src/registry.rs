//! 内存组件注册表

use di_abstractions::{
    ComponentRegistry, ContractKey, Factory, Instance, RegistrationEntry, TypeMapping,
};
use std::collections::HashMap;
use tracing::debug;

/// 基于 `HashMap` 的组件注册表
#[derive(Debug, Default)]
pub struct InMemoryComponentRegistry {
    entries: HashMap<ContractKey, RegistrationEntry>,
}

impl InMemoryComponentRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: ContractKey, entry: RegistrationEntry) -> Option<RegistrationEntry> {
        let previous = self.entries.insert(key, entry);
        if let Some(previous) = &previous {
            debug!("覆盖已有注册项: {} ({})", key, previous.kind());
        }
        previous
    }
}

impl ComponentRegistry for InMemoryComponentRegistry {
    fn register(&mut self, key: ContractKey, mapping: TypeMapping) -> Option<RegistrationEntry> {
        self.insert(key, RegistrationEntry::Type(mapping))
    }

    fn register_factory(&mut self, key: ContractKey, factory: Factory) -> Option<RegistrationEntry> {
        self.insert(key, RegistrationEntry::Factory(factory))
    }

    fn register_instance(
        &mut self,
        key: ContractKey,
        instance: Instance,
    ) -> Option<RegistrationEntry> {
        self.insert(key, RegistrationEntry::Instance(instance))
    }

    fn lookup(&self, key: &ContractKey) -> Option<&RegistrationEntry> {
        self.entries.get(key)
    }

    fn keys(&self) -> Vec<ContractKey> {
        self.entries.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

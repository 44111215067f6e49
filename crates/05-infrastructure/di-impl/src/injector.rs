//! 属性注入
//!
//! 属性注入是软失败的：无法解析的属性记录警告后跳过，保持为空

use crate::container::{DiContainerImpl, StatsCounters};
use di_abstractions::{
    ComponentResolver, ErasedProperty, Injectable, InjectionReport, PropertyInjector,
    ResolveContext, SkippedProperty,
};
use std::any::Any;
use tracing::warn;

impl PropertyInjector for DiContainerImpl {
    fn inject_erased(
        &self,
        target: &mut (dyn Any + Send + Sync),
        owner: &str,
        properties: &[ErasedProperty],
        context: &mut ResolveContext,
    ) -> InjectionReport {
        let mut report = InjectionReport::default();

        for property in properties {
            let contract = property.contract();
            let outcome = match self.resolve_key(&contract, context) {
                Ok(instance) => property.assign(target, &instance),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(()) => {
                    self.debug_log(format_args!("注入属性: {}.{}", owner, property.name()));
                    report.wired.push(property.name());
                }
                Err(err) => {
                    warn!(
                        container = %self.id(),
                        "属性注入失败, 已跳过: {}.{} ({}): {}",
                        owner,
                        property.name(),
                        contract,
                        err
                    );
                    StatsCounters::bump(&self.counters.skipped_injections);
                    report.skipped.push(SkippedProperty {
                        name: property.name(),
                        contract,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }

    fn inject_into<T: Injectable>(&self, target: &mut T) -> InjectionReport {
        let properties: Vec<ErasedProperty> = T::properties()
            .into_iter()
            .map(ErasedProperty::from_slot)
            .collect();
        let mut context = self.new_context();
        self.inject_erased(target, std::any::type_name::<T>(), &properties, &mut context)
    }
}

//! 默认组件扫描器

use di_abstractions::{CandidateType, ComponentRegistry, ComponentScanner, ScanReport, TypeMapping};
use infrastructure_common::ComponentError;
use std::collections::HashSet;
use tracing::{debug, info};

/// 默认组件扫描器
///
/// 可注入的候选类型按第一个契约注册，没有契约时注册到自身。
/// 同一个具体类型出现多次时只注册一次。
#[derive(Debug, Default)]
pub struct DefaultComponentScanner;

impl DefaultComponentScanner {
    /// 创建扫描器
    pub fn new() -> Self {
        Self
    }
}

impl ComponentScanner for DefaultComponentScanner {
    fn scan(
        &self,
        candidates: &[CandidateType],
        registry: &mut dyn ComponentRegistry,
    ) -> Result<ScanReport, ComponentError> {
        info!("开始扫描 {} 个候选类型", candidates.len());

        let mut report = ScanReport::default();
        let mut seen = HashSet::new();

        for candidate in candidates {
            let implementation = candidate.type_info();

            if !seen.insert(candidate.implementation.key) {
                debug!("重复的候选类型: {}", implementation.name);
                continue;
            }

            if !candidate.is_injectable() {
                debug!("跳过不可注入的类型: {}", implementation.name);
                report.skipped.push(implementation);
                continue;
            }

            let binding = candidate.primary_binding();
            if binding.implementation != candidate.implementation.key {
                return Err(ComponentError::RegistrationError {
                    type_name: implementation.module_path,
                    message: format!("契约绑定指向了其他实现类型: {}", binding.implementation),
                });
            }

            let contract = binding.contract.type_info();
            info!("注册组件: {} -> {}", contract.name, implementation.name);
            registry.register(
                binding.contract,
                TypeMapping::from_parts(candidate.implementation.clone(), binding),
            );
            report.registered.push((contract, implementation));
        }

        info!(
            "扫描完成: 注册 {} 个, 跳过 {} 个",
            report.registered.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn name(&self) -> &str {
        "DefaultComponentScanner"
    }
}

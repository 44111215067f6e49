//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::contract::Implements;
use crate::injection::{Injectable, PropertyInjector};
use crate::key::{ContractKey, Instance};
use crate::registry::TypeMapping;
use crate::resolver::{ComponentResolver, ResolveOptions};
use crate::scanner::{CandidateType, ComponentScanner};
use infrastructure_common::{ComponentError, ComponentMetadata, DependencyError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 容器作为显式的值在调用方之间传递，所有方法只需要共享引用，
/// 内部用一把粗粒度锁保护注册表和实例缓存。
pub trait DiContainer: ComponentResolver + PropertyInjector {
    /// 注册契约 `C` 由 `I` 实现
    fn register<C, I>(&self)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<C>,
        Self: Sized,
    {
        self.register_type(ContractKey::of::<C>(), TypeMapping::of::<C, I>());
    }

    /// 注册类型映射
    fn register_type(&self, key: ContractKey, mapping: TypeMapping);

    /// 注册服务工厂
    fn register_factory<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
        Self: Sized;

    /// 注册普通值工厂
    fn register_value_factory<T, F>(&self, factory: F)
    where
        T: Default + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
        Self: Sized;

    /// 注册实例，之后的解析直接返回该实例
    fn register_instance<T>(&self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
        Self: Sized;

    /// 按名称解析组件
    fn resolve_by_name(&self, name: &str) -> Result<Instance, DependencyError>;

    /// 检查是否已注册组件
    fn is_registered<T>(&self) -> bool
    where
        T: ?Sized + 'static,
        Self: Sized,
    {
        self.can_resolve(&ContractKey::of::<T>())
    }

    /// 获取所有已注册的组件元数据
    fn get_registered_components(&self) -> Vec<ComponentMetadata>;

    /// 验证容器状态，不构建任何实例
    fn validate(&self) -> Result<(), Vec<ComponentError>>;

    /// 统计信息
    fn stats(&self) -> ContainerStats;
}

/// 容器构建器 trait
pub trait ContainerBuilder: Send {
    /// 关联的容器类型
    type Container: DiContainer;

    /// 构建容器，扫描在这里执行一次
    fn build(self) -> Result<Self::Container, ComponentError>;

    /// 添加候选类型
    fn add_candidate(self, candidate: CandidateType) -> Self
    where
        Self: Sized;

    /// 配置扫描器
    fn with_scanner(self, scanner: Box<dyn ComponentScanner>) -> Self
    where
        Self: Sized;

    /// 配置容器
    fn with_config(self, config: ContainerConfig) -> Self
    where
        Self: Sized;
}

/// 容器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否输出容器调试日志
    pub debug_mode: bool,
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 构建时是否验证容器
    pub validate_on_build: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            enable_circular_dependency_detection: true,
            max_resolution_depth: 64,
            validate_on_build: true,
        }
    }
}

impl ContainerConfig {
    /// 对应的解析选项
    pub fn to_resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            detect_cycles: self.enable_circular_dependency_detection,
            max_depth: self.max_resolution_depth,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerStats {
    /// 已注册组件数量
    pub registered_components: usize,
    /// 已缓存单例数量
    pub cached_singletons: usize,
    /// 解析次数
    pub resolutions: u64,
    /// 缓存命中次数
    pub cache_hits: u64,
    /// 构造次数
    pub constructions: u64,
    /// 解析错误数量
    pub resolution_errors: u64,
    /// 跳过的属性注入数量
    pub skipped_injections: u64,
}

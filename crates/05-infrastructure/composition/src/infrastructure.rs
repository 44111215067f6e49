//! 服务宿主

use crate::builder::InfrastructureBuilder;
use di_abstractions::{
    ComponentResolver, DiContainer, Injectable, InjectionReport, Instance, PropertyInjector,
};
use di_impl::DiContainerImpl;
use infrastructure_common::{ComponentMetadata, InfrastructureError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 服务宿主
///
/// 持有构建完成的依赖注入容器。容器是显式传递的值，不存在进程级的全局实例，
/// 需要在线程间共享时克隆 [`ServiceHost::container`] 返回的 `Arc`。
pub struct ServiceHost {
    /// 依赖注入容器
    container: Arc<DiContainerImpl>,
    /// 运行状态
    status: RwLock<InfrastructureStatus>,
    /// 统计信息
    metrics: RwLock<InfrastructureMetrics>,
}

impl ServiceHost {
    /// 创建基础设施构建器
    pub fn builder() -> InfrastructureBuilder {
        InfrastructureBuilder::new()
    }

    pub(crate) fn new(container: DiContainerImpl) -> Self {
        Self {
            container: Arc::new(container),
            status: RwLock::new(InfrastructureStatus::Initialized),
            metrics: RwLock::new(InfrastructureMetrics::default()),
        }
    }

    /// 启动宿主
    ///
    /// 启动前重新验证容器，验证失败时状态变为 `Failed` 并返回所有错误。
    pub fn start(&self) -> Result<(), InfrastructureError> {
        info!("启动服务宿主");
        *self.status.write() = InfrastructureStatus::Starting;
        self.metrics.write().start_time = Some(chrono::Utc::now());

        if let Err(errors) = self.container.validate() {
            for err in &errors {
                error!("依赖关系验证失败: {}", err);
            }
            *self.status.write() = InfrastructureStatus::Failed;
            return Err(InfrastructureError::ValidationFailed { errors });
        }

        *self.status.write() = InfrastructureStatus::Running;
        info!("服务宿主启动完成");
        Ok(())
    }

    /// 停止宿主
    pub fn stop(&self) -> Result<(), InfrastructureError> {
        info!("停止服务宿主");
        *self.status.write() = InfrastructureStatus::Stopping;

        self.metrics.write().stop_time = Some(chrono::Utc::now());
        *self.status.write() = InfrastructureStatus::Stopped;

        info!("服务宿主停止完成");
        Ok(())
    }

    /// 解析服务
    pub fn resolve<T>(&self) -> Result<Arc<T>, InfrastructureError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Ok(self.container.resolve::<T>()?)
    }

    /// 解析普通值
    pub fn resolve_value<T>(&self) -> Result<T, InfrastructureError>
    where
        T: Default + Clone + Send + Sync + 'static,
    {
        Ok(self.container.resolve_value::<T>()?)
    }

    /// 按名称解析
    pub fn resolve_by_name(&self, name: &str) -> Result<Instance, InfrastructureError> {
        Ok(self.container.resolve_by_name(name)?)
    }

    /// 向调用方构造的服务对象注入属性
    ///
    /// 单个属性解析失败不会中断注入，失败的属性保持为空并记录在返回的报告中。
    pub fn service_factory<T: Injectable>(&self, service: &mut T) -> InjectionReport {
        self.container.inject_into(service)
    }

    /// 以默认值构造服务对象并注入属性
    ///
    /// 返回的对象不会被缓存，每次调用都得到新的实例。
    pub fn create_service<T>(&self) -> T
    where
        T: Injectable + Default,
    {
        let mut service = T::default();
        let report = self.service_factory(&mut service);
        if !report.is_complete() {
            warn!(
                "服务 {} 有 {} 个属性未能注入",
                std::any::type_name::<T>(),
                report.skipped.len()
            );
        }
        service
    }

    /// 输出容器调试日志，仅在调试模式下生效
    pub fn debug_log(&self, message: impl fmt::Display) {
        self.container.debug_log(message);
    }

    /// 检查组件是否已注册
    pub fn is_component_registered<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.is_registered::<T>()
    }

    /// 获取运行状态
    pub fn status(&self) -> InfrastructureStatus {
        *self.status.read()
    }

    /// 获取统计信息
    pub fn metrics(&self) -> InfrastructureMetrics {
        let stats = self.container.stats();
        let mut metrics = self.metrics.read().clone();
        metrics.registered_components_count = stats.registered_components;
        metrics.cached_singletons_count = stats.cached_singletons;
        metrics.component_resolution_count = stats.resolutions;
        metrics.resolution_error_count = stats.resolution_errors;
        metrics.skipped_injection_count = stats.skipped_injections;
        metrics
    }

    /// 获取已注册的组件列表
    pub fn registered_components(&self) -> Vec<ComponentMetadata> {
        self.container.get_registered_components()
    }

    /// 获取依赖注入容器引用
    pub fn container(&self) -> &Arc<DiContainerImpl> {
        &self.container
    }
}

/// 宿主运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfrastructureStatus {
    /// 已初始化
    Initialized,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 已停止
    Stopped,
    /// 失败
    Failed,
}

/// 宿主统计信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfrastructureMetrics {
    /// 启动时间
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 停止时间
    pub stop_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 已注册的组件数量
    pub registered_components_count: usize,
    /// 已缓存的单例数量
    pub cached_singletons_count: usize,
    /// 组件解析次数
    pub component_resolution_count: u64,
    /// 解析失败次数
    pub resolution_error_count: u64,
    /// 被跳过的属性注入次数
    pub skipped_injection_count: u64,
}

impl InfrastructureMetrics {
    /// 计算运行时间
    pub fn uptime(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.stop_time) {
            (Some(start), Some(stop)) => Some(stop - start),
            (Some(start), None) => Some(chrono::Utc::now() - start),
            _ => None,
        }
    }
}

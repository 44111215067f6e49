//! 基础设施构建器

use crate::infrastructure::ServiceHost;
use di_abstractions::{
    CandidateType, ComponentScanner, ContainerBuilder, ContainerConfig, DiContainer, Implements,
    Injectable,
};
use di_impl::DiContainerBuilder;
use infrastructure_common::{ConfigSection, ConfigurationBuilder, DependencyError, InfrastructureError};
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, info};

/// 基础设施构建器
///
/// 使用建造者模式组装日志、配置对象和依赖注入容器，最终得到 [`ServiceHost`]。
pub struct InfrastructureBuilder {
    /// 容器构建器
    container: DiContainerBuilder,
    /// 容器配置
    container_config: ContainerConfig,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl InfrastructureBuilder {
    /// 创建新的基础设施构建器
    pub fn new() -> Self {
        Self {
            container: DiContainerBuilder::new(),
            container_config: ContainerConfig::default(),
            logging_enabled: false, // 默认不初始化日志，避免测试中重复初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 设置容器配置
    pub fn with_container_config(mut self, config: ContainerConfig) -> Self {
        self.container_config = config;
        self
    }

    /// 从已解析的配置节读取容器配置，缺失的字段取默认值
    pub fn with_container_config_section(
        mut self,
        section: &ConfigSection,
    ) -> Result<Self, InfrastructureError> {
        self.container_config = section.bind()?;
        debug!("从配置节读取容器配置: {:?}", self.container_config);
        Ok(self)
    }

    /// 替换组件扫描器
    pub fn with_scanner<S: ComponentScanner + 'static>(mut self, scanner: S) -> Self {
        info!("使用组件扫描器: {}", scanner.name());
        self.container = self.container.with_scanner(Box::new(scanner));
        self
    }

    /// 添加扫描候选类型
    pub fn add_candidate<I: Injectable>(mut self) -> Self {
        debug!("添加候选类型: {}", type_name::<I>());
        self.container = self.container.add_candidate(CandidateType::of::<I>());
        self
    }

    /// 注册契约 `C` 由 `I` 实现，覆盖扫描结果
    pub fn register<C, I>(mut self) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<C>,
    {
        self.container = self.container.register::<C, I>();
        self
    }

    /// 注册服务工厂
    pub fn register_factory<T, F>(mut self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        self.container = self.container.register_factory(factory);
        self
    }

    /// 注册普通值工厂
    pub fn register_value_factory<T, F>(mut self, factory: F) -> Self
    where
        T: Default + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.container = self.container.register_value_factory(factory);
        self
    }

    /// 注册已存在的实例
    pub fn register_instance<T>(mut self, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container = self.container.register_instance(instance);
        self
    }

    /// 构建配置对象并以实例形式固定到容器中
    pub fn register_configuration<T>(
        self,
        configuration: &ConfigurationBuilder<T>,
    ) -> Result<Self, InfrastructureError>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let config = configuration.build()?;
        info!("注册配置对象: {}", type_name::<T>());
        Ok(self.register_instance(Arc::new(config)))
    }

    /// 构建服务宿主
    pub fn build(self) -> Result<ServiceHost, InfrastructureError> {
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建基础设施");

        let container = self.container.with_config(self.container_config).build()?;
        let host = ServiceHost::new(container);

        info!(
            "基础设施构建完成，共注册 {} 个组件",
            host.container().get_registered_components().len()
        );
        Ok(host)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for InfrastructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境日志配置，容器调试日志需要 DEBUG 级别
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}

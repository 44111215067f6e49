//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置项的值不能为空: {key}")]
    NullValue { key: String },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 结构性错误（未注册、无构造函数、循环依赖）总是传递给 `resolve` 的调用方
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("没有可用的构造函数: {type_name}")]
    NoSuitableConstructor { type_name: String },

    #[error("参数不能为空: {argument}")]
    NullArgument { argument: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {depth}: {type_name}")]
    MaxDepthExceeded { type_name: String, depth: usize },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(type_name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered {
            type_name: type_name.into(),
        }
    }

    /// 创建空参数错误
    pub fn null_argument(argument: impl Into<String>) -> Self {
        Self::NullArgument {
            argument: argument.into(),
        }
    }

    /// 包装组件构造过程中产生的错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 是否为结构性错误（注册缺失、构造函数缺失或依赖图问题）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotRegistered { .. }
                | Self::NoSuitableConstructor { .. }
                | Self::CircularDependency { .. }
                | Self::MaxDepthExceeded { .. }
        )
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("组件依赖缺失: {type_name} 依赖未注册的 {dependency}")]
    MissingDependency { type_name: String, dependency: String },

    #[error("检测到循环依赖: {cycle}")]
    CircularDependency { cycle: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("容器验证失败: {}", format_errors(.errors))]
    ValidationFailed { errors: Vec<ComponentError> },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

fn format_errors(errors: &[ComponentError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

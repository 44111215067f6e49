//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义契约键、组件描述以及注册、扫描、解析、注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`ComponentResolver`] - 依赖解析器接口
//! - [`PropertyInjector`] - 属性注入器接口
//! - [`DiContainer`] - 完整容器接口
//!
//! ## 组件描述
//!
//! 组件通过 [`Injectable`] 静态声明自己的构造函数参数、可注入属性和实现的契约，
//! 一般由 `#[derive(Injectable)]` 生成。

pub mod container;
pub mod contract;
pub mod factory;
pub mod injection;
pub mod key;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use contract::*;
pub use factory::*;
pub use injection::*;
pub use key::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;

#[cfg(feature = "derive")]
pub use component_macros::Injectable;

pub use infrastructure_common::{
    ComponentError, ComponentMetadata, DependencyError, RegistrationKind, TypeInfo,
};

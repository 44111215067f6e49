//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台基础设施层的公共类型和工具。
//!
//! ## 核心内容
//!
//! - [`TypeInfo`] / [`ComponentMetadata`] - 类型与组件元数据
//! - [`DependencyError`] / [`ComponentError`] / [`ConfigError`] - 错误分类
//! - [`ConfigSection`] / [`ConfigurationBuilder`] - 已解析的配置对象
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 配置只以已解析的对象形式被消费，不涉及文件读写

pub mod configuration;
pub mod errors;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use metadata::*;

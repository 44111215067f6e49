//! # 基础设施组合层
//!
//! 这个 crate 把日志、已解析的配置对象和依赖注入容器组合成一个可运行的服务宿主。
//!
//! ## 主要功能
//!
//! - **基础设施构建器**: 初始化日志，收集候选类型、手动注册和配置对象
//! - **服务宿主**: 解析服务，向调用方构造的对象注入属性，管理启动和停止
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::Injectable;
//! use infrastructure_composition::{InfrastructureBuilder, LoggingConfig};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Injectable)]
//! #[injectable(provides(dyn Clock))]
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = InfrastructureBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .add_candidate::<SystemClock>()
//!         .build()?;
//!
//!     host.start()?;
//!     let clock: Arc<dyn Clock> = host.resolve::<dyn Clock>()?;
//!     println!("now = {}", clock.now());
//!     host.stop()?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod infrastructure;


// 重新导出主要类型
pub use builder::{InfrastructureBuilder, LoggingConfig};
pub use infrastructure::{InfrastructureMetrics, InfrastructureStatus, ServiceHost};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

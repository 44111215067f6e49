//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器、组件注册表、扫描器、解析器和属性注入器实现

pub mod builder;
pub mod container;
pub mod injector;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use builder::DiContainerBuilder;
pub use container::DiContainerImpl;
pub use registry::InMemoryComponentRegistry;
pub use scanner::DefaultComponentScanner;

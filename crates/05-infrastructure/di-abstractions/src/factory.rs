//! 组件工厂
//!
//! 零参数的构造函数，用于需要自定义构建逻辑的契约

use crate::key::{erase, erase_value, ContractKey, Instance};
use infrastructure_common::DependencyError;
use std::fmt;
use std::sync::Arc;

/// 工厂函数类型
pub type FactoryFn = Arc<dyn Fn() -> Result<Instance, DependencyError> + Send + Sync>;

/// 组件工厂
#[derive(Clone)]
pub struct Factory {
    produces: ContractKey,
    create: FactoryFn,
    plain_value: bool,
}

impl Factory {
    /// 创建生产共享服务的工厂
    pub fn new<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        Self {
            produces: ContractKey::of::<T>(),
            create: Arc::new(move || factory().map(erase)),
            plain_value: false,
        }
    }

    /// 创建生产普通值的工厂
    ///
    /// 普通值每次解析都会重新调用工厂。
    pub fn value<T, F>(factory: F) -> Self
    where
        T: Default + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            produces: ContractKey::value::<T>(),
            create: Arc::new(move || Ok(erase_value(factory()))),
            plain_value: true,
        }
    }

    /// 工厂产出的契约键
    pub fn produces(&self) -> ContractKey {
        self.produces
    }

    /// 是否生产普通值
    ///
    /// 普通值工厂的产物从不缓存，与请求时使用的契约键形式无关。
    pub fn is_plain_value(&self) -> bool {
        self.plain_value
    }

    /// 调用工厂
    pub fn create(&self) -> Result<Instance, DependencyError> {
        (self.create)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("produces", &self.produces.type_name())
            .field("plain_value", &self.plain_value)
            .field("create", &"<function>")
            .finish()
    }
}

//! 契约键与类型擦除实例
//!
//! 契约键是注册表和实例缓存共用的唯一键，按类型身份比较

use infrastructure_common::{DependencyError, TypeInfo};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 类型擦除后的实例
///
/// 内部载荷始终是契约类型 `C` 的 `Arc<C>`，`C` 可以是 trait object。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 契约键
///
/// 抽象契约（通常是 `dyn Trait`）或没有契约的具体类型本身。
#[derive(Clone, Copy)]
pub struct ContractKey {
    type_id: TypeId,
    type_name: &'static str,
    zero_value: Option<fn() -> Instance>,
}

impl ContractKey {
    /// 服务类型的契约键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            zero_value: None,
        }
    }

    /// 普通值类型的契约键
    ///
    /// 普通值从不作为单例缓存：有工厂时每次调用工厂，否则返回 `T::default()`。
    pub fn value<T: Default + Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            zero_value: Some(default_instance::<T>),
        }
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 完整类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 类型信息
    pub fn type_info(&self) -> TypeInfo {
        TypeInfo::from_parts(self.type_id, self.type_name)
    }

    /// 是否为普通值类型
    pub fn is_plain_value(&self) -> bool {
        self.zero_value.is_some()
    }

    /// 普通值类型的零值
    pub fn zero_value(&self) -> Option<Instance> {
        self.zero_value.map(|produce| produce())
    }
}

fn default_instance<T: Default + Send + Sync + 'static>() -> Instance {
    erase_value(T::default())
}

impl PartialEq for ContractKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractKey {}

impl Hash for ContractKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractKey")
            .field("type_name", &self.type_name)
            .field("plain_value", &self.is_plain_value())
            .finish()
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 擦除共享实例的类型
pub fn erase<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Instance {
    Arc::new(instance)
}

/// 擦除普通值的类型
pub fn erase_value<T: Send + Sync + 'static>(value: T) -> Instance {
    erase(Arc::new(value))
}

/// 把擦除后的实例还原为 `Arc<T>`
pub fn downcast<T: ?Sized + Send + Sync + 'static>(
    instance: &Instance,
    key: &ContractKey,
) -> Result<Arc<T>, DependencyError> {
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| DependencyError::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: format!("为 {key} 注册的实例"),
        })
}

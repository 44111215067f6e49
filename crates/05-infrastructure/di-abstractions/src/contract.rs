//! 契约绑定
//!
//! 具体类型通过 [`Implements`] 声明自己满足某个契约，
//! [`ContractBinding`] 是擦除后的 (契约键, 向上转换) 对。

use crate::key::{erase, ContractKey, Instance};
use infrastructure_common::DependencyError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 具体类型满足契约 `C`
///
/// 对 trait object 契约一般写成：
///
/// ```ignore
/// impl Implements<dyn Logger> for ConsoleLogger {
///     fn upcast(self: Arc<Self>) -> Arc<dyn Logger> {
///         self
///     }
/// }
/// ```
pub trait Implements<C: ?Sized>: Send + Sync + 'static {
    /// 转换为契约类型
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// 擦除后的向上转换函数
///
/// 输入是刚构建好的 `Box<I>`，输出是包装为 [`Instance`] 的 `Arc<C>`。
pub type UpcastFn = fn(Box<dyn Any + Send + Sync>) -> Result<Instance, DependencyError>;

/// 契约绑定
#[derive(Clone, Copy)]
pub struct ContractBinding {
    /// 契约键
    pub contract: ContractKey,
    /// 实现类型键
    pub implementation: ContractKey,
    /// 向上转换
    pub upcast: UpcastFn,
}

impl ContractBinding {
    /// 创建 `I` 到契约 `C` 的绑定
    pub fn of<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Implements<C>,
    {
        Self {
            contract: ContractKey::of::<C>(),
            implementation: ContractKey::of::<I>(),
            upcast: upcast_into::<C, I>,
        }
    }

    /// 实现类型绑定到自身
    pub fn identity<I: Send + Sync + 'static>() -> Self {
        Self::of::<I, I>()
    }

    /// 是否为自身绑定
    pub fn is_identity(&self) -> bool {
        self.contract == self.implementation
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &self.contract.type_name())
            .field("implementation", &self.implementation.type_name())
            .finish()
    }
}

fn upcast_into<C, I>(built: Box<dyn Any + Send + Sync>) -> Result<Instance, DependencyError>
where
    C: ?Sized + Send + Sync + 'static,
    I: Implements<C>,
{
    let concrete = built
        .downcast::<I>()
        .map_err(|_| DependencyError::TypeMismatch {
            expected: std::any::type_name::<I>().to_string(),
            actual: "构造函数返回的对象".to_string(),
        })?;
    let contract: Arc<C> = <I as Implements<C>>::upcast(Arc::<I>::from(concrete));
    Ok(erase(contract))
}

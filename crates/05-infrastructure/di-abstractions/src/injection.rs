//! 组件注入描述
//!
//! 组件不在运行时被反射，而是通过 [`Injectable`] 静态声明：
//! 唯一的构造函数及其参数、可注入属性、实现的契约。
//! 这里同时定义了擦除后的描述 [`ImplementationType`] 和属性注入器接口 [`PropertyInjector`]。

use crate::contract::ContractBinding;
use crate::key::{downcast, ContractKey, Instance};
use crate::resolver::ResolveContext;
use infrastructure_common::{DependencyError, TypeInfo};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// 可注入组件
///
/// 一般通过 `#[derive(Injectable)]` 实现。
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 是否显式标记为可注入
    fn marked() -> bool {
        true
    }

    /// 实现的契约，按声明顺序
    fn contracts() -> Vec<ContractBinding> {
        Vec::new()
    }

    /// 公开构造函数，没有时返回 `None`
    fn constructor() -> Option<Constructor<Self>>;

    /// 可注入属性
    fn properties() -> Vec<PropertySlot<Self>> {
        Vec::new()
    }
}

/// 已解析的构造函数参数
///
/// 参数按构造函数声明的顺序依次取出。
pub struct Arguments {
    owner: &'static str,
    values: VecDeque<(ContractKey, Instance)>,
}

impl Arguments {
    /// 创建参数列表
    pub fn new(owner: &'static str, values: Vec<(ContractKey, Instance)>) -> Self {
        Self {
            owner,
            values: values.into(),
        }
    }

    /// 取出下一个服务参数
    pub fn next<T>(&mut self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let (key, instance) = self.values.pop_front().ok_or_else(|| {
            DependencyError::DependencyResolutionFailed {
                type_name: self.owner.to_string(),
                message: format!("缺少 {} 类型的构造函数参数", std::any::type_name::<T>()),
            }
        })?;
        downcast::<T>(&instance, &key)
    }

    /// 取出下一个普通值参数
    pub fn next_value<T>(&mut self) -> Result<T, DependencyError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.next::<T>().map(|value| T::clone(&value))
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

type BuildFn<S> = Box<dyn Fn(&mut Arguments) -> Result<S, DependencyError> + Send + Sync>;

/// 构造函数描述
pub struct Constructor<S> {
    parameters: Vec<ContractKey>,
    build: BuildFn<S>,
}

impl<S> Constructor<S> {
    /// 创建构造函数描述
    pub fn new<F>(parameters: Vec<ContractKey>, build: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<S, DependencyError> + Send + Sync + 'static,
    {
        Self {
            parameters,
            build: Box::new(build),
        }
    }

    /// 参数的契约键，按声明顺序
    pub fn parameters(&self) -> &[ContractKey] {
        &self.parameters
    }

    /// 用已解析的参数构建实例
    pub fn build(&self, arguments: &mut Arguments) -> Result<S, DependencyError> {
        (self.build)(arguments)
    }
}

impl<S> fmt::Debug for Constructor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .field("build", &"<function>")
            .finish()
    }
}

/// 可注入属性单元
///
/// 默认为空，由属性注入器填充；无法解析时保持为空。
pub struct Inject<T: ?Sized> {
    slot: Option<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// 空属性
    pub const fn empty() -> Self {
        Self { slot: None }
    }

    /// 已注入的值
    pub fn get(&self) -> Option<&T> {
        self.slot.as_deref()
    }

    /// 已注入值的共享引用
    pub fn cloned(&self) -> Option<Arc<T>> {
        self.slot.clone()
    }

    /// 是否已注入
    pub fn is_wired(&self) -> bool {
        self.slot.is_some()
    }

    /// 设置属性值
    pub fn set(&mut self, value: Arc<T>) {
        self.slot = Some(value);
    }

    /// 取出属性值，属性变为空
    pub fn take(&mut self) -> Option<Arc<T>> {
        self.slot.take()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("contract", &std::any::type_name::<T>())
            .field("wired", &self.is_wired())
            .finish()
    }
}

type AssignFn<S> = Box<dyn Fn(&mut S, &Instance) -> Result<(), DependencyError> + Send + Sync>;

/// 可注入属性描述
pub struct PropertySlot<S> {
    name: &'static str,
    contract: ContractKey,
    assign: AssignFn<S>,
}

impl<S: 'static> PropertySlot<S> {
    /// 通过字段访问器创建属性描述
    pub fn new<T>(name: &'static str, accessor: fn(&mut S) -> &mut Inject<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let contract = ContractKey::of::<T>();
        Self {
            name,
            contract,
            assign: Box::new(move |target: &mut S, instance: &Instance| {
                let value = downcast::<T>(instance, &contract)?;
                accessor(target).set(value);
                Ok(())
            }),
        }
    }

    /// 属性名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 属性的契约键
    pub fn contract(&self) -> ContractKey {
        self.contract
    }

    /// 为目标赋值
    pub fn assign(&self, target: &mut S, instance: &Instance) -> Result<(), DependencyError> {
        (self.assign)(target, instance)
    }
}

impl<S> fmt::Debug for PropertySlot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySlot")
            .field("name", &self.name)
            .field("contract", &self.contract.type_name())
            .finish()
    }
}

type ErasedBuildFn =
    Arc<dyn Fn(&mut Arguments) -> Result<Box<dyn Any + Send + Sync>, DependencyError> + Send + Sync>;

/// 擦除类型后的构造函数
#[derive(Clone)]
pub struct ErasedConstructor {
    parameters: Vec<ContractKey>,
    build: ErasedBuildFn,
}

impl ErasedConstructor {
    /// 擦除构造函数的产出类型
    pub fn from_constructor<S: Send + Sync + 'static>(constructor: Constructor<S>) -> Self {
        let Constructor { parameters, build } = constructor;
        Self {
            parameters,
            build: Arc::new(move |arguments: &mut Arguments| {
                build(arguments).map(|built| Box::new(built) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// 参数的契约键
    pub fn parameters(&self) -> &[ContractKey] {
        &self.parameters
    }

    /// 构建实例
    pub fn build(&self, arguments: &mut Arguments) -> Result<Box<dyn Any + Send + Sync>, DependencyError> {
        (self.build)(arguments)
    }
}

impl fmt::Debug for ErasedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedConstructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

type ErasedAssignFn = Arc<
    dyn Fn(&mut (dyn Any + Send + Sync), &Instance) -> Result<(), DependencyError> + Send + Sync,
>;

/// 擦除目标类型后的属性描述
#[derive(Clone)]
pub struct ErasedProperty {
    name: &'static str,
    contract: ContractKey,
    assign: ErasedAssignFn,
}

impl ErasedProperty {
    /// 擦除属性描述的目标类型
    pub fn from_slot<S: Send + Sync + 'static>(slot: PropertySlot<S>) -> Self {
        let PropertySlot {
            name,
            contract,
            assign,
        } = slot;
        Self {
            name,
            contract,
            assign: Arc::new(
                move |target: &mut (dyn Any + Send + Sync), instance: &Instance| {
                    let target = target.downcast_mut::<S>().ok_or_else(|| {
                        DependencyError::TypeMismatch {
                            expected: std::any::type_name::<S>().to_string(),
                            actual: "属性注入目标".to_string(),
                        }
                    })?;
                    assign(target, instance)
                },
            ),
        }
    }

    /// 属性名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 属性的契约键
    pub fn contract(&self) -> ContractKey {
        self.contract
    }

    /// 为目标赋值
    pub fn assign(
        &self,
        target: &mut (dyn Any + Send + Sync),
        instance: &Instance,
    ) -> Result<(), DependencyError> {
        (self.assign)(target, instance)
    }
}

impl fmt::Debug for ErasedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedProperty")
            .field("name", &self.name)
            .field("contract", &self.contract.type_name())
            .finish()
    }
}

/// 实现类型
///
/// [`Injectable`] 擦除后的形式，是注册表类型映射中保存的内容。
#[derive(Debug, Clone)]
pub struct ImplementationType {
    /// 实现类型自身的键
    pub key: ContractKey,
    /// 构造函数
    pub constructor: Option<ErasedConstructor>,
    /// 可注入属性
    pub properties: Vec<ErasedProperty>,
}

impl ImplementationType {
    /// 从可注入组件创建
    pub fn of<I: Injectable>() -> Self {
        Self {
            key: ContractKey::of::<I>(),
            constructor: I::constructor().map(ErasedConstructor::from_constructor),
            properties: I::properties()
                .into_iter()
                .map(ErasedProperty::from_slot)
                .collect(),
        }
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.key.type_name()
    }

    /// 类型信息
    pub fn type_info(&self) -> TypeInfo {
        self.key.type_info()
    }

    /// 构造函数参数
    pub fn constructor_parameters(&self) -> &[ContractKey] {
        self.constructor
            .as_ref()
            .map_or(&[], ErasedConstructor::parameters)
    }

    /// 全部依赖：构造函数参数在前，属性在后
    pub fn dependencies(&self) -> Vec<ContractKey> {
        self.constructor_parameters()
            .iter()
            .copied()
            .chain(self.properties.iter().map(ErasedProperty::contract))
            .collect()
    }
}

/// 跳过的属性
#[derive(Debug, Clone)]
pub struct SkippedProperty {
    /// 属性名称
    pub name: &'static str,
    /// 属性契约
    pub contract: ContractKey,
    /// 跳过原因
    pub reason: String,
}

/// 属性注入结果
#[derive(Debug, Clone, Default)]
pub struct InjectionReport {
    /// 已注入的属性
    pub wired: Vec<&'static str>,
    /// 跳过的属性
    pub skipped: Vec<SkippedProperty>,
}

impl InjectionReport {
    /// 是否所有属性都已注入
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// 属性注入器 trait
///
/// 属性注入是尽力而为的：无法解析的属性记录日志后跳过，
/// 不影响所属对象的构造。
pub trait PropertyInjector: Send + Sync {
    /// 向类型擦除的目标注入属性，与当前解析共享上下文
    fn inject_erased(
        &self,
        target: &mut (dyn Any + Send + Sync),
        owner: &str,
        properties: &[ErasedProperty],
        context: &mut ResolveContext,
    ) -> InjectionReport;

    /// 向调用方自己构造的对象注入属性
    fn inject_into<T: Injectable>(&self, target: &mut T) -> InjectionReport
    where
        Self: Sized;
}

//! 组件扫描器抽象接口
//!
//! 扫描器在容器构建时运行一次，从宿主程序提供的候选类型列表中
//! 找出可注入的类型并填充注册表

use crate::contract::ContractBinding;
use crate::injection::{ImplementationType, Injectable};
use crate::registry::ComponentRegistry;
use infrastructure_common::{ComponentError, TypeInfo};

/// 候选类型
#[derive(Debug, Clone)]
pub struct CandidateType {
    /// 实现类型描述
    pub implementation: ImplementationType,
    /// 实现的契约，按声明顺序
    pub contracts: Vec<ContractBinding>,
    /// 是否显式标记为可注入
    pub marked: bool,
    /// 实现类型绑定到自身
    pub self_binding: ContractBinding,
}

impl CandidateType {
    /// 从可注入组件创建候选类型
    pub fn of<I: Injectable>() -> Self {
        Self {
            implementation: ImplementationType::of::<I>(),
            contracts: I::contracts(),
            marked: I::marked(),
            self_binding: ContractBinding::identity::<I>(),
        }
    }

    /// 是否可注入：显式标记，或至少有一个可注入属性
    pub fn is_injectable(&self) -> bool {
        self.marked || !self.implementation.properties.is_empty()
    }

    /// 注册时使用的绑定：第一个契约，没有契约时绑定到自身
    pub fn primary_binding(&self) -> ContractBinding {
        self.contracts.first().copied().unwrap_or(self.self_binding)
    }

    /// 类型信息
    pub fn type_info(&self) -> TypeInfo {
        self.implementation.type_info()
    }
}

/// 扫描结果
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// 已注册的 (契约, 实现) 对
    pub registered: Vec<(TypeInfo, TypeInfo)>,
    /// 跳过的类型
    pub skipped: Vec<TypeInfo>,
}

/// 组件扫描器 trait
pub trait ComponentScanner: Send + Sync {
    /// 扫描候选类型并写入注册表
    ///
    /// 只做发现不做验证：没有构造函数的类型同样会被注册，在解析时才失败。
    fn scan(
        &self,
        candidates: &[CandidateType],
        registry: &mut dyn ComponentRegistry,
    ) -> Result<ScanReport, ComponentError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

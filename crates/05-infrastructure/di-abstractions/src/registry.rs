//! 组件注册表抽象接口

use crate::contract::{ContractBinding, Implements};
use crate::factory::Factory;
use crate::injection::{ImplementationType, Injectable};
use crate::key::{ContractKey, Instance};
use infrastructure_common::{ComponentError, ComponentMetadata, DependencyError, RegistrationKind};
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// 类型映射：契约到待构造的实现类型
#[derive(Debug, Clone)]
pub struct TypeMapping {
    /// 实现类型
    pub implementation: ImplementationType,
    /// 实现类型到契约的绑定
    pub binding: ContractBinding,
}

impl TypeMapping {
    /// 契约 `C` 映射到实现 `I`
    pub fn of<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<C>,
    {
        Self {
            implementation: ImplementationType::of::<I>(),
            binding: ContractBinding::of::<C, I>(),
        }
    }

    /// 用已擦除的实现类型和绑定创建
    pub fn from_parts(implementation: ImplementationType, binding: ContractBinding) -> Self {
        Self {
            implementation,
            binding,
        }
    }

    /// 把构造出的实现对象转换为契约实例
    pub fn upcast(&self, built: Box<dyn Any + Send + Sync>) -> Result<Instance, DependencyError> {
        (self.binding.upcast)(built)
    }
}

/// 注册项
#[derive(Debug, Clone)]
pub enum RegistrationEntry {
    /// 类型映射
    Type(TypeMapping),
    /// 工厂
    Factory(Factory),
    /// 预先构建好的实例
    Instance(Instance),
}

impl RegistrationEntry {
    /// 注册项类型
    pub fn kind(&self) -> RegistrationKind {
        match self {
            Self::Type(_) => RegistrationKind::TypeMapping,
            Self::Factory(_) => RegistrationKind::Factory,
            Self::Instance(_) => RegistrationKind::Instance,
        }
    }

    /// 注册项的元数据
    pub fn metadata(&self, key: &ContractKey) -> ComponentMetadata {
        let metadata = ComponentMetadata::new(key.type_info(), self.kind());
        match self {
            Self::Type(mapping) => metadata.with_implementation(mapping.implementation.type_info()),
            _ => metadata,
        }
    }
}

/// 组件注册表 trait
///
/// 纯数据结构：每个契约键至多一个注册项，后注册的覆盖先注册的。
/// 不验证实现类型是否满足契约，这由扫描器负责。
pub trait ComponentRegistry: Send + Sync {
    /// 注册类型映射，返回被覆盖的注册项
    fn register(&mut self, key: ContractKey, mapping: TypeMapping) -> Option<RegistrationEntry>;

    /// 注册工厂，返回被覆盖的注册项
    fn register_factory(&mut self, key: ContractKey, factory: Factory) -> Option<RegistrationEntry>;

    /// 注册实例，返回被覆盖的注册项
    fn register_instance(&mut self, key: ContractKey, instance: Instance)
        -> Option<RegistrationEntry>;

    /// 查找注册项
    fn lookup(&self, key: &ContractKey) -> Option<&RegistrationEntry>;

    /// 检查契约是否已注册
    fn is_registered(&self, key: &ContractKey) -> bool {
        self.lookup(key).is_some()
    }

    /// 所有已注册的契约键
    fn keys(&self) -> Vec<ContractKey>;

    /// 按名称查找契约键
    fn find_by_name(&self, name: &str) -> Option<ContractKey> {
        self.keys()
            .into_iter()
            .find(|key| key.type_info().matches_name(name))
    }

    /// 获取所有已注册组件的元数据
    fn get_registered_components(&self) -> Vec<ComponentMetadata> {
        self.keys()
            .iter()
            .filter_map(|key| self.lookup(key).map(|entry| entry.metadata(key)))
            .collect()
    }

    /// 注册项数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清理已注册的组件
    fn clear(&mut self);
}

/// 依赖图节点
#[derive(Debug, Clone)]
pub struct DependencyGraphNode {
    /// 契约键
    pub key: ContractKey,
    /// 组件名称
    pub name: String,
    /// 构造函数依赖
    pub dependencies: Vec<ContractKey>,
}

/// 循环依赖检测器
pub trait CircularDependencyDetector: Send + Sync {
    /// 检测循环依赖
    fn detect_circular_dependencies(&self, graph: &[DependencyGraphNode]) -> Result<(), ComponentError>;

    /// 构建依赖图
    fn build_dependency_graph(&self, registry: &dyn ComponentRegistry) -> Vec<DependencyGraphNode>;
}

/// 默认循环依赖检测器
///
/// 只沿构造函数依赖走图。属性在构造完成后才注入，不构成构造期的环。
#[derive(Debug, Default)]
pub struct DefaultCircularDependencyDetector;

impl CircularDependencyDetector for DefaultCircularDependencyDetector {
    fn detect_circular_dependencies(&self, graph: &[DependencyGraphNode]) -> Result<(), ComponentError> {
        // 使用深度优先搜索检测循环依赖
        let nodes: HashMap<ContractKey, &DependencyGraphNode> =
            graph.iter().map(|node| (node.key, node)).collect();
        let mut visited = HashSet::new();
        let mut visiting = Vec::new();

        for node in graph {
            if !visited.contains(&node.key) {
                self.dfs_check(node.key, &nodes, &mut visited, &mut visiting)?;
            }
        }

        Ok(())
    }

    fn build_dependency_graph(&self, registry: &dyn ComponentRegistry) -> Vec<DependencyGraphNode> {
        registry
            .keys()
            .into_iter()
            .filter_map(|key| {
                let entry = registry.lookup(&key)?;
                let dependencies = match entry {
                    RegistrationEntry::Type(mapping) => {
                        mapping.implementation.constructor_parameters().to_vec()
                    }
                    _ => Vec::new(),
                };
                Some(DependencyGraphNode {
                    key,
                    name: key.type_info().name,
                    dependencies,
                })
            })
            .collect()
    }
}

impl DefaultCircularDependencyDetector {
    fn dfs_check(
        &self,
        current: ContractKey,
        nodes: &HashMap<ContractKey, &DependencyGraphNode>,
        visited: &mut HashSet<ContractKey>,
        visiting: &mut Vec<ContractKey>,
    ) -> Result<(), ComponentError> {
        if let Some(start) = visiting.iter().position(|key| *key == current) {
            // 检测到循环依赖
            let cycle = visiting[start..]
                .iter()
                .chain(std::iter::once(&current))
                .map(|key| key.type_info().name)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ComponentError::CircularDependency { cycle });
        }

        if visited.contains(&current) {
            return Ok(());
        }

        visiting.push(current);

        if let Some(node) = nodes.get(&current) {
            for dependency in &node.dependencies {
                self.dfs_check(*dependency, nodes, visited, visiting)?;
            }
        }

        visiting.pop();
        visited.insert(current);

        Ok(())
    }
}

//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::key::{downcast, ContractKey, Instance};
use infrastructure_common::DependencyError;
use std::sync::Arc;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例
pub trait ComponentResolver: Send + Sync {
    /// 解析契约键对应的实例
    ///
    /// 递归解析共享同一个上下文，用于检测循环依赖
    fn resolve_key(
        &self,
        key: &ContractKey,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError>;

    /// 以新的上下文解析调用方请求的契约键
    ///
    /// 公开解析入口都经过这里，实现可以在此统计调用方可见的失败。
    /// 属性注入和构造参数使用 [`ComponentResolver::resolve_key`]，不经过这里。
    fn resolve_root(&self, key: &ContractKey) -> Result<Instance, DependencyError> {
        self.resolve_key(key, &mut self.new_context())
    }

    /// 检查是否可以解析指定契约
    fn can_resolve(&self, key: &ContractKey) -> bool;

    /// 创建新的解析上下文
    fn new_context(&self) -> ResolveContext {
        ResolveContext::new()
    }

    /// 解析指定类型的组件
    fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let key = ContractKey::of::<T>();
        let instance = self.resolve_root(&key)?;
        downcast::<T>(&instance, &key)
    }

    /// 解析普通值
    ///
    /// 普通值不缓存，没有注册工厂时返回默认值
    fn resolve_value<T>(&self) -> Result<T, DependencyError>
    where
        T: Default + Clone + Send + Sync + 'static,
        Self: Sized,
    {
        let key = ContractKey::value::<T>();
        let instance = self.resolve_root(&key)?;
        downcast::<T>(&instance, &key).map(|value| T::clone(&value))
    }
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ContractKey>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, key: ContractKey) -> Result<(), DependencyError> {
        if self.options.detect_cycles && self.resolution_chain.contains(&key) {
            let chain = self
                .resolution_chain
                .iter()
                .chain(std::iter::once(&key))
                .map(|k| k.type_info().name)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::MaxDepthExceeded {
                type_name: key.type_name().to_string(),
                depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(key);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 是否检测循环依赖
    pub detect_cycles: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 64,
        }
    }
}

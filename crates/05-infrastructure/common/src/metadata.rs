//! 元数据定义
//!
//! 提供组件和类型的元数据信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（去掉模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 trait object
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_parts(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// 从类型ID和完整类型名称创建类型信息
    pub fn from_parts(id: TypeId, full_name: &str) -> Self {
        Self {
            name: shorten_type_name(full_name),
            id,
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 检查名称是否指向此类型
    ///
    /// 接受简短名称、完整路径，以及去掉 `dyn ` 前缀的 trait 名称。
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name
            || self.module_path == name
            || self.name.strip_prefix("dyn ") == Some(name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

/// 去掉类型名称中每一段路径的模块前缀，泛型参数同样处理
fn shorten_type_name(full_name: &str) -> String {
    let mut shortened = String::with_capacity(full_name.len());
    let mut segment_start = 0;
    let mut chars = full_name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            shortened.truncate(segment_start);
        } else {
            shortened.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = shortened.len();
            }
        }
    }

    shortened
}

/// 注册项类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    /// 契约映射到实现类型
    TypeMapping,
    /// 工厂函数
    Factory,
    /// 预先构建好的实例
    Instance,
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TypeMapping => "type",
            Self::Factory => "factory",
            Self::Instance => "instance",
        };
        f.write_str(label)
    }
}

/// 组件元数据
///
/// 描述注册表中的一条注册项，供诊断和日志使用
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    /// 契约类型信息
    pub contract: TypeInfo,
    /// 实现类型信息（仅类型映射有）
    pub implementation: Option<TypeInfo>,
    /// 注册项类型
    pub kind: RegistrationKind,
    /// 组件名称
    pub name: String,
}

impl ComponentMetadata {
    /// 创建新的组件元数据
    pub fn new(contract: TypeInfo, kind: RegistrationKind) -> Self {
        let name = contract.name.clone();
        Self {
            contract,
            implementation: None,
            kind,
            name,
        }
    }

    /// 设置实现类型
    pub fn with_implementation(mut self, implementation: TypeInfo) -> Self {
        self.implementation = Some(implementation);
        self
    }
}

//! 宏工具函数

use proc_macro2::Span;
use syn::{Field, GenericArgument, Ident, PathArguments, Type};

/// 如果类型形如 `Wrapper<T>`，返回 `T`
///
/// 只比较路径的最后一段，`Arc<T>` 和 `std::sync::Arc<T>` 都能匹配。
pub fn wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// 生成唯一的标识符
pub fn generate_unique_ident(base_name: &str, suffix: &str) -> Ident {
    let unique_name = format!("__{}__{}", base_name, suffix);
    Ident::new(&unique_name, Span::call_site())
}

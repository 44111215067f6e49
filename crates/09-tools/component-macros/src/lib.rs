//! # Component Macros
//!
//! 这个 crate 提供 `#[derive(Injectable)]`，为服务类型生成静态的依赖描述：
//! 构造函数参数、可注入属性和实现的契约。
//!
//! ## 使用示例
//!
//! ```ignore
//! use di_abstractions::{Inject, Injectable};
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[injectable(provides(dyn Reporting))]
//! pub struct Reporter {
//!     logger: Arc<dyn Logger>,
//!     #[inject]
//!     cache: Inject<dyn Cache>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入组件派生宏
///
/// 为结构体实现 `di_abstractions::Injectable`。
///
/// # 结构体参数
///
/// - `provides(dyn A, dyn B)` - 实现的契约，同时生成对应的 `Implements` 实现
/// - `unmarked` - 不显式标记为可注入，只有存在 `#[inject]` 属性时才会被扫描器注册
/// - `no_constructor` - 不生成构造函数，解析时报错
///
/// # 字段
///
/// - 未标注的字段必须是 `Arc<T>`，作为构造函数参数
/// - `#[value]` - 普通值构造函数参数
/// - `#[inject]` - 可注入属性，类型必须是 `Inject<T>`
/// - `#[skip]` - 使用 `Default::default()`
#[proc_macro_derive(Injectable, attributes(injectable, inject, value, skip))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

//! `#[derive(Injectable)]` 实现

use crate::utils::{field_has_attribute, generate_unique_ident, wrapped_type};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{
    parenthesized, punctuated::Punctuated, Data, DeriveInput, Error, Fields, Result, Token, Type,
};

/// 结构体级参数
#[derive(Default)]
struct InjectableArgs {
    /// 实现的契约，按声明顺序
    provides: Vec<Type>,
    /// 不显式标记为可注入
    unmarked: bool,
    /// 不生成构造函数
    no_constructor: bool,
}

impl InjectableArgs {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();

        for attr in input.attrs.iter().filter(|a| a.path().is_ident("injectable")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("provides") {
                    let content;
                    parenthesized!(content in meta.input);
                    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.provides.extend(types);
                    Ok(())
                } else if meta.path.is_ident("unmarked") {
                    args.unmarked = true;
                    Ok(())
                } else if meta.path.is_ident("no_constructor") {
                    args.no_constructor = true;
                    Ok(())
                } else {
                    Err(meta.error("未知的 injectable 参数，可用参数: provides(..), unmarked, no_constructor"))
                }
            })?;
        }

        Ok(args)
    }
}

/// 字段在构造函数中的角色
enum FieldRole<'a> {
    /// `Arc<T>` 服务参数
    Service(&'a Type),
    /// `#[value]` 普通值参数
    Value(&'a Type),
    /// `#[inject]` 属性，构造时为空
    Property(&'a Type),
    /// `#[skip]` 使用默认值
    Skip,
}

fn classify(field: &syn::Field, check_constructor: bool) -> Result<FieldRole<'_>> {
    let markers = ["inject", "value", "skip"]
        .iter()
        .filter(|name| field_has_attribute(field, name))
        .count();
    if markers > 1 {
        return Err(Error::new(
            field.span(),
            "#[inject]、#[value]、#[skip] 只能使用其中一个",
        ));
    }

    if field_has_attribute(field, "inject") {
        return wrapped_type(&field.ty, "Inject")
            .map(FieldRole::Property)
            .ok_or_else(|| Error::new(field.ty.span(), "#[inject] 字段的类型必须是 Inject<T>"));
    }
    if field_has_attribute(field, "value") {
        return Ok(FieldRole::Value(&field.ty));
    }
    if field_has_attribute(field, "skip") || !check_constructor {
        return Ok(FieldRole::Skip);
    }

    wrapped_type(&field.ty, "Arc")
        .map(FieldRole::Service)
        .ok_or_else(|| {
            Error::new(
                field.ty.span(),
                "构造函数参数必须是 Arc<T>，或标注 #[inject] / #[value] / #[skip]",
            )
        })
}

/// 生成 `Injectable` 实现
pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.params.span(),
            "Injectable 不支持泛型结构体",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return derive_for_fields(name, &InjectableArgs::from_input(&input)?, &[]);
            }
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    data.fields.span(),
                    "Injectable 只支持具名字段的结构体",
                ));
            }
        },
        _ => return Err(Error::new(name.span(), "Injectable 只能用于结构体")),
    };

    let fields: Vec<&syn::Field> = fields.iter().collect();
    derive_for_fields(name, &InjectableArgs::from_input(&input)?, &fields)
}

fn derive_for_fields(
    name: &syn::Ident,
    args: &InjectableArgs,
    fields: &[&syn::Field],
) -> Result<TokenStream> {
    let marked = !args.unmarked;

    let mut parameters = Vec::new();
    let mut initializers = Vec::new();
    let mut accessors = Vec::new();
    let mut slots = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "缺少字段名"))?;
        let field_ty = &field.ty;

        match classify(field, !args.no_constructor)? {
            FieldRole::Service(inner) => {
                parameters.push(quote! { ::di_abstractions::ContractKey::of::<#inner>() });
                initializers.push(quote! { #ident: arguments.next::<#inner>()? });
            }
            FieldRole::Value(ty) => {
                parameters.push(quote! { ::di_abstractions::ContractKey::value::<#ty>() });
                initializers.push(quote! { #ident: arguments.next_value::<#ty>()? });
            }
            FieldRole::Property(_) => {
                let accessor = generate_unique_ident(&ident.to_string(), "accessor");
                let property_name = ident.to_string();
                accessors.push(quote_spanned! { field.span() =>
                    fn #accessor(target: &mut #name) -> &mut #field_ty {
                        &mut target.#ident
                    }
                });
                slots.push(quote! {
                    ::di_abstractions::PropertySlot::<Self>::new(#property_name, #accessor)
                });
                initializers.push(quote! { #ident: ::di_abstractions::Inject::empty() });
            }
            FieldRole::Skip => {
                initializers.push(quote! { #ident: ::core::default::Default::default() });
            }
        }
    }

    let arguments = if parameters.is_empty() {
        quote! { _ }
    } else {
        quote! { arguments }
    };

    let constructor = if args.no_constructor {
        quote! { ::core::option::Option::None }
    } else {
        quote! {
            ::core::option::Option::Some(::di_abstractions::Constructor::new(
                ::std::vec![#(#parameters),*],
                |#arguments: &mut ::di_abstractions::Arguments| {
                    ::core::result::Result::Ok(Self {
                        #(#initializers),*
                    })
                },
            ))
        }
    };

    let contracts = &args.provides;
    let implements = contracts.iter().map(|contract| {
        quote_spanned! { contract.span() =>
            impl ::di_abstractions::Implements<#contract> for #name {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#contract> {
                    self
                }
            }
        }
    });

    Ok(quote! {
        impl ::di_abstractions::Injectable for #name {
            fn marked() -> bool {
                #marked
            }

            fn contracts() -> ::std::vec::Vec<::di_abstractions::ContractBinding> {
                ::std::vec![#(::di_abstractions::ContractBinding::of::<#contracts, Self>()),*]
            }

            fn constructor() -> ::core::option::Option<::di_abstractions::Constructor<Self>> {
                #constructor
            }

            fn properties() -> ::std::vec::Vec<::di_abstractions::PropertySlot<Self>> {
                #(#accessors)*
                ::std::vec![#(#slots),*]
            }
        }

        #(#implements)*
    })
}

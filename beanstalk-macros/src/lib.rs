use proc_macro::TokenStream;
use quote::quote;

use syn::ext::IdentExt as _;
use syn::spanned::Spanned as _;
use syn::{Attribute, Data, DeriveInput, Error, Fields, ItemStruct, LitBool, LitStr};

const BEAN_ATTR: &str = "bean";
const AUTOWIRED_ATTR: &str = "autowired";

#[derive(Default)]
struct BeanAttrs {
    name: Option<LitStr>,
    scope: Option<LitStr>,
    lazy: bool,
}

fn parse_bean_attrs(attrs: &[Attribute]) -> Result<BeanAttrs, Error> {
    let mut result = BeanAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident(BEAN_ATTR) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                result.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("scope") {
                let scope: LitStr = meta.value()?.parse()?;
                match scope.value().as_str() {
                    "singleton" | "prototype" => {}
                    _ => {
                        return Err(Error::new(
                            scope.span(),
                            "Scope must be \"singleton\" or \"prototype\"",
                        ));
                    }
                }
                result.scope = Some(scope);
            } else if meta.path.is_ident("lazy") {
                result.lazy = match meta.value() {
                    Ok(value) => value.parse::<LitBool>()?.value,
                    Err(_) => true,
                };
            } else {
                return Err(meta.error(format!("Unsupported #[{BEAN_ATTR}] argument")));
            }
            Ok(())
        })?;
    }
    Ok(result)
}

fn is_autowired(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(AUTOWIRED_ATTR))
}

/// Derive macro for the Bean and Wirable traits
///
/// `#[autowired]` fields are wired with the bean named exactly like the field
/// (raw identifiers unescaped). Default bean names are decapitalized type
/// names, so a snake_case field holding a multi-word type only resolves if
/// that type is given the same name with `#[bean(name = "...")]`.
#[proc_macro_derive(Bean, attributes(bean, autowired))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match handle_derive_bean(input) {
        Ok(v) => v.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn handle_derive_bean(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Generic beans are not supported",
        ));
    }
    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        _ => return Err(Error::new(name.span(), "Only structs are supported")),
    };

    let mut slot_stmts = Vec::new();
    let mut wire_arms = Vec::new();
    let mut field_inits = Vec::new();

    match fields {
        Fields::Named(fields) => {
            for field in &fields.named {
                let field_ident = field.ident.as_ref().unwrap();
                if is_autowired(&field.attrs) {
                    let slot = field_ident.unraw().to_string();
                    slot_stmts.push(quote! {
                        deps = deps.slot(#slot);
                    });
                    wire_arms.push(quote! {
                        #slot => ::beanstalk::Autowire::autowire(&mut self.#field_ident, slot, bean),
                    });
                }
                field_inits.push(quote! {
                    #field_ident: ::core::default::Default::default()
                });
            }
        }
        Fields::Unnamed(_) => {
            return Err(Error::new(name.span(), "Tuple structs are not supported"));
        }
        Fields::Unit => {}
    }

    let instance = match fields {
        Fields::Unit => quote! { Self },
        _ => quote! { Self { #(#field_inits,)* } },
    };

    let attrs = parse_bean_attrs(&input.attrs)?;
    let mut marker_calls = Vec::new();
    if let Some(v) = &attrs.name {
        marker_calls.push(quote! { .name(#v) });
    }
    if let Some(v) = &attrs.scope {
        marker_calls.push(quote! { .scope(#v) });
    }
    if attrs.lazy {
        marker_calls.push(quote! { .lazy() });
    }
    let simple_name = name.unraw().to_string();

    Ok(quote! {
        impl ::beanstalk::Wirable for #name {
            fn dependencies() -> ::beanstalk::Dependencies {
                #[allow(unused_mut)]
                let mut deps = ::beanstalk::Dependencies::new();
                #(#slot_stmts)*
                deps
            }

            fn wire(
                &mut self,
                slot: &str,
                bean: ::beanstalk::BeanRef,
            ) -> ::core::result::Result<(), ::beanstalk::WireError> {
                #[allow(unused_variables)]
                let bean = bean;
                match slot {
                    #(#wire_arms)*
                    _ => ::core::result::Result::Err(
                        ::beanstalk::WireError::UnknownSlot(::std::string::ToString::to_string(slot)),
                    ),
                }
            }
        }

        impl ::beanstalk::Bean for #name {
            fn simple_name() -> &'static str {
                #simple_name
            }

            fn markers() -> ::beanstalk::BeanMarkers {
                ::beanstalk::BeanMarkers::new() #(#marker_calls)*
            }

            fn instantiate() -> ::core::result::Result<Self, ::beanstalk::StdError> {
                ::core::result::Result::Ok(#instance)
            }
        }

        ::beanstalk::submit_bean!(#name);
    })
}

/// Attribute macro marking a struct as a configuration root
///
/// `#[component_scan("my_app::beans")]` scans the given module path;
/// `#[component_scan]` scans the module the struct is declared in.
#[proc_macro_attribute]
pub fn component_scan(args: TokenStream, input: TokenStream) -> TokenStream {
    let root = if args.is_empty() {
        quote! { ::core::module_path!() }
    } else {
        let root = syn::parse_macro_input!(args as LitStr);
        quote! { #root }
    };
    let input_struct = syn::parse_macro_input!(input as ItemStruct);

    let struct_name = &input_struct.ident;
    let (impl_generics, ty_generics, where_clause) = input_struct.generics.split_for_impl();

    let expanded = quote! {
        #input_struct

        impl #impl_generics ::beanstalk::ConfigurationRoot for #struct_name #ty_generics #where_clause {
            fn component_scan(&self) -> ::core::option::Option<&str> {
                ::core::option::Option::Some(#root)
            }
        }
    };

    TokenStream::from(expanded)
}

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Expr, ExprLit, Lit, Meta, MetaNameValue};

/// Implements `IbcPortInterface` for the annotated struct and exposes the port as `IBC_PORT`.
///
/// ```ignore
/// #[derive(IbcPort)]
/// #[ibc_port = "transfer"]
/// pub struct Transfer;
/// ```
#[proc_macro_derive(IbcPort, attributes(ibc_port))]
pub fn derive_ibc_port(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let port_name = match ibc_port(&input) {
        Ok(port_name) => port_name,
        Err(err) => return err.to_compile_error().into(),
    };

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let prepath = prepath();

    quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            pub const IBC_PORT: &'static str = #port_name;
        }

        impl #impl_generics #prepath::ibc_application::IbcPortInterface for #struct_name #ty_generics #where_clause {
            fn port_name(&self) -> String {
                Self::IBC_PORT.to_string()
            }
        }
    }
    .into()
}

/// Value of `#[ibc_port = "..."]`.
fn ibc_port(input: &DeriveInput) -> syn::Result<String> {
    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("ibc_port"))
        .ok_or_else(|| syn::Error::new_spanned(&input.ident, "missing #[ibc_port = \"...\"]"))?;

    match &attr.meta {
        Meta::NameValue(MetaNameValue {
            value: Expr::Lit(ExprLit {
                lit: Lit::Str(port), ..
            }),
            ..
        }) if !port.value().is_empty() => Ok(port.value()),
        _ => Err(syn::Error::new_spanned(
            attr,
            "expected #[ibc_port = \"port\"] with a non empty port",
        )),
    }
}

/// Parses and prints the variants of an enum of grpc type urls:
///
/// ```ignore
/// #[urls]
/// pub enum QTransferQueryUrls {
///     #[strum(serialize = "/quasarlabs.quasarnode.qtransfer.Query/Params")]
///     Params,
/// }
/// ```
#[proc_macro_attribute]
pub fn urls(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let prepath = prepath();

    let expanded = quote! {
        #[derive(
            #prepath::strum_macros::EnumString,
            #prepath::strum_macros::Display,
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq
        )]
        #input
    };
    TokenStream::from(expanded)
}

/// Path of the `qtransfer` crate as seen from the expansion site.
fn prepath() -> proc_macro2::TokenStream {
    if cfg!(feature = "internal") {
        quote! {crate}
    } else {
        quote! {qtransfer}
    }
}

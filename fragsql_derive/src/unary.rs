use darling::{FromDeriveInput, FromVariant, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct UnaryInput {
    ident: syn::Ident,
    data: ast::Data<UnaryVariant, ()>,
}

#[derive(Debug, FromVariant)]
struct UnaryVariant {
    ident: syn::Ident,
}

pub fn unary_operator_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let op = match UnaryInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &op.ident;
    let methods = op
        .data
        .map_enum_variants(|v| {
            let var = &v.ident;
            let method = format_ident!("{}", var.to_string().to_snake_case());

            quote! {
                pub fn #method(self) -> crate::Op {
                    crate::Op::unary(self, #enum_name::#var)
                }
            }
        })
        .take_enum()
        .unwrap_or_default();

    quote! {
        impl crate::Op {
            #(#methods)*
        }
    }
    .into()
}

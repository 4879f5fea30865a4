use darling::{FromDeriveInput, FromVariant, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct BinaryDeriveInput {
    ident: syn::Ident,
    data: ast::Data<BinaryVariant, ()>,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(binary))]
struct BinaryVariant {
    ident: syn::Ident,
    #[darling(default)]
    rename: Option<String>,
    #[darling(default)]
    ignore: bool,
}

pub fn binary_operator_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_info = match BinaryDeriveInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &enum_info.ident;

    let variants = match enum_info.data.take_enum() {
        Some(variants) => variants,
        None => {
            return syn::Error::new_spanned(&input.ident, "only enums are supported")
                .to_compile_error()
                .into();
        }
    };

    let methods = variants.iter().filter_map(|var| {
        if var.ignore {
            return None;
        }

        let var_name = &var.ident;
        let snake = var
            .rename
            .clone()
            .unwrap_or_else(|| var_name.to_string().to_snake_case());
        let method = format_ident!("{}", snake);
        let doc = format!("Builds `self {} rhs` as a new node.", snake);

        Some(quote! {
            #[doc = #doc]
            pub fn #method<R>(self, rhs: R) -> crate::Op
            where
                R: crate::IntoOperand,
            {
                crate::Op::binary(self, #enum_name::#var_name, rhs)
            }
        })
    });

    quote! {
        impl crate::Op {
            #(#methods)*
        }
    }
    .into()
}
